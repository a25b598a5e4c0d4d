//! Status command implementation

use anyhow::Result;
use recover_core::{
    format_inr, models::INITIAL_YEARS, ClassifierBackend, ClassifierClient, CurrencyStyle, Status,
    TARGET_AMOUNT,
};

/// Show classifier configuration, reachability and tracker constants
pub async fn cmd_status(client: &ClassifierClient) -> Result<()> {
    let info = client.info();

    println!("📊 RecoverPro Status\n");
    println!("  Today:      {}", chrono::Local::now().format("%Y-%m-%d"));
    println!(
        "  Target:     {} ({})",
        format_inr(TARGET_AMOUNT, CurrencyStyle::Dashboard),
        format_inr(TARGET_AMOUNT, CurrencyStyle::GrandTotal)
    );
    println!(
        "  Fiscal years: {} to {}",
        INITIAL_YEARS[INITIAL_YEARS.len() - 1],
        INITIAL_YEARS[0]
    );

    println!("\n🤖 Classifier");
    println!("  Backend:    {}", info.backend);
    if info.configured {
        println!("  Model:      {}", info.model);
        println!("  Host:       {}", info.host);
        if client.health_check().await {
            println!("  Health:     ✅ reachable");
        } else {
            println!("  Health:     ❌ not responding");
        }
    } else {
        println!("  ⚠️  No API key configured (set GEMINI_API_KEY)");
        println!("     Every classification returns PENDING until one is set.");
    }

    println!("\n🏷️  Statuses");
    for status in Status::all() {
        println!("  {:<16} {}", status.as_str(), status.label());
    }

    Ok(())
}
