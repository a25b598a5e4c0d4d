//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use recover_server::ServerConfig;

pub async fn cmd_serve(
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allowed_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting RecoverPro web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }
    println!();

    let static_dir = static_dir
        .map(|p| {
            p.to_str()
                .context("Static directory path is not valid UTF-8")
        })
        .transpose()?;

    let config = ServerConfig { allowed_origins };

    recover_server::serve(host, port, static_dir, config)
        .await
        .context("Web server failed")
}
