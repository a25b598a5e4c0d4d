//! Application state shared by the CLI and the HTTP server
//!
//! Owns the record store and the classifier. Store access goes through short
//! synchronous closures; the lock is never held across a classifier call.
//! Classification of one record marks it busy so a second request for the
//! same id is refused, while different ids run concurrently.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info};

use crate::ai::ClassifierClient;
use crate::error::{Error, Result};
use crate::models::{ClassificationResult, Commitment};
use crate::store::RecordStore;

#[derive(Debug, Default)]
struct TrackerState {
    store: RecordStore,
    in_flight: HashSet<String>,
}

pub struct Tracker {
    state: Mutex<TrackerState>,
    classifier: ClassifierClient,
}

/// What happened to a classification request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClassifyOutcome {
    /// No record with that id
    NotFound,
    /// The record has no transcript text
    Skipped,
    /// A classification for this record is still running
    AlreadyInFlight,
    /// Result merged into the record
    Applied {
        commitment: Commitment,
        result: ClassificationResult,
    },
    /// The record was deleted while the classifier was running
    Discarded { result: ClassificationResult },
}

impl Tracker {
    pub fn new(classifier: ClassifierClient) -> Self {
        Self::with_records(RecordStore::new(), classifier)
    }

    pub fn with_records(store: RecordStore, classifier: ClassifierClient) -> Self {
        Self {
            state: Mutex::new(TrackerState {
                store,
                in_flight: HashSet::new(),
            }),
            classifier,
        }
    }

    pub fn classifier(&self) -> &ClassifierClient {
        &self.classifier
    }

    fn lock(&self) -> Result<MutexGuard<'_, TrackerState>> {
        self.state
            .lock()
            .map_err(|_| Error::InvalidData("Failed to acquire tracker lock".into()))
    }

    /// Read the store
    pub fn with_store<R>(&self, f: impl FnOnce(&RecordStore) -> R) -> Result<R> {
        Ok(f(&self.lock()?.store))
    }

    /// Mutate the store
    pub fn with_store_mut<R>(&self, f: impl FnOnce(&mut RecordStore) -> R) -> Result<R> {
        Ok(f(&mut self.lock()?.store))
    }

    /// Read the store together with the ids currently being classified
    pub fn inspect<R>(&self, f: impl FnOnce(&RecordStore, &HashSet<String>) -> R) -> Result<R> {
        let state = self.lock()?;
        Ok(f(&state.store, &state.in_flight))
    }

    pub fn is_classifying(&self, id: &str) -> Result<bool> {
        Ok(self.lock()?.in_flight.contains(id))
    }

    pub fn in_flight_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.lock()?.in_flight.iter().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Classify a record's transcript and merge the result into it
    pub async fn classify_commitment(&self, id: &str) -> Result<ClassifyOutcome> {
        let (transcript, mut busy) = {
            let mut state = self.lock()?;
            let Some(commitment) = state.store.commitment(id) else {
                return Ok(ClassifyOutcome::NotFound);
            };
            if !commitment.has_transcript() {
                debug!(id, "Skipping classification of empty transcript");
                return Ok(ClassifyOutcome::Skipped);
            }
            let transcript = commitment.transcript.clone();
            if !state.in_flight.insert(id.to_string()) {
                return Ok(ClassifyOutcome::AlreadyInFlight);
            }
            (
                transcript,
                BusyMarker {
                    tracker: self,
                    id,
                    armed: true,
                },
            )
        };

        let result = self.classifier.classify(&transcript).await;

        let mut state = self.lock()?;
        state.in_flight.remove(id);
        busy.armed = false;
        if state.store.apply_classification(id, &result) {
            let commitment = state
                .store
                .commitment(id)
                .cloned()
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            info!(id, status = %result.suggested_status, "Classification applied");
            Ok(ClassifyOutcome::Applied { commitment, result })
        } else {
            info!(id, "Record deleted during classification, result discarded");
            Ok(ClassifyOutcome::Discarded { result })
        }
    }
}

/// Clears a record's busy marker if classification is abandoned midway
struct BusyMarker<'a> {
    tracker: &'a Tracker,
    id: &'a str,
    armed: bool,
}

impl Drop for BusyMarker<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut state) = self.tracker.state.lock() {
            state.in_flight.remove(self.id);
        }
    }
}
