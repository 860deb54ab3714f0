//! Consistency checks over a loaded store, used by `octolog doctor`.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::journal::ingest::entry_id;
use crate::journal::timestamp::parse_timestamp;
use crate::journal::types::Store;

#[derive(Debug, Default, Serialize)]
pub struct HealthReport {
    pub entry_count: usize,
    pub embedded_count: usize,
    /// Distinct embedding lengths seen; more than one means mixed providers.
    pub dimensions: BTreeSet<usize>,
    /// Ids that do not match the id derived from the entry's `timestamp_str`.
    pub mismatched_ids: Vec<String>,
    /// Ids whose `timestamp` disagrees with (or cannot be derived from) `timestamp_str`.
    pub inconsistent_timestamps: Vec<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.mismatched_ids.is_empty()
            && self.inconsistent_timestamps.is_empty()
            && self.dimensions.len() <= 1
    }
}

pub fn check_store_health(store: &Store) -> HealthReport {
    let mut report = HealthReport {
        entry_count: store.len(),
        ..Default::default()
    };

    for (id, entry) in store {
        if let Some(embedding) = &entry.embedding {
            report.embedded_count += 1;
            report.dimensions.insert(embedding.len());
        }

        if *id != entry_id(&entry.metadata.timestamp_str) {
            report.mismatched_ids.push(id.clone());
        }

        match parse_timestamp(&entry.metadata.timestamp_str) {
            Ok(epoch) if epoch == entry.metadata.timestamp => {}
            _ => report.inconsistent_timestamps.push(id.clone()),
        }
    }

    report
}
