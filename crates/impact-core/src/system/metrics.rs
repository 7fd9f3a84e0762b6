//! # Model Metrics
//!
//! Counts over a snapshot, reported by `status` surfaces.

use crate::store::Snapshot;
use serde::{Deserialize, Serialize};

/// Counts describing the size and health of the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub screen_count: usize,
    pub feature_count: usize,
    /// Screens without any feature.
    pub empty_screen_count: usize,
    /// Every connection entry, duplicates and self-loops included.
    pub connection_count: usize,
    /// Connections whose target no longer resolves.
    pub dangling_count: usize,
}

impl GraphMetrics {
    /// Compute metrics from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut metrics = Self::default();
        for screen in snapshot.screens() {
            metrics.screen_count += 1;
            let mut features = 0usize;
            for feature in screen.features() {
                features += 1;
                metrics.connection_count += feature.connections.len();
                metrics.dangling_count += feature
                    .connections
                    .iter()
                    .filter(|target| !snapshot.contains_feature(**target))
                    .count();
            }
            if features == 0 {
                metrics.empty_screen_count += 1;
            }
            metrics.feature_count += features;
        }
        metrics
    }

    /// Connections that still resolve.
    #[must_use]
    pub fn live_connection_count(&self) -> usize {
        self.connection_count.saturating_sub(self.dangling_count)
    }
}
