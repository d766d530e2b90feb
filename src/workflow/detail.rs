use std::sync::Arc;

use crate::workflow::models::AdBlockGroup;
use crate::workflow::webhook::WorkflowBackend;

/// Loads the ad-block versions shown in a task's detail overlay.
#[derive(Clone)]
pub struct DetailLoader {
    backend: Arc<dyn WorkflowBackend>,
}

impl DetailLoader {
    pub fn new(backend: Arc<dyn WorkflowBackend>) -> Self {
        Self { backend }
    }

    /// Version groups for `task_id`, scenes in index order.
    ///
    /// A failed fetch yields an empty list; the overlay shows its empty state.
    pub async fn load(&self, task_id: i64) -> Vec<AdBlockGroup> {
        match self.backend.fetch_ad_blocks(task_id).await {
            Ok(groups) => normalize_groups(groups),
            Err(e) => {
                tracing::warn!(task_id, error = %e, "failed to load ad blocks");
                Vec::new()
            }
        }
    }
}

/// Merge groups sharing a version label (first appearance wins the slot)
/// and sort each group's scenes by index.
pub fn normalize_groups(groups: Vec<AdBlockGroup>) -> Vec<AdBlockGroup> {
    let mut merged: Vec<AdBlockGroup> = Vec::with_capacity(groups.len());
    for group in groups {
        match merged.iter_mut().find(|g| g.version == group.version) {
            Some(existing) => existing.scenes.extend(group.scenes),
            None => merged.push(group),
        }
    }
    for group in &mut merged {
        group.scenes.sort_by_key(|s| s.scene);
    }
    merged
}
