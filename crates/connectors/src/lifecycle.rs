//! Input removal hook
//!
//! Removing an input deletes its checkpoint so a later input with the same
//! name starts from the default lookback again. Deletion problems are logged
//! and swallowed; they must never block the removal itself.

use tracing::{error, info};

use crate::checkpoint::collection_key;
use crate::traits::CheckpointStore;

/// Delete the checkpoint for `input_id`; returns whether deletion succeeded
pub async fn delete_checkpoint(store: &dyn CheckpointStore, prefix: &str, input_id: &str) -> bool {
    let key = collection_key(prefix, input_id);

    match store.delete(&key).await {
        Ok(()) => {
            info!(input = %input_id, key = %key, store = store.name(), "removed checkpoint");
            true
        }
        Err(e) => {
            error!(
                input = %input_id,
                key = %key,
                store = store.name(),
                error = %e,
                details = ?e,
                "error while deleting checkpoint"
            );
            false
        }
    }
}
