//! Administrative bulk operations
//!
//! Best-effort and idempotent; repeating them is always safe.

use crate::codes::CODES_KEY;
use crate::error::CoreError;
use crate::intake::REVIEWS_KEY;
use ratify_store::KeyValueStore;
use tracing::info;

/// Drop both persisted collections
///
/// # Errors
/// Propagates store failures; absent collections are a no-op.
pub fn reset_all(store: &dyn KeyValueStore) -> Result<(), CoreError> {
    store.remove(CODES_KEY)?;
    store.remove(REVIEWS_KEY)?;
    info!("all codes and reviews reset");
    Ok(())
}
