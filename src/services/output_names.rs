use std::sync::Arc;

use crate::config::StoreConfig;
use crate::domain::errors::StoreResult;
use crate::domain::value_objects::{naming::apply_suffix, RemoteKey};
use crate::ports::storage::ObjectStore;

/// Collision-free output naming against the remote store.
///
/// The whole batch is suffixed together: a video and its separate audio
/// track must keep matching names, so a suffix is accepted only when none of
/// the batch's derived keys exist. The existence check and the later upload
/// are not atomic; a concurrent writer can claim a key in between (the store
/// offers no compare-and-swap).
pub struct OutputNamer {
    store: Arc<dyn ObjectStore>,
    config: Arc<StoreConfig>,
}

impl OutputNamer {
    pub fn new(store: Arc<dyn ObjectStore>, config: Arc<StoreConfig>) -> Self {
        Self { store, config }
    }

    /// Find the first numeric suffix under which no candidate's output key
    /// exists, returning the suffixed filenames and their keys.
    pub async fn reserve_names(
        &self,
        subfolder: &str,
        filenames: &[String],
    ) -> StoreResult<(Vec<String>, Vec<RemoteKey>)> {
        let mut suffix = 0u32;
        loop {
            let candidates: Vec<String> = filenames
                .iter()
                .map(|name| apply_suffix(name, suffix))
                .collect();

            let mut keys = Vec::with_capacity(candidates.len());
            for name in &candidates {
                keys.push(self.config.output_key_for(subfolder, name)?);
            }

            let mut any_exists = false;
            for key in &keys {
                if self.store.exists(key).await? {
                    any_exists = true;
                    break;
                }
            }

            if !any_exists {
                return Ok((candidates, keys));
            }
            suffix += 1;
        }
    }
}
