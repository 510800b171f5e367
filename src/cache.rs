//! Incremental normalization cache. A namespace whose raw dump hasn't
//! changed reuses its previously normalized form.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use crate::normalize::NormalizedNamespace;

#[derive(Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub namespace: NormalizedNamespace,
}

pub struct NormalizeCache {
    cache_dir: PathBuf,
}

impl NormalizeCache {
    pub fn new() -> Self {
        // Default to .gir-codegen/cache in the current workspace
        let cache_dir = PathBuf::from(".gir-codegen/cache");
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).ok();
        }
        Self { cache_dir }
    }

    pub fn with_dir(cache_dir: PathBuf) -> Self {
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).ok();
        }
        Self { cache_dir }
    }

    pub fn compute_hash(source: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn get_cache_path(&self, namespace_name: &str) -> PathBuf {
        // Namespace names are plain identifiers, safe as file names
        self.cache_dir.join(format!("{}.json", namespace_name))
    }

    pub fn get(&self, namespace_name: &str, raw_json: &str) -> Option<NormalizedNamespace> {
        let cache_path = self.get_cache_path(namespace_name);
        if !cache_path.exists() {
            return None;
        }

        let data = match fs::read_to_string(&cache_path) {
            Ok(d) => d,
            Err(_) => return None,
        };

        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(e) => e,
            Err(e) => {
                eprintln!(
                    "[GirCodegen] Cache deserialization failed for {}: {}",
                    namespace_name, e
                );
                // Invalidate corrupt cache file
                fs::remove_file(cache_path).ok();
                return None;
            }
        };

        let current_hash = Self::compute_hash(raw_json);
        if entry.hash == current_hash {
            Some(entry.namespace)
        } else {
            None
        }
    }

    pub fn set(&self, namespace_name: &str, raw_json: &str, namespace: NormalizedNamespace) {
        let cache_path = self.get_cache_path(namespace_name);
        let hash = Self::compute_hash(raw_json);
        let entry = CacheEntry { hash, namespace };

        if let Ok(data) = serde_json::to_string(&entry) {
            fs::write(cache_path, data).ok();
        }
    }
}

impl Default for NormalizeCache {
    fn default() -> Self {
        Self::new()
    }
}
