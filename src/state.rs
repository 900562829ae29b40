use crate::config::Config;
use crate::types::geo::OutputFile;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    files: Arc<DashMap<String, CachedFile>>,
}

struct CachedFile {
    file: OutputFile,
    inserted_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            files: Arc::new(DashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn insert(&self, file_id: String, file: OutputFile) {
        self.files.insert(
            file_id,
            CachedFile {
                file,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn get(&self, file_id: &str) -> Option<OutputFile> {
        self.files.get(file_id).map(|entry| entry.file.clone())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn evict_expired(&self, ttl: Duration) {
        let now = Instant::now();
        self.files.retain(|_, cached| {
            now.duration_since(cached.inserted_at) < ttl
        });
        tracing::info!("Cache eviction complete. Current size: {}", self.files.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(Config::from_env())
    }

    fn file(name: &str) -> OutputFile {
        OutputFile {
            name: name.to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn stored_files_can_be_fetched() {
        let state = state();
        state.insert("abc".into(), file("x-wpts.fit"));

        let cached = state.get("abc").expect("cached file");
        assert_eq!(cached.name, "x-wpts.fit");
        assert!(state.get("missing").is_none());
    }

    #[test]
    fn eviction_drops_expired_files() {
        let state = state();
        state.insert("old".into(), file("a.fit"));

        state.evict_expired(Duration::from_secs(3600));
        assert_eq!(state.len(), 1);

        state.evict_expired(Duration::ZERO);
        assert!(state.is_empty());
    }
}
