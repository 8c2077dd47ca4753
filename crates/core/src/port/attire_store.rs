// Attire Store Port - persistence of the operation log

use crate::domain::AttireLog;
use crate::error::Result;
use async_trait::async_trait;

/// Attire log sink
///
/// Called after every executed link; each call replaces the stored document.
#[async_trait]
pub trait AttireStore: Send + Sync {
    async fn save(&self, log: &AttireLog) -> Result<()>;
}

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every saved version in memory
    #[derive(Default)]
    pub struct InMemoryAttireStore {
        saved: Mutex<Vec<AttireLog>>,
    }

    impl InMemoryAttireStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn save_count(&self) -> usize {
            self.saved.lock().unwrap().len()
        }

        pub fn latest(&self) -> Option<AttireLog> {
            self.saved.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl AttireStore for InMemoryAttireStore {
        async fn save(&self, log: &AttireLog) -> Result<()> {
            self.saved.lock().unwrap().push(log.clone());
            Ok(())
        }
    }
}
