// Cleanup Store Port - snapshot of cleanup links still to run

use crate::domain::Link;
use crate::error::Result;
use async_trait::async_trait;

/// Cleanup snapshot storage
///
/// `save` overwrites the whole snapshot; the stored order is execution
/// queue order (the last element runs first).
#[async_trait]
pub trait CleanupStore: Send + Sync {
    async fn save(&self, links: &[Link]) -> Result<()>;

    async fn load(&self) -> Result<Vec<Link>>;
}

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryCleanupStore {
        current: Mutex<Vec<Link>>,
        history: Mutex<Vec<Vec<Link>>>,
    }

    impl InMemoryCleanupStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_links(links: Vec<Link>) -> Self {
            Self {
                current: Mutex::new(links),
                history: Mutex::new(Vec::new()),
            }
        }

        /// Every snapshot written, oldest first
        pub fn history(&self) -> Vec<Vec<Link>> {
            self.history.lock().unwrap().clone()
        }

        pub fn current(&self) -> Vec<Link> {
            self.current.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CleanupStore for InMemoryCleanupStore {
        async fn save(&self, links: &[Link]) -> Result<()> {
            *self.current.lock().unwrap() = links.to_vec();
            self.history.lock().unwrap().push(links.to_vec());
            Ok(())
        }

        async fn load(&self) -> Result<Vec<Link>> {
            Ok(self.current.lock().unwrap().clone())
        }
    }
}
