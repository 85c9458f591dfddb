//! Bounded pool of concurrent submission workers

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Runs at most `size` tasks at once
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Wait for a free worker, then run `task` on it
    pub async fn spawn<F>(&self, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Acquire permit (limits concurrent tasks)
        let permit = self.semaphore.clone().acquire_owned().await?;
        tokio::spawn(async move {
            task.await;
            // Release permit when done
            drop(permit);
        });
        Ok(())
    }

    /// Wait until every spawned task has finished
    pub async fn drain(&self) -> Result<()> {
        let _all = self.semaphore.acquire_many(self.size as u32).await?;
        Ok(())
    }
}
