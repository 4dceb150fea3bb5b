use std::time::Duration;

use tokio::task::JoinHandle;

/// The armed deferred advance.
///
/// At most one pending advance exists at a time. Every cancel bumps the
/// generation, so a callback that raced a cancellation identifies itself
/// as stale by comparing its captured generation against the current one
/// under the station lock before applying any effect.
#[derive(Debug, Default)]
pub struct AdvanceTimer {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl AdvanceTimer {
    /// Cancel any pending advance. Returns the new generation.
    pub fn cancel(&mut self) -> u64 {
        self.generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation
    }

    /// Cancel any pending advance and arm a new one. `fire` runs on the
    /// runtime after `delay` and receives the generation it was armed with.
    pub fn arm<F>(&mut self, delay: Duration, fire: F)
    where
        F: FnOnce(u64) + Send + 'static,
    {
        let generation = self.cancel();
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(generation);
        }));
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for AdvanceTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
