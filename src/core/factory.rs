//! # Factory: batches of workers sharing one behavior.
//!
//! A [`Factory`] builds `count` independent [`Worker`]s that share the same
//! action, optional wait job, priority and [`Config`]. Each worker gets a
//! fresh `S::default()` state and an id from the [`IdGenerator`].
//!
//! ```text
//! Factory::new(action)
//!     .with_wait(wait)          optional
//!     .with_priority(p)         optional
//!     .with_ids(|i| ...)        optional, default: i.to_string()
//!     .create(count) ──► [Worker "0", Worker "1", ... Worker "count-1"]   (none started)
//! ```
//!
//! Jobs are shared by `Arc`, not copied: every invocation receives the calling
//! worker and that worker's own state.
//!
//! ## Example
//! ```rust
//! use tinyworkers::{Factory, JobFn, TaskError, Worker};
//!
//! #[derive(Default)]
//! struct Hits { n: u64 }
//!
//! let workers = Factory::new(JobFn::arc(|_w: &Worker<Hits>, s: &mut Hits| {
//!     Box::pin(async move {
//!         s.n += 1;
//!         Ok::<_, TaskError>(())
//!     })
//! }))
//! .with_ids(|i| format!("hits-{i}"))
//! .create(3);
//!
//! let ids: Vec<&str> = workers.iter().map(|w| w.id()).collect();
//! assert_eq!(ids, ["hits-0", "hits-1", "hits-2"]);
//! assert!(workers.iter().all(|w| !w.is_running()));
//! ```

use std::sync::Arc;

use crate::{
    core::{config::Config, worker::Worker},
    error::RuntimeError,
    jobs::{Job, JobRef},
    policies::Priority,
};

/// Maps a zero-based batch index to a worker id.
///
/// Uniqueness within a batch is the generator's responsibility.
pub type IdGenerator = Arc<dyn Fn(usize) -> String + Send + Sync>;

/// Default id: the stringified zero-based index.
pub fn default_id(index: usize) -> String {
    index.to_string()
}

/// Builds batches of workers with shared behavior.
pub struct Factory<S> {
    action: JobRef<S>,
    wait: Option<JobRef<S>>,
    priority: Option<Priority>,
    ids: IdGenerator,
    config: Config,
}

impl<S: 'static> Clone for Factory<S> {
    fn clone(&self) -> Self {
        Self {
            action: Arc::clone(&self.action),
            wait: self.wait.clone(),
            priority: self.priority,
            ids: Arc::clone(&self.ids),
            config: self.config.clone(),
        }
    }
}

impl<S> Factory<S>
where
    S: Default + Send + 'static,
{
    /// Creates a factory for workers running `action`.
    pub fn new(action: JobRef<S>) -> Self {
        Self {
            action,
            wait: None,
            priority: None,
            ids: Arc::new(default_id),
            config: Config::default(),
        }
    }

    /// Creates a factory from a job value; it is shared by every worker.
    pub fn from_job<J>(job: J) -> Self
    where
        J: Job<S>,
    {
        Self::new(Arc::new(job))
    }

    /// Sets the shared wait job.
    pub fn with_wait(mut self, wait: JobRef<S>) -> Self {
        self.wait = Some(wait);
        self
    }

    /// Sets the shared advisory priority (overrides `Config::priority`).
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the id generator.
    pub fn with_ids<F>(mut self, ids: F) -> Self
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        self.ids = Arc::new(ids);
        self
    }

    /// Sets the shared configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Creates `count` workers in index order. None of them is started.
    pub fn create(&self, count: usize) -> Vec<Worker<S>> {
        (0..count).map(|index| self.create_one(index)).collect()
    }

    fn create_one(&self, index: usize) -> Worker<S> {
        let mut builder = Worker::builder((self.ids)(index), Arc::clone(&self.action), S::default())
            .with_wait_opt(self.wait.clone())
            .with_config(self.config.clone());
        if let Some(priority) = self.priority {
            builder = builder.with_priority(priority);
        }
        builder.build()
    }
}

/// Creates `count` workers running `action` with default wait, priority and ids.
pub fn create_batch<S>(count: usize, action: JobRef<S>) -> Vec<Worker<S>>
where
    S: Default + Send + 'static,
{
    Factory::new(action).create(count)
}

/// Starts every worker; returns how many loops were launched.
///
/// Already running or stopped workers are skipped (they count as not launched).
pub fn start_all<S>(workers: &[Worker<S>]) -> Result<usize, RuntimeError>
where
    S: Send + 'static,
{
    let mut launched = 0;
    for worker in workers {
        if worker.start()? {
            launched += 1;
        }
    }
    Ok(launched)
}

/// Requests stop on every worker. Non-blocking.
pub fn stop_all<S: 'static>(workers: &[Worker<S>]) {
    for worker in workers {
        worker.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::{core::phase::Phase, error::TaskError, jobs::JobFn};

    #[derive(Default)]
    struct Ticks {
        n: u32,
    }

    fn noop() -> JobRef<Ticks> {
        JobFn::arc(|_w: &Worker<Ticks>, s: &mut Ticks| {
            Box::pin(async move {
                s.n += 1;
                Ok::<_, TaskError>(())
            })
        })
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(create_batch(0, noop()).is_empty());
    }

    #[test]
    fn test_default_ids_are_indexes() {
        let workers = create_batch(5, noop());
        let ids: Vec<&str> = workers.iter().map(|w| w.id()).collect();
        assert_eq!(ids, ["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_ids_are_distinct_and_unstarted() {
        for count in [1usize, 2, 17, 64] {
            let workers = create_batch(count, noop());
            assert_eq!(workers.len(), count);
            let ids: HashSet<&str> = workers.iter().map(|w| w.id()).collect();
            assert_eq!(ids.len(), count);
            assert!(workers.iter().all(|w| w.phase() == Phase::Created));
        }
    }

    #[test]
    fn test_shared_settings_and_fresh_state() {
        let workers = Factory::new(noop())
            .with_priority(Priority::Highest)
            .with_ids(|i| format!("w{}", i * 10))
            .create(2);

        assert_eq!(workers[1].id(), "w10");
        for w in &workers {
            assert_eq!(w.priority(), Priority::Highest);
            assert_eq!(w.with_state(|s| s.n).unwrap(), 0);
        }

        workers[0].with_state(|s| s.n = 7).unwrap();
        assert_eq!(workers[1].with_state(|s| s.n).unwrap(), 0);
    }

    #[test]
    fn test_config_priority_used_when_not_overridden() {
        let cfg = Config {
            priority: Priority::Normal,
            ..Config::default()
        };
        let workers = Factory::new(noop()).with_config(cfg).create(1);
        assert_eq!(workers[0].priority(), Priority::Normal);
    }

    struct Bump(u32);

    #[async_trait]
    impl Job<Ticks> for Bump {
        async fn run(&self, worker: &Worker<Ticks>, state: &mut Ticks) -> Result<(), TaskError> {
            state.n += self.0;
            if state.n >= 3 * self.0 {
                worker.stop();
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_from_job_shares_one_job() {
        let cfg = Config {
            idle: Duration::from_millis(1),
            ..Config::default()
        };
        let workers = Factory::from_job(Bump(2)).with_config(cfg).create(2);

        assert_eq!(start_all(&workers), Ok(2));
        for w in &workers {
            tokio::time::timeout(Duration::from_secs(2), w.wait_stopped())
                .await
                .unwrap();
            assert_eq!(w.with_state(|s| s.n).unwrap(), 6);
        }
    }

    #[tokio::test]
    async fn test_start_all_and_stop_all() {
        let cfg = Config {
            idle: Duration::from_millis(1),
            ..Config::default()
        };
        let workers = Factory::new(noop()).with_config(cfg).create(4);

        assert_eq!(start_all(&workers), Ok(4));
        assert_eq!(start_all(&workers), Ok(0));
        tokio::time::sleep(Duration::from_millis(20)).await;

        stop_all(&workers);
        for w in &workers {
            w.wait_stopped().await;
            assert_eq!(w.phase(), Phase::Terminated);
            assert!(w.with_state(|s| s.n).unwrap() >= 1);
        }
    }
}
