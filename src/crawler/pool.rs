//! Fixed-size worker pool
//!
//! Jobs are dispatched in submission order, each holding a semaphore permit
//! while it runs, so at most `size` jobs are in flight. Every job forwards its
//! result as soon as it completes, so results arrive in completion order
//! rather than submission order.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinHandle};

/// Bounded pool of concurrent workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Creates a pool running at most `size` jobs at once (minimum 1)
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Submits every job and starts dispatching
    ///
    /// A dispatcher task acquires a permit per job, then spawns `task(job)`;
    /// the permit is released when the job's output has been handed to the
    /// returned [`PoolResults`].
    pub fn run<J, T, F, Fut>(&self, jobs: Vec<J>, task: F) -> PoolResults<T>
    where
        J: Send + 'static,
        T: Send + 'static,
        F: Fn(J) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let submitted = jobs.len();
        let semaphore = Arc::new(Semaphore::new(self.size));
        let task = Arc::new(task);
        let (tx, rx) = mpsc::channel(self.size);

        let dispatcher = tokio::spawn(async move {
            let mut handles = Vec::with_capacity(jobs.len());

            for job in jobs {
                // Blocks while `size` jobs are in flight
                let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                    break;
                };

                let task = Arc::clone(&task);
                let tx = tx.clone();
                handles.push(tokio::spawn(async move {
                    let _permit = permit;
                    let output = task(job).await;
                    if tx.send(output).await.is_err() {
                        tracing::debug!("Result dropped, receiver closed");
                    }
                }));
            }
            drop(tx);

            for handle in handles {
                handle.await?;
            }
            Ok::<(), JoinError>(())
        });

        PoolResults {
            rx,
            dispatcher,
            submitted,
        }
    }
}

/// Completion-ordered results of a [`WorkerPool::run`]
pub struct PoolResults<T> {
    rx: mpsc::Receiver<T>,
    dispatcher: JoinHandle<Result<(), JoinError>>,
    submitted: usize,
}

impl<T> PoolResults<T> {
    /// Number of jobs handed to the pool
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Waits for the next finished job; `None` once every job has reported
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Waits for every job, surfacing a panic from any of them
    pub async fn join(self) -> Result<(), JoinError> {
        drop(self.rx);
        self.dispatcher.await?
    }
}
