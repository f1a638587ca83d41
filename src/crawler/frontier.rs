//! Shared crawl frontier with completion detection
//!
//! The frontier is the coordination point of a run: a FIFO queue of fetch
//! jobs, the visited-URL set that dedups across workers, and a pending
//! counter covering both queued and in-flight jobs. The counter is what
//! makes global termination detectable. An empty queue alone proves
//! nothing while some worker is mid-fetch and about to enqueue more work.

use crate::store::{Secret, SecretStore};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};
use url::Url;

/// One unit of crawl work: a URL and the depth it was discovered at.
///
/// Seeds enter at depth 1; every link found on a page is scheduled at the
/// parent's depth plus one.
#[derive(Debug, Clone)]
pub struct Job {
    pub url: Url,
    pub depth: u32,
}

impl Job {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }
}

struct FrontierState {
    queue: VecDeque<Job>,
    /// Queued jobs plus jobs claimed by a worker but not yet marked done.
    pending: usize,
    closed: bool,
}

/// Shared crawl frontier.
///
/// Workers block on [`dequeue`](Frontier::dequeue) until a job is available
/// or the frontier closes. The frontier closes in exactly two ways: the
/// pending counter reaches zero inside
/// [`await_completion`](Frontier::await_completion), or
/// [`cancel_outstanding`](Frontier::cancel_outstanding) force-drains the
/// queue during shutdown.
pub struct Frontier {
    state: Mutex<FrontierState>,
    /// One permit per queued job. Closing it wakes every blocked dequeuer.
    ready: Semaphore,
    /// Signalled when the pending counter reaches zero.
    idle: Notify,
    store: Arc<SecretStore>,
    visited: Mutex<HashSet<String>>,
    base_hosts: Mutex<HashSet<String>>,
    scheduled: AtomicU64,
}

impl Frontier {
    pub fn new(store: Arc<SecretStore>) -> Self {
        Self {
            state: Mutex::new(FrontierState {
                queue: VecDeque::new(),
                pending: 0,
                closed: false,
            }),
            ready: Semaphore::new(0),
            idle: Notify::new(),
            store,
            visited: Mutex::new(HashSet::new()),
            base_hosts: Mutex::new(HashSet::new()),
            scheduled: AtomicU64::new(0),
        }
    }

    /// Atomically records secrets and appends jobs to the queue
    ///
    /// The secrets land in the store and the jobs become visible to
    /// dequeuers as one transaction, so a concurrent reader never sees a
    /// page's links without its secrets. If the frontier is already
    /// closed, the whole batch is silently dropped.
    pub fn enqueue(&self, jobs: Vec<Job>, secrets: Vec<Secret>) {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return;
        }
        self.store.insert_all(secrets);
        let added = jobs.len();
        state.queue.extend(jobs);
        state.pending += added;
        drop(state);

        self.scheduled.fetch_add(added as u64, Ordering::Relaxed);
        self.ready.add_permits(added);
    }

    /// Pops the next job in FIFO order
    ///
    /// Waits while the queue is empty and the frontier is still open.
    /// Returns `None` once the frontier closes, which tells the calling
    /// worker to exit. Every `Some` must be answered by exactly one
    /// [`mark_done`](Frontier::mark_done).
    pub async fn dequeue(&self) -> Option<Job> {
        loop {
            match self.ready.acquire().await {
                Ok(permit) => {
                    permit.forget();
                    let mut state = self.state.lock().unwrap();
                    if let Some(job) = state.queue.pop_front() {
                        return Some(job);
                    }
                    // A cancellation cleared the queue out from under this
                    // permit.
                    if state.closed {
                        return None;
                    }
                }
                Err(_) => return None,
            }
        }
    }

    /// Marks one dequeued job as fully processed
    ///
    /// Must be called exactly once per job returned by
    /// [`dequeue`](Frontier::dequeue), on every outcome path, or the
    /// pending counter never reaches zero and the run never completes.
    pub fn mark_done(&self) {
        let mut state = self.state.lock().unwrap();
        debug_assert!(state.pending > 0, "mark_done without a matching dequeue");
        state.pending = state.pending.saturating_sub(1);
        let idle = state.pending == 0;
        drop(state);

        if idle {
            self.idle.notify_waiters();
        }
    }

    /// Blocks until every outstanding obligation has completed, then
    /// closes the frontier and wakes all blocked dequeuers.
    pub async fn await_completion(&self) {
        let notified = self.idle.notified();
        tokio::pin!(notified);

        loop {
            // Register for the next notification before checking the
            // counter, so a mark_done racing between the check and the
            // await is not lost.
            notified.as_mut().enable();
            {
                let mut state = self.state.lock().unwrap();
                if state.pending == 0 {
                    state.closed = true;
                    drop(state);
                    self.ready.close();
                    return;
                }
            }
            notified.as_mut().await;
            notified.set(self.idle.notified());
        }
    }

    /// Drops all queued-but-unclaimed jobs and closes the frontier
    ///
    /// Called on external cancellation so completion does not wait for
    /// work that will never run. Jobs already claimed by a worker are not
    /// touched; they finish through their own mark_done.
    pub fn cancel_outstanding(&self) {
        let mut state = self.state.lock().unwrap();
        let dropped = state.queue.len();
        state.queue.clear();
        state.pending = state.pending.saturating_sub(dropped);
        state.closed = true;
        let idle = state.pending == 0;
        drop(state);

        self.ready.close();
        if idle {
            self.idle.notify_waiters();
        }
        if dropped > 0 {
            tracing::debug!("Dropped {} queued jobs on cancellation", dropped);
        }
    }

    /// Atomic check-and-set on the visited set
    ///
    /// The first caller for a given URL gets `false` and owns scheduling
    /// it; every later caller gets `true`.
    pub fn is_visited(&self, url: &Url) -> bool {
        let mut visited = self.visited.lock().unwrap();
        !visited.insert(url.as_str().to_string())
    }

    /// Registers a seed hostname for the same-site restriction.
    pub fn register_base_host(&self, host: &str) {
        self.base_hosts.lock().unwrap().insert(host.to_string());
    }

    /// Whether the hostname belongs to one of the seed URLs.
    pub fn is_base_host(&self, host: &str) -> bool {
        self.base_hosts.lock().unwrap().contains(host)
    }

    /// Jobs scheduled over the lifetime of the run.
    pub fn links_scheduled(&self) -> u64 {
        self.scheduled.load(Ordering::Relaxed)
    }

    /// Jobs currently queued and not yet claimed by a worker.
    pub fn queued(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    /// Outstanding obligations: queued plus in-flight jobs.
    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().pending
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn test_frontier() -> (Arc<Frontier>, Arc<SecretStore>) {
        let store = Arc::new(SecretStore::new());
        (Arc::new(Frontier::new(store.clone())), store)
    }

    fn job(url: &str) -> Job {
        Job::new(Url::parse(url).unwrap(), 1)
    }

    #[tokio::test]
    async fn test_dequeue_is_fifo() {
        let (frontier, _) = test_frontier();
        frontier.enqueue(vec![job("http://a.com/1"), job("http://a.com/2")], vec![]);

        assert_eq!(frontier.dequeue().await.unwrap().url.as_str(), "http://a.com/1");
        assert_eq!(frontier.dequeue().await.unwrap().url.as_str(), "http://a.com/2");
        assert_eq!(frontier.pending(), 2);
    }

    #[tokio::test]
    async fn test_await_completion_with_nothing_pending() {
        let (frontier, _) = test_frontier();
        timeout(Duration::from_secs(1), frontier.await_completion())
            .await
            .unwrap();
        assert!(frontier.is_closed());
        assert!(frontier.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn test_completion_waits_for_inflight_job() {
        let (frontier, _) = test_frontier();
        frontier.enqueue(vec![job("http://a.com/")], vec![]);
        let _job = frontier.dequeue().await.unwrap();

        let waiter = {
            let frontier = frontier.clone();
            tokio::spawn(async move { frontier.await_completion().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        frontier.mark_done();
        timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
        assert!(frontier.is_closed());
        assert_eq!(frontier.pending(), 0);
    }

    #[tokio::test]
    async fn test_enqueue_after_close_is_dropped() {
        let (frontier, store) = test_frontier();
        frontier.await_completion().await;

        frontier.enqueue(
            vec![job("http://a.com/")],
            vec![Secret::new("a.com", "email", "late@example.com")],
        );
        assert_eq!(frontier.queued(), 0);
        assert_eq!(frontier.links_scheduled(), 0);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_cancel_unblocks_waiting_dequeuers() {
        let (frontier, _) = test_frontier();
        let mut waiters = Vec::new();
        for _ in 0..3 {
            let frontier = frontier.clone();
            waiters.push(tokio::spawn(async move { frontier.dequeue().await }));
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        frontier.cancel_outstanding();
        for waiter in waiters {
            let job = timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
            assert!(job.is_none());
        }
    }

    #[tokio::test]
    async fn test_cancel_keeps_inflight_obligations() {
        let (frontier, _) = test_frontier();
        frontier.enqueue(vec![job("http://a.com/1"), job("http://a.com/2")], vec![]);
        let _claimed = frontier.dequeue().await.unwrap();

        frontier.cancel_outstanding();
        // The queued job is gone; the claimed one still counts.
        assert_eq!(frontier.queued(), 0);
        assert_eq!(frontier.pending(), 1);

        let waiter = {
            let frontier = frontier.clone();
            tokio::spawn(async move { frontier.await_completion().await })
        };
        frontier.mark_done();
        timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_enqueue_records_secrets() {
        let (frontier, store) = test_frontier();
        frontier.enqueue(
            vec![job("http://a.com/")],
            vec![
                Secret::new("a.com", "email", "someone@example.com"),
                Secret::new("a.com", "email", "someone@example.com"),
            ],
        );
        assert_eq!(store.len(), 1);
        assert_eq!(frontier.links_scheduled(), 1);
    }

    #[tokio::test]
    async fn test_visited_first_caller_wins() {
        let (frontier, _) = test_frontier();
        let url = Url::parse("http://a.com/page").unwrap();
        assert!(!frontier.is_visited(&url));
        assert!(frontier.is_visited(&url));
        assert!(frontier.is_visited(&url));
    }

    #[tokio::test]
    async fn test_base_host_registration() {
        let (frontier, _) = test_frontier();
        frontier.register_base_host("a.com");
        assert!(frontier.is_base_host("a.com"));
        assert!(!frontier.is_base_host("b.com"));
    }

    #[tokio::test]
    async fn test_completion_with_concurrent_fanout() {
        // Four workers expand a three-level tree: the root enqueues two
        // children, each child two grandchildren. Completion must wait for
        // all seven jobs and then release every worker.
        let (frontier, _) = test_frontier();
        frontier.enqueue(vec![Job::new(Url::parse("http://a.com/0").unwrap(), 1)], vec![]);

        let mut workers = Vec::new();
        for _ in 0..4 {
            let frontier = frontier.clone();
            workers.push(tokio::spawn(async move {
                let mut processed = 0usize;
                while let Some(job) = frontier.dequeue().await {
                    if job.depth < 3 {
                        let children = (0..2)
                            .map(|i| {
                                let url = Url::parse(&format!("{}/{}", job.url, i)).unwrap();
                                Job::new(url, job.depth + 1)
                            })
                            .collect();
                        frontier.enqueue(children, vec![]);
                    }
                    frontier.mark_done();
                    processed += 1;
                }
                processed
            }));
        }

        timeout(Duration::from_secs(5), frontier.await_completion())
            .await
            .unwrap();

        let mut total = 0;
        for worker in workers {
            total += worker.await.unwrap();
        }
        assert_eq!(total, 7);
        assert_eq!(frontier.pending(), 0);
        assert_eq!(frontier.queued(), 0);
        assert_eq!(frontier.links_scheduled(), 7);
    }
}
