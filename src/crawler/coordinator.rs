//! Crawl orchestration
//!
//! The coordinator owns every shared collaborator of a run: the HTTP
//! client, the buffer pool, the frontier, the secret store, and the filter
//! chain. It seeds the frontier, spawns the worker pool and the shutdown
//! watcher, waits for global completion, and turns the results into
//! exported files and final counters.

use crate::config::Config;
use crate::crawler::extractor::PageExtractor;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::{Frontier, Job};
use crate::crawler::pool::BufferPool;
use crate::crawler::worker::{run_worker, WorkerContext};
use crate::filter::FilterChain;
use crate::output::export_secrets;
use crate::store::SecretStore;
use crate::url::extract_hostname;
use crate::{Result, SpinneretError};
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Final counters for one crawl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Jobs scheduled into the frontier over the run.
    pub links_crawled: u64,
    /// Distinct secrets recorded.
    pub secrets_found: usize,
    /// Payload buffers the pool had to allocate.
    pub buffers_allocated: u64,
    /// Worker tasks spawned.
    pub workers: usize,
}

/// Main crawler structure.
///
/// All collaborators are constructed up front in [`Crawler::new`] and
/// shared with the workers by handle; nothing is created lazily during
/// the crawl.
pub struct Crawler {
    config: Arc<Config>,
    frontier: Arc<Frontier>,
    store: Arc<SecretStore>,
    pool: Arc<BufferPool>,
    extractor: Arc<PageExtractor>,
    filters: Arc<FilterChain>,
    client: Client,
    cancel: CancellationToken,
}

impl Crawler {
    /// Creates a crawler from resolved configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The resolved crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(SpinneretError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(SecretStore::new());
        let frontier = Arc::new(Frontier::new(store.clone()));
        let filters = Arc::new(FilterChain::from_config(
            &config.allowed_domains,
            &config.disallowed_domains,
        ));
        let client = build_http_client()?;

        Ok(Self {
            config: Arc::new(config),
            frontier,
            store,
            pool: Arc::new(BufferPool::new()),
            extractor: Arc::new(PageExtractor::new()),
            filters,
            client,
            cancel: CancellationToken::new(),
        })
    }

    /// Token that cancels the run when triggered
    ///
    /// SIGINT and SIGTERM cancel this same token, so embedding callers can
    /// share shutdown behavior with the signal path.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// Blocks until every scheduled job has been processed or dropped by a
    /// shutdown, then exports secrets (if an output directory is
    /// configured) and returns the final counters. A cancelled run still
    /// exports whatever was found up to that point.
    ///
    /// # Arguments
    ///
    /// * `seeds` - Parsed seed URLs; must not be empty
    pub async fn run(&self, seeds: Vec<Url>) -> Result<CrawlReport> {
        if seeds.is_empty() {
            return Err(SpinneretError::NoSeeds);
        }

        let seed_jobs = self.seed_jobs(seeds);
        tracing::info!(
            "Starting crawl: {} seeds, {} workers, max depth {}",
            seed_jobs.len(),
            self.config.workers,
            self.config.depth
        );
        self.frontier.enqueue(seed_jobs, Vec::new());

        let mut workers = Vec::with_capacity(self.config.workers);
        for id in 0..self.config.workers {
            let ctx = WorkerContext {
                config: self.config.clone(),
                frontier: self.frontier.clone(),
                pool: self.pool.clone(),
                extractor: self.extractor.clone(),
                filters: self.filters.clone(),
                client: self.client.clone(),
                cancel: self.cancel.clone(),
            };
            workers.push(tokio::spawn(run_worker(id, ctx)));
        }

        let watcher = tokio::spawn(shutdown_watcher(
            self.cancel.clone(),
            self.frontier.clone(),
        ));

        self.frontier.await_completion().await;

        for worker in workers {
            let _ = worker.await;
        }
        watcher.abort();

        let report = CrawlReport {
            links_crawled: self.frontier.links_scheduled(),
            secrets_found: self.store.len(),
            buffers_allocated: self.pool.allocated(),
            workers: self.config.workers,
        };

        if let Some(dir) = &self.config.output {
            let written = export_secrets(&self.store, dir)?;
            for path in &written {
                tracing::info!("Wrote {}", path.display());
            }
        }

        tracing::info!("{} links crawled", report.links_crawled);
        tracing::info!("{} secrets recorded", report.secrets_found);
        tracing::debug!(
            "{} payload buffers allocated across {} workers",
            report.buffers_allocated,
            report.workers
        );

        Ok(report)
    }

    /// Builds depth-1 jobs for the seed URLs
    ///
    /// Seed hostnames are registered for the same-site restriction, and
    /// the seeds themselves are marked visited so a page linking back to a
    /// seed never schedules it a second time.
    fn seed_jobs(&self, seeds: Vec<Url>) -> Vec<Job> {
        let mut jobs = Vec::new();
        for url in seeds {
            if let Some(host) = extract_hostname(&url) {
                self.frontier.register_base_host(&host);
            }
            if self.frontier.is_visited(&url) {
                continue;
            }
            jobs.push(Job::new(url, 1));
        }
        jobs
    }
}

/// Waits for a shutdown signal or programmatic cancellation
///
/// Whichever fires first, the cancellation token stops in-flight fetches
/// and the frontier drops its queued jobs, so completion arrives as soon
/// as claimed jobs finish. Aborted by the coordinator once a run completes
/// normally.
async fn shutdown_watcher(cancel: CancellationToken, frontier: Arc<Frontier>) {
    tokio::select! {
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, cancelling crawl");
            cancel.cancel();
        }
        _ = cancel.cancelled() => {
            tracing::info!("Cancellation requested, draining frontier");
        }
    }
    frontier.cancel_outstanding();
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            depth: 2,
            workers: 4,
            ..Config::default()
        }
    }

    #[test]
    fn test_crawler_creation() {
        let crawler = Crawler::new(create_test_config());
        assert!(crawler.is_ok());
    }

    #[tokio::test]
    async fn test_run_without_seeds_is_an_error() {
        let crawler = Crawler::new(create_test_config()).unwrap();
        let err = crawler.run(Vec::new()).await.unwrap_err();
        assert!(matches!(err, SpinneretError::NoSeeds));
    }

    #[test]
    fn test_seed_jobs_dedup_and_register_hosts() {
        let crawler = Crawler::new(create_test_config()).unwrap();
        let seeds = vec![
            Url::parse("http://a.com/").unwrap(),
            Url::parse("http://a.com/").unwrap(),
            Url::parse("http://b.com/start").unwrap(),
        ];

        let jobs = crawler.seed_jobs(seeds);
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.depth == 1));
        assert!(crawler.frontier.is_base_host("a.com"));
        assert!(crawler.frontier.is_base_host("b.com"));
    }
}
