//! Worker loop
//!
//! Each worker drains the frontier until it closes. A dequeued job is
//! marked done exactly once, whatever its outcome, so the pending counter
//! stays truthful; a fetch or parse failure abandons that branch of the
//! crawl and nothing is retried.

use crate::config::Config;
use crate::crawler::extractor::PageExtractor;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::frontier::{Frontier, Job};
use crate::crawler::pool::BufferPool;
use crate::filter::{FilterChain, UrlFilter};
use crate::url::extract_hostname;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shared handles a worker needs to process jobs.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub config: Arc<Config>,
    pub frontier: Arc<Frontier>,
    pub pool: Arc<BufferPool>,
    pub extractor: Arc<PageExtractor>,
    pub filters: Arc<FilterChain>,
    pub client: Client,
    pub cancel: CancellationToken,
}

/// Runs one worker until the frontier closes.
pub(crate) async fn run_worker(id: usize, ctx: WorkerContext) {
    tracing::debug!("Worker {} started", id);

    while let Some(job) = ctx.frontier.dequeue().await {
        if !ctx.cancel.is_cancelled() {
            process_job(&ctx, &job).await;
        }
        ctx.frontier.mark_done();

        // No pause after the last outstanding job; the next dequeue
        // only observes the closed frontier and exits.
        if let Some(interval) = ctx.config.interval {
            if interval > 0 && !ctx.cancel.is_cancelled() && ctx.frontier.pending() > 0 {
                tokio::select! {
                    _ = ctx.cancel.cancelled() => {}
                    _ = tokio::time::sleep(Duration::from_millis(interval)) => {}
                }
            }
        }
    }

    tracing::debug!("Worker {} exiting", id);
}

/// Processes one job: depth and same-site checks, then the page visit.
///
/// The buffer borrowed for the visit is returned on every path.
async fn process_job(ctx: &WorkerContext, job: &Job) {
    let max_depth = ctx.config.depth;
    if max_depth != 0 && job.depth > max_depth {
        tracing::debug!("Skipping {} at depth {} (max {})", job.url, job.depth, max_depth);
        return;
    }

    if ctx.config.base {
        let on_seed_host = match extract_hostname(&job.url) {
            Some(host) => ctx.frontier.is_base_host(&host),
            None => false,
        };
        if !on_seed_host {
            tracing::debug!("Skipping {}: outside the seed hosts", job.url);
            return;
        }
    }

    let mut buf = ctx.pool.acquire();
    visit(ctx, job, &mut buf).await;
    ctx.pool.release(buf);
}

/// Fetches one page and expands its links into the frontier.
async fn visit(ctx: &WorkerContext, job: &Job, buf: &mut Vec<u8>) {
    if let Err(e) = fetch_page(&ctx.client, &job.url, buf, &ctx.cancel).await {
        if !e.is_canceled() {
            tracing::debug!("Fetch failed for {}: {}", job.url, e);
        }
        return;
    }

    let page = ctx.extractor.extract(&job.url, buf);

    let mut children = Vec::new();
    for url in page.urls {
        if ctx.frontier.is_visited(&url) {
            continue;
        }
        if !ctx.filters.allow(&url) {
            tracing::trace!("Filtered out {}", url);
            continue;
        }
        children.push(Job::new(url, job.depth + 1));
    }

    if ctx.cancel.is_cancelled() {
        return;
    }
    if !children.is_empty() || !page.secrets.is_empty() {
        tracing::debug!(
            "{}: {} new links, {} secrets",
            job.url,
            children.len(),
            page.secrets.len()
        );
        ctx.frontier.enqueue(children, page.secrets);
    }
}
