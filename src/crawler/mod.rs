//! Crawler module: the concurrent crawl engine
//!
//! This module contains the core crawling machinery, including:
//! - The shared work frontier with completion detection
//! - The fixed pool of worker tasks draining it
//! - HTTP fetching with cancellation support
//! - Page extraction (links and secret patterns)
//! - Overall crawl coordination and graceful shutdown

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod pool;
mod worker;

pub use coordinator::{CrawlReport, Crawler};
pub use extractor::{ExtractedPage, PageExtractor};
pub use fetcher::{build_http_client, fetch_page, FetchError};
pub use frontier::{Frontier, Job};
pub use pool::BufferPool;

use crate::config::Config;
use crate::Result;
use url::Url;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the shared HTTP client and collaborators
/// 2. Seed the frontier with the given URLs
/// 3. Spawn the worker pool and the shutdown watcher
/// 4. Wait for completion (or cancellation)
/// 5. Export discovered secrets and report the counters
///
/// # Arguments
///
/// * `config` - The resolved crawler configuration
/// * `seeds` - Parsed seed URLs
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Final counters of the run
/// * `Err(SpinneretError)` - Setup or export failed
pub async fn crawl(config: Config, seeds: Vec<Url>) -> Result<CrawlReport> {
    let crawler = Crawler::new(config)?;
    crawler.run(seeds).await
}
