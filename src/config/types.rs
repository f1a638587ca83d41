use serde::Deserialize;
use std::path::PathBuf;

/// Default maximum crawl depth.
pub const DEFAULT_DEPTH: u32 = 2;

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 10;

/// Resolved crawler settings for one run
///
/// Built by layering: defaults, then an optional config file, then
/// explicit command-line flags.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum crawl depth from the seeds; 0 disables the bound
    pub depth: u32,

    /// Number of concurrent workers draining the frontier
    pub workers: usize,

    /// Restrict fetches to the hostnames of the seed URLs
    pub base: bool,

    /// Hostname globs a discovered URL must match one of (empty = no
    /// allow-list)
    pub allowed_domains: Vec<String>,

    /// Hostname globs that reject a discovered URL
    pub disallowed_domains: Vec<String>,

    /// Directory discovered secrets are exported to; no export when unset
    pub output: Option<PathBuf>,

    /// Milliseconds each worker pauses between jobs; no pause when unset
    pub interval: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            workers: DEFAULT_WORKERS,
            base: false,
            allowed_domains: Vec::new(),
            disallowed_domains: Vec::new(),
            output: None,
            interval: None,
        }
    }
}

/// On-disk configuration overlay
///
/// Every field is optional, so only values the file actually sets
/// override the layer below during [`Config::merge_file`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub depth: Option<u32>,

    pub workers: Option<usize>,

    pub base: Option<bool>,

    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Option<Vec<String>>,

    #[serde(rename = "disallowed-domains")]
    pub disallowed_domains: Option<Vec<String>>,

    pub output: Option<PathBuf>,

    pub interval: Option<u64>,
}

impl Config {
    /// Merges a file overlay over these settings; explicit fields win
    pub fn merge_file(&mut self, file: ConfigFile) {
        if let Some(depth) = file.depth {
            self.depth = depth;
        }
        if let Some(workers) = file.workers {
            self.workers = workers;
        }
        if let Some(base) = file.base {
            self.base = base;
        }
        if let Some(allowed) = file.allowed_domains {
            self.allowed_domains = allowed;
        }
        if let Some(disallowed) = file.disallowed_domains {
            self.disallowed_domains = disallowed;
        }
        if let Some(output) = file.output {
            self.output = Some(output);
        }
        if let Some(interval) = file.interval {
            self.interval = Some(interval);
        }
    }
}
