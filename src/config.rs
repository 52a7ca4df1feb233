#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    num::NonZeroUsize,
    path::PathBuf,
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};

use anyhow::{Context, Result};
use tracing::warn;

use crate::{constants::DEFAULT_TIMEOUT_SECS, grade::LexScoring};

/// Runtime configuration shared across the crate.
#[derive(Debug)]
pub struct GraderConfig {
    /// Java launcher used to run submissions.
    java:        PathBuf,
    /// Wall-clock limit for a single run of a submission.
    timeout:     Duration,
    /// Number of test cases run concurrently.
    jobs:        NonZeroUsize,
    /// Denominator policy for lexer grades.
    lex_scoring: LexScoring,
}

impl GraderConfig {
    /// Reads the configuration from the environment.
    fn from_env() -> Result<Self> {
        let java = match std::env::var_os("YCC_JAVA") {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => which::which("java").context("Cannot find a Java runtime on PATH")?,
        };

        let jobs = std::env::var("YCC_JOBS")
            .ok()
            .and_then(|value| value.trim().parse::<NonZeroUsize>().ok())
            .or_else(|| std::thread::available_parallelism().ok())
            .unwrap_or(NonZeroUsize::MIN);

        let lex_scoring = match std::env::var("YCC_LEX_SCORING") {
            Ok(value) => value.parse::<LexScoring>().unwrap_or_else(|e| {
                warn!("{e}, falling back to the default");
                LexScoring::default()
            }),
            Err(_) => LexScoring::default(),
        };

        Ok(Self {
            java,
            timeout: read_timeout_secs("YCC_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            jobs,
            lex_scoring,
        })
    }

    /// Returns the Java launcher.
    pub fn java(&self) -> &PathBuf {
        &self.java
    }

    /// Returns the per-run timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the concurrency limit for test cases.
    pub fn jobs(&self) -> NonZeroUsize {
        self.jobs
    }

    /// Returns the lexer scoring policy.
    pub fn lex_scoring(&self) -> LexScoring {
        self.lex_scoring
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone, Debug)]
pub struct ConfigHandle(Arc<GraderConfig>);

impl std::ops::Deref for ConfigHandle {
    type Target = GraderConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<GraderConfig>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<GraderConfig>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been initialized and return a handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let mut guard = slot()
        .lock()
        .map_err(|_| anyhow::anyhow!("config slot poisoned"))?;
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = Arc::new(GraderConfig::from_env()?);
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}

/// Parses an environment variable into a `Duration`, falling back to
/// `default_secs` when parsing fails or the variable is missing.
fn read_timeout_secs(env: &str, default_secs: u64) -> Duration {
    std::env::var(env)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default_secs))
}
