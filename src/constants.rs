#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Maximum grade any single report can award.
pub const TOTAL_GRADE: u32 = 100;

/// Default wall-clock limit for one invocation of a submission, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Submission archive extensions the runner accepts.
pub const ACCEPTED_SUBMISSIONS: &[&str] = &["jar", "zip"];

/// Extension of token and fact record files.
pub const RECORD_EXTENSION: &str = "json";

/// Suffix of the per-case run status written next to each record.
pub const STATUS_SUFFIX: &str = ".status.json";

/// Diagnostic used for a case whose run exceeded the deadline.
pub const TIMEOUT_DETAIL: &str = "timeout";

/// Flags passed to the Java launcher ahead of `-jar`.
pub const JAVA_FLAGS: &[&str] = &["--enable-preview", "-jar"];
