//! Configuration for template parsing

/// What to do when a field of one record cannot be extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the whole parse on the first failing field
    #[default]
    FailFast,
    /// Drop the failing record and keep going
    ///
    /// Unsupported type names still abort, since every record would fail.
    SkipRecord,
}

/// Configuration options for [`Template::parse_with`](super::Template::parse_with)
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    pub error_policy: ErrorPolicy,

    /// Stop after this many records
    pub limit: Option<usize>,
}

impl ParseConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error policy
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Skip records with failing fields instead of aborting
    pub fn skip_invalid(self) -> Self {
        self.with_error_policy(ErrorPolicy::SkipRecord)
    }

    /// Limit the number of records returned
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
