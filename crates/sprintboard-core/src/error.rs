use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    UnknownQuery,
    QueryCycle,
    InvalidPattern,
    TransientFetch,
    UnsortedColumn,
    DuplicateItem,
    QueryPoisoned,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::UnknownQuery => "E1002",
            Self::QueryCycle => "E1003",
            Self::InvalidPattern => "E1004",
            Self::TransientFetch => "E2001",
            Self::UnsortedColumn => "E3001",
            Self::DuplicateItem => "E3002",
            Self::QueryPoisoned => "E3003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::UnknownQuery => "Unknown query name",
            Self::QueryCycle => "Query parent chain is cyclic",
            Self::InvalidPattern => "Invalid list-name pattern",
            Self::TransientFetch => "Board request failed",
            Self::UnsortedColumn => "Column not sorted by position",
            Self::DuplicateItem => "Item appears twice in a column",
            Self::QueryPoisoned => "Query already failed in this run",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .sprintboard/config.toml and retry."),
            Self::UnknownQuery => Some("Declare the query under [queries] or fix the name."),
            Self::QueryCycle => Some("Break the loop in the queries' `parent` settings."),
            Self::InvalidPattern => Some("Check the regex syntax under [states]."),
            Self::TransientFetch => Some("Retry the whole pass once the board is reachable."),
            Self::UnsortedColumn | Self::DuplicateItem => {
                Some("Re-fetch the column ordered by position before planning.")
            }
            Self::QueryPoisoned => Some("Start a new run to re-attempt the query."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A failed request against the remote board.
///
/// Raised by board collaborators and propagated unchanged through query
/// evaluation and column maintenance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {message}")]
pub struct FetchError {
    /// The collaborator operation that failed (`column_items`, `move_between`, ...).
    pub operation: String,
    /// Remote-side description of the failure.
    pub message: String,
}

impl FetchError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by the classification and ordering core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SprintError {
    /// A query name (or parent name) that was never declared.
    #[error("unknown query '{0}'")]
    UnknownQuery(String),

    /// The `parent` links of the declared queries form a loop.
    #[error("query parent chain is cyclic: {}", .path.join(" -> "))]
    QueryCycle { path: Vec<String> },

    /// A configured list-name regex failed to compile.
    #[error("invalid pattern for {field}: {message}")]
    InvalidPattern { field: String, message: String },

    /// The configuration file could not be parsed.
    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The planner was handed a column that is not ordered by position.
    #[error("column not sorted by position at index {index} ({previous} then {current})")]
    UnsortedColumn {
        index: usize,
        previous: f64,
        current: f64,
    },

    /// The planner was handed the same item twice.
    #[error("item {0} appears more than once in the column")]
    DuplicateItem(String),

    /// The query was attempted earlier in this run and failed.
    #[error("query '{0}' failed earlier in this run")]
    QueryPoisoned(String),
}

impl SprintError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownQuery(_) => ErrorCode::UnknownQuery,
            Self::QueryCycle { .. } => ErrorCode::QueryCycle,
            Self::InvalidPattern { .. } => ErrorCode::InvalidPattern,
            Self::ConfigParse(_) => ErrorCode::ConfigParseError,
            Self::Fetch(_) => ErrorCode::TransientFetch,
            Self::UnsortedColumn { .. } => ErrorCode::UnsortedColumn,
            Self::DuplicateItem(_) => ErrorCode::DuplicateItem,
            Self::QueryPoisoned(_) => ErrorCode::QueryPoisoned,
        }
    }

    /// Configuration errors are fatal and must never be retried.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownQuery(_)
                | Self::QueryCycle { .. }
                | Self::InvalidPattern { .. }
                | Self::ConfigParse(_)
        )
    }

    /// Whether a fresh pass might succeed where this one failed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// Remediation hint, falling back to the generic message.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}
