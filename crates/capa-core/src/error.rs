use std::fmt;

use crate::model::{ActionId, CategoryId, ChainId};

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    CaseFileParseError,
    CategoryNotFound,
    ChainNotFound,
    ActionNotFound,
    IndexOutOfRange,
    InvalidEnumValue,
    MissingPrecondition,
    AssistantFailed,
    ArtifactWriteFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::CaseFileParseError => "E1002",
            Self::CategoryNotFound => "E2001",
            Self::ChainNotFound => "E2002",
            Self::ActionNotFound => "E2003",
            Self::IndexOutOfRange => "E2004",
            Self::InvalidEnumValue => "E2005",
            Self::MissingPrecondition => "E3001",
            Self::AssistantFailed => "E4001",
            Self::ArtifactWriteFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::CaseFileParseError => "Case file parse error",
            Self::CategoryNotFound => "Fishbone category not found",
            Self::ChainNotFound => "Five-Why analysis not found",
            Self::ActionNotFound => "Action item not found",
            Self::IndexOutOfRange => "Row index out of range",
            Self::InvalidEnumValue => "Invalid status/priority/severity value",
            Self::MissingPrecondition => "Required field is empty",
            Self::AssistantFailed => "Text assistant request failed",
            Self::ArtifactWriteFailed => "Report artifact write failed",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .capa/config.toml or the user config and retry."),
            Self::CaseFileParseError => {
                Some("Run `capa init` to see a valid case file template.")
            }
            Self::CategoryNotFound | Self::ChainNotFound | Self::ActionNotFound => None,
            Self::IndexOutOfRange => Some("Re-read the row list; it may have shifted."),
            Self::InvalidEnumValue => {
                Some("Use one of the documented status/priority/severity values.")
            }
            Self::MissingPrecondition => Some("Fill in the named field first."),
            Self::AssistantFailed => Some("Retry the request; nothing was changed."),
            Self::ArtifactWriteFailed => Some("Check disk space and write permissions."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Structural failures of a session mutation. State is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaseError {
    #[error("fishbone category {0} not found")]
    CategoryNotFound(CategoryId),

    #[error("five-why analysis {0} not found")]
    ChainNotFound(ChainId),

    #[error("action {0} not found")]
    ActionNotFound(ActionId),

    #[error("cause index {index} out of range for category {category} ({len} causes)")]
    CauseIndexOutOfRange {
        category: CategoryId,
        index: usize,
        len: usize,
    },

    #[error("why index {index} out of range for analysis {chain} ({len} steps)")]
    WhyIndexOutOfRange {
        chain: ChainId,
        index: usize,
        len: usize,
    },

    #[error("invalid {expected}: '{got}'")]
    InvalidEnum { expected: &'static str, got: String },
}

impl CaseError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::CategoryNotFound(_) => ErrorCode::CategoryNotFound,
            Self::ChainNotFound(_) => ErrorCode::ChainNotFound,
            Self::ActionNotFound(_) => ErrorCode::ActionNotFound,
            Self::CauseIndexOutOfRange { .. } | Self::WhyIndexOutOfRange { .. } => {
                ErrorCode::IndexOutOfRange
            }
            Self::InvalidEnum { .. } => ErrorCode::InvalidEnumValue,
        }
    }
}

impl From<crate::model::ParseEnumError> for CaseError {
    fn from(err: crate::model::ParseEnumError) -> Self {
        Self::InvalidEnum {
            expected: err.expected,
            got: err.got,
        }
    }
}

/// A derived request was made before its upstream field was filled in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("problem description is empty")]
    MissingDescription,

    #[error("fishbone category {0} has no name")]
    MissingCategoryName(CategoryId),

    #[error("answer {label} first")]
    MissingPreviousWhy { chain: ChainId, label: String },

    #[error("action {0} has no root-cause reference selected")]
    MissingRootCause(ActionId),

    #[error("nothing to enhance: the field is blank")]
    BlankText,

    #[error("{operation} is not available for {target}")]
    Unsupported {
        operation: &'static str,
        target: &'static str,
    },
}

/// Failure of an assistant exchange. The session is never modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Target(#[from] CaseError),

    #[error("text assistant failed: {0}")]
    Failed(String),
}

impl PreconditionError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        ErrorCode::MissingPrecondition
    }
}

impl AssistError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Precondition(err) => err.error_code(),
            Self::Target(err) => err.error_code(),
            Self::Failed(_) => ErrorCode::AssistantFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AssistError, CaseError, ErrorCode, PreconditionError};
    use crate::model::{CategoryId, ChainId};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::CaseFileParseError,
            ErrorCode::CategoryNotFound,
            ErrorCode::ChainNotFound,
            ErrorCode::ActionNotFound,
            ErrorCode::IndexOutOfRange,
            ErrorCode::InvalidEnumValue,
            ErrorCode::MissingPrecondition,
            ErrorCode::AssistantFailed,
            ErrorCode::ArtifactWriteFailed,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::IndexOutOfRange.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn case_errors_map_to_codes() {
        let err = CaseError::CauseIndexOutOfRange {
            category: CategoryId::from_raw(7),
            index: 3,
            len: 1,
        };
        assert_eq!(err.error_code(), ErrorCode::IndexOutOfRange);
        assert_eq!(
            err.to_string(),
            "cause index 3 out of range for category cat-7 (1 causes)"
        );
    }

    #[test]
    fn assist_errors_keep_their_source_code() {
        let missing: AssistError = PreconditionError::MissingPreviousWhy {
            chain: ChainId::from_raw(2),
            label: "Why #2".into(),
        }
        .into();
        assert_eq!(missing.error_code(), ErrorCode::MissingPrecondition);
        assert_eq!(missing.to_string(), "answer Why #2 first");

        let gone: AssistError = CaseError::ChainNotFound(ChainId::from_raw(2)).into();
        assert_eq!(gone.error_code(), ErrorCode::ChainNotFound);

        let failed = AssistError::Failed("timeout".into());
        assert_eq!(failed.error_code(), ErrorCode::AssistantFailed);
    }
}
