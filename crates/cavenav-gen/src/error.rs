use std::fmt;

/// Errors raised while validating cave generation settings.
#[derive(Debug, Clone, PartialEq)]
pub enum GenError {
    /// A [`CaveInfo`](crate::CaveInfo) or
    /// [`GenerationParams`](crate::GenerationParams) field is out of range.
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },
}

impl GenError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { field, reason } => {
                write!(f, "invalid cave configuration: `{field}` {reason}")
            }
        }
    }
}

impl std::error::Error for GenError {}
