use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    TariffRequired,
    NonFinite { field: &'static str },
    UnknownHandle { kind: &'static str, index: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::TariffRequired => {
                write!(f, "either a tariff id or a non-empty tariff list is required")
            }
            Self::NonFinite { field } => write!(f, "{field} must be a finite number"),
            Self::UnknownHandle { kind, index } => {
                write!(f, "unknown {kind} handle: {index}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
