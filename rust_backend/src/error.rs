//! Error types for the modal-day pipeline.
//!
//! Every failure carries an [`ErrorContext`] describing the operation that
//! rejected its input, so the rendering layer can surface a precise message
//! instead of drawing a broken chart.

use std::fmt;

/// Result type for pipeline operations
pub type ModalResult<T> = Result<T, ModalError>;

/// Structured context for pipeline errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "bin_readings", "set_date_range")
    pub operation: Option<String>,
    /// The offending field or setting, if any
    pub field: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the offending field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref field) = self.field {
            parts.push(format!("field={}", field));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for pipeline operations.
///
/// An empty dataset is deliberately absent: empty input always degrades to
/// empty output.
#[derive(Debug, thiserror::Error)]
pub enum ModalError {
    /// A caller handed the pipeline an argument outside its contract
    /// (non-positive bin width, a window with `start >= end`, ...).
    #[error("Invalid argument: {message} {context}")]
    InvalidArgument {
        message: String,
        context: ErrorContext,
    },

    /// Preferences could not be read, parsed or validated.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Raw device data could not be ingested.
    #[error("Parse error: {message} {context}")]
    Parse {
        message: String,
        context: ErrorContext,
    },
}

impl ModalError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an invalid argument error with context.
    pub fn invalid_argument_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            context,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a configuration error with context.
    pub fn configuration_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Configuration {
            message: message.into(),
            context,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a parse error with context.
    pub fn parse_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Parse {
            message: message.into(),
            context,
        }
    }

    /// The structured context attached to this error.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InvalidArgument { context, .. }
            | Self::Configuration { context, .. }
            | Self::Parse { context, .. } => context,
        }
    }

    /// Whether this error was raised by argument validation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
