use std::fmt;
use url::Url;

/// One row of the link CSV, ready to be checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInput {
    pub url: Url,

    /// Page the link was found on; empty when the input has none
    pub parent_url: String,

    /// Line of the row in the source CSV (the header is line 1)
    pub line_number: u64,
}

/// Why a check produced no status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timeout,
    ConnectionError,
    SslError,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "Timeout",
            Self::ConnectionError => "ConnectionError",
            Self::SslError => "SSLError",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a check observed: a status code or a transport error, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Status {
        code: u16,
        /// Content-Type header, empty when absent
        content_type: String,
    },
    Error(ErrorKind),
}

impl CheckOutcome {
    pub fn status(code: u16, content_type: impl Into<String>) -> Self {
        Self::Status {
            code,
            content_type: content_type.into(),
        }
    }
}

/// Final result of checking one input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub url: Url,
    pub parent_url: String,
    pub line_number: u64,
    pub outcome: CheckOutcome,

    /// Number of requests issued, including the first
    pub attempts: u32,
}

impl CheckResult {
    pub fn new(input: CheckInput, outcome: CheckOutcome, attempts: u32) -> Self {
        Self {
            url: input.url,
            parent_url: input.parent_url,
            line_number: input.line_number,
            outcome,
            attempts,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match &self.outcome {
            CheckOutcome::Status { code, .. } => Some(*code),
            CheckOutcome::Error(_) => None,
        }
    }

    pub fn content_type(&self) -> &str {
        match &self.outcome {
            CheckOutcome::Status { content_type, .. } => content_type,
            CheckOutcome::Error(_) => "",
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            CheckOutcome::Status { .. } => None,
            CheckOutcome::Error(kind) => Some(*kind),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// True for transport errors and for any status outside 2xx/3xx
    pub fn is_broken(&self) -> bool {
        match self.status_code() {
            Some(code) => !(200..400).contains(&code),
            None => true,
        }
    }

    /// Short label for logs: the status code or the error kind
    pub fn label(&self) -> String {
        match &self.outcome {
            CheckOutcome::Status { code, .. } => code.to_string(),
            CheckOutcome::Error(kind) => kind.to_string(),
        }
    }
}
