//! Centralized Error Handling Module
//!
//! Errors only exist at the edges (snapshot loading, address parsing, CLI).
//! Indicator evaluators never fail; missing data becomes an inconclusive finding.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - SNAPSHOT_xxx: input document errors
//! - INPUT_xxx: malformed input fields
//! - CFG_xxx: configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Snapshot Errors
    // ============================================
    /// Snapshot file could not be read
    SnapshotIo,
    /// Snapshot document is not valid JSON / wrong shape
    SnapshotParse,

    // ============================================
    // Input Errors
    // ============================================
    /// ABI text could not be parsed (normalised to "no ABI" by callers)
    AbiMalformed,
    /// Address field is not a 20-byte hex address
    InvalidAddress,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SnapshotIo => "SNAPSHOT_IO",
            Self::SnapshotParse => "SNAPSHOT_PARSE",
            Self::AbiMalformed => "ABI_MALFORMED",
            Self::InvalidAddress => "INPUT_INVALID_ADDRESS",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    pub fn snapshot_io(path: impl fmt::Display, source: std::io::Error) -> Self {
        Self::with_source(
            ErrorCode::SnapshotIo,
            format!("Cannot read snapshot {}", path),
            source,
        )
    }

    pub fn abi_malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::AbiMalformed, msg)
    }

    pub fn invalid_address(raw: &str) -> Self {
        Self::new(ErrorCode::InvalidAddress, format!("Invalid address: {}", raw))
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }
}

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorCode::SnapshotParse,
            format!("Invalid snapshot document: {}", err),
            err,
        )
    }
}
