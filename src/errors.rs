//! Error types for the Altitrace client
//!
//! This module defines a comprehensive error handling system that covers:
//! - Request validation errors (raised before any I/O)
//! - Network-level transport failures
//! - Semantic failures reported by the API
//! - Client configuration errors

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for the Altitrace client
///
/// Encompasses all possible errors that can occur while building and
/// executing requests, providing a unified error handling interface for users.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request failed validation before any network call was made
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Transport-level failure (timeout, connection, malformed body)
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// The service responded but signaled a semantic failure
    #[error("API error: {0}")]
    Api(#[from] AltitraceApiError),

    /// Invalid client configuration at construction time
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),
}

impl ClientError {
    /// HTTP status code associated with this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => Some(api.status),
            _ => None,
        }
    }
}

/// Validation errors raised synchronously before any I/O
///
/// These errors are deterministic and reproducible from the request
/// input alone; the transport is never invoked when one is raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Malformed account or contract address
    #[error("Invalid address '{0}': expected 0x-prefixed 40 hex characters")]
    InvalidAddress(String),

    /// Malformed hex-encoded byte string
    #[error("Invalid hex data '{0}'")]
    InvalidHex(String),

    /// Malformed hex-encoded numeric quantity
    #[error("Invalid hex quantity '{0}': expected 0x-prefixed hex digits")]
    InvalidQuantity(String),

    /// Malformed transaction hash
    #[error("Invalid transaction hash '{0}': expected 0x-prefixed 64 hex characters")]
    InvalidHash(String),

    /// Malformed block selector (neither a tag nor a hex number)
    #[error("Invalid block selector '{0}': expected a block tag or 0x-prefixed hex number")]
    InvalidBlockSelector(String),

    /// A simulation requires at least one transaction call
    #[error("At least one call is required")]
    NoCalls,

    /// A batch requires at least one simulation
    #[error("Batch must contain at least one simulation")]
    EmptyBatch,

    /// A call-many trace requires at least one bundle
    #[error("At least one bundle is required")]
    NoBundles,

    /// A call-many bundle requires at least one transaction
    #[error("Each bundle requires at least one transaction")]
    EmptyBundle,

    /// Block number and block tag were both supplied
    #[error("Cannot specify both 'blockNumber' and 'blockTag' - they are mutually exclusive")]
    BlockSelectorConflict,

    /// Asset tracing was requested without an account to track
    #[error("Account parameter is required when traceAssetChanges or traceTransfers is enabled")]
    AccountRequired,

    /// A state override supplied both full and differential storage
    #[error("Cannot specify both 'state' and 'stateDiff' - they are mutually exclusive")]
    StateOverrideConflict,

    /// A state override is missing its target address
    #[error("State override requires an address")]
    StateOverrideMissingAddress,
}

/// Transport-level failures
///
/// These errors occur while a request is in flight. All kinds except
/// [`MalformedBody`](NetworkError::MalformedBody) are considered transient
/// and may be retried by the configured policy.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The connection could not be established (refused, DNS, TLS)
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The request failed while in flight
    #[error("Request failed: {0}")]
    Request(String),

    /// The response body could not be decoded into the expected shape
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

impl NetworkError {
    /// Whether the retry policy may treat this failure as transient
    ///
    /// A body that arrived but cannot be decoded will not get better on
    /// retry, so it is always terminal.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::MalformedBody(_))
    }
}

/// Semantic failure reported by the Altitrace API
///
/// The service responded with `success: false` (or a non-2xx status) and a
/// machine-readable error code. Retryable only if the associated HTTP status
/// is in the policy's retryable set.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct AltitraceApiError {
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Suggested resolution or workaround, if the service provided one
    pub suggestion: Option<String>,
    /// HTTP status code the error arrived with
    pub status: u16,
}

impl AltitraceApiError {
    /// Build an error from a bare HTTP status when no envelope was decodable
    pub fn from_status(status: u16, body: &str) -> Self {
        let mut message: String = body.trim().chars().take(256).collect();
        if message.is_empty() {
            message = format!("HTTP {status}");
        }
        Self { code: format!("HTTP_{status}"), message, suggestion: None, status }
    }
}

/// Client configuration errors
///
/// Raised when constructing a client from an invalid configuration,
/// before any request can be issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The base URL is not an absolute http(s) URL
    #[error("Invalid base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),

    /// The request timeout must be strictly positive
    #[error("Timeout must be positive")]
    ZeroTimeout,

    /// The retry policy must allow at least one attempt
    #[error("Retry policy must allow at least one attempt")]
    ZeroAttempts,

    /// Batch concurrency must be at least one
    #[error("Batch concurrency must be at least 1")]
    ZeroConcurrency,
}
