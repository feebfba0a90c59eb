//! Response envelope shared by every Altitrace endpoint

use serde::{Deserialize, Serialize};

use crate::errors::AltitraceApiError;

/// Standard response wrapper returned by all endpoints
///
/// Provides a consistent format across the API: success/failure indication,
/// the data payload, error information, and request metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Indicates whether the request was processed successfully
    pub success: bool,

    /// The response data (present only on successful requests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error information (present only on failed requests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,

    /// Request metadata and timing information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

/// Detailed error information for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Machine-readable error code for programmatic handling
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// Suggested resolution or workaround for the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Metadata included with every response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Unique identifier for request tracking and correlation
    pub request_id: String,

    /// UTC timestamp when the response was generated (RFC 3339)
    pub timestamp: String,

    /// Total server-side processing time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<u64>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the envelope into its payload or a typed API error
    ///
    /// `status` is the HTTP status the envelope arrived with; it is attached
    /// to the error so the retry policy can classify it.
    pub fn into_result(self, status: u16) -> Result<T, AltitraceApiError> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(err)) => Err(AltitraceApiError {
                code: err.code,
                message: err.message,
                suggestion: err.suggestion,
                status,
            }),
            _ => Err(AltitraceApiError::from_status(status, "envelope carried neither data nor error")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_successful_envelope() {
        let raw = r#"{
            "success": true,
            "data": {"value": 42},
            "metadata": {"requestId": "req_123", "timestamp": "2025-01-01T00:00:00Z", "executionTime": 45}
        }"#;
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(raw).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.metadata.as_ref().unwrap().request_id, "req_123");
        let data = envelope.into_result(200).unwrap();
        assert_eq!(data["value"], 42);
    }

    #[test]
    fn surfaces_api_error_with_suggestion() {
        let raw = r#"{
            "success": false,
            "error": {
                "code": "INVALID_TRANSACTION",
                "message": "Transaction validation failed",
                "suggestion": "Check the call parameters"
            }
        }"#;
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(raw).unwrap();
        let err = envelope.into_result(400).unwrap_err();
        assert_eq!(err.code, "INVALID_TRANSACTION");
        assert_eq!(err.status, 400);
        assert_eq!(err.suggestion.as_deref(), Some("Check the call parameters"));
    }

    #[test]
    fn empty_envelope_is_an_error() {
        let raw = r#"{"success": true}"#;
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(raw).unwrap();
        assert!(envelope.into_result(200).is_err());
    }
}
