//! Shared test infrastructure: a scripted transport and response fixtures
#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{json, Value};

use altitrace_sdk::{
    errors::NetworkError,
    transport::{HttpTransport, RetryPolicy, TransportRequest, TransportResponse},
    AltitraceClient, ClientConfig,
};

/// One scripted outcome of a transport invocation
pub enum MockOutcome {
    Response(TransportResponse),
    Error(NetworkError),
}

impl MockOutcome {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Response(TransportResponse { status: 200, body: body.into() })
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Response(TransportResponse { status, body: body.into() })
    }

    pub fn connect_error() -> Self {
        Self::Error(NetworkError::Connect("connection refused".into()))
    }
}

/// Transport that replays scripted outcomes and counts invocations
pub struct MockTransport {
    outcomes: Mutex<VecDeque<MockOutcome>>,
    invocations: AtomicUsize,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new(outcomes: Vec<MockOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            invocations: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Number of times the transport was invoked
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Paths of every request seen, in order
    pub fn seen_paths(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|r| r.path.clone()).collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, NetworkError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        match self.outcomes.lock().unwrap().pop_front() {
            Some(MockOutcome::Response(response)) => Ok(response),
            Some(MockOutcome::Error(error)) => Err(error),
            None => panic!("mock transport exhausted: more requests than scripted outcomes"),
        }
    }
}

/// Client over a scripted transport with near-zero retry delays
pub fn test_client(transport: Arc<MockTransport>) -> AltitraceClient {
    let config = ClientConfig {
        retry: RetryPolicy::default()
            .with_delays(Duration::from_millis(1), Duration::from_millis(2)),
        ..ClientConfig::default()
    };
    AltitraceClient::with_transport(config, transport).expect("test config is valid")
}

/// Same as [`test_client`] but with an explicit attempt budget
pub fn test_client_with_attempts(
    transport: Arc<MockTransport>,
    max_attempts: u32,
) -> AltitraceClient {
    let config = ClientConfig {
        retry: RetryPolicy::default()
            .with_max_attempts(max_attempts)
            .with_delays(Duration::from_millis(1), Duration::from_millis(2)),
        ..ClientConfig::default()
    };
    AltitraceClient::with_transport(config, transport).expect("test config is valid")
}

/// Wraps a payload in a successful response envelope
pub fn success_envelope(data: Value) -> String {
    json!({
        "success": true,
        "data": data,
        "metadata": {
            "requestId": "req_test",
            "timestamp": "2025-01-01T00:00:00Z",
            "executionTime": 12
        }
    })
    .to_string()
}

/// A failure envelope with the given error code
pub fn error_envelope(code: &str, message: &str) -> String {
    json!({
        "success": false,
        "error": {"code": code, "message": message}
    })
    .to_string()
}

/// A minimal successful simulation result payload
pub fn simulation_result_json(id: &str, status: &str, gas_used: &str) -> Value {
    json!({
        "simulationId": id,
        "blockNumber": "0x123abd",
        "status": status,
        "calls": [{
            "callIndex": 0,
            "status": if status == "success" { "success" } else { "reverted" },
            "returnData": "0x01",
            "gasUsed": gas_used,
            "logs": []
        }],
        "gasUsed": gas_used,
        "blockGasUsed": gas_used
    })
}

/// A three-level nested call-trace payload
///
/// The root frame's own gasUsed (0x5208 = 21000) already includes its
/// descendants; the frame-wise sum (21000 + 20000 + 5000) is deliberately
/// larger to expose double-counting.
pub fn nested_trace_json() -> Value {
    json!({
        "callTracer": {
            "rootCall": {
                "callType": "CALL",
                "from": "0xc255fc198eedac7af8af0f6e0ca781794b094a61",
                "to": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
                "value": "0x0",
                "gas": "0x7a120",
                "gasUsed": "0x5208",
                "input": "0xa9059cbb0000",
                "output": "0x01",
                "depth": 0,
                "reverted": false,
                "calls": [{
                    "callType": "DELEGATECALL",
                    "from": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
                    "to": "0xbb00000000000000000000000000000000000001",
                    "value": "0x0",
                    "gas": "0x4e20",
                    "gasUsed": "0x4e20",
                    "input": "0x70a082310000",
                    "output": "0x",
                    "depth": 1,
                    "reverted": false,
                    "calls": [{
                        "callType": "STATICCALL",
                        "from": "0xbb00000000000000000000000000000000000001",
                        "to": "0xbb00000000000000000000000000000000000002",
                        "value": "0x0",
                        "gas": "0x1388",
                        "gasUsed": "0x1388",
                        "input": "0x",
                        "output": "0x",
                        "depth": 2,
                        "reverted": false,
                        "calls": []
                    }]
                }]
            },
            "totalCalls": 3,
            "maxDepth": 2
        }
    })
}
