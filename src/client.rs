//! Client configuration and entry point
//!
//! [`AltitraceClient`] is the handle everything starts from: it owns the
//! shared transport configuration and hands out request builders. The
//! configuration is validated once at construction; a client is cheap to
//! clone and safe to share across tasks.

use std::{collections::HashMap, sync::Arc, time::Duration};

use url::Url;

use crate::{
    builders::{AccessListBuilder, SimulationBuilder, TraceBuilder},
    enrich::ExecutedSimulation,
    errors::{ClientError, ConfigurationError},
    transport::{ApiConnection, HttpTransport, ReqwestTransport, RetryPolicy},
    types::{HealthStatus, SimulationRequest, SimulationResult},
};

pub(crate) mod endpoints {
    pub const SIMULATE: &str = "/simulate";
    pub const SIMULATE_BATCH: &str = "/simulate/batch";
    pub const ACCESS_LIST: &str = "/simulate/access-list";
    pub const TRACE_TX: &str = "/trace/tx";
    pub const TRACE_CALL: &str = "/trace/call";
    pub const TRACE_CALL_MANY: &str = "/trace/call-many";
    pub const HEALTH: &str = "/health";
}

/// Client configuration accepted at construction
///
/// Named presets are plain constructors; there is no module-level default
/// client, so two clients with different configurations never interfere.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service, including any version prefix
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Retry policy applied to every request
    pub retry: RetryPolicy,

    /// Log request and response bodies at debug level
    pub debug: bool,

    /// Default headers attached to every request
    pub headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/v1".to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            debug: false,
            headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at the given base URL, defaults elsewhere
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Preset for a locally running service
    pub fn local() -> Self {
        Self::default()
    }

    /// Preset for a hosted deployment
    pub fn hosted(base_url: impl Into<String>) -> Self {
        Self::new(base_url)
    }

    /// Validates the configuration and returns the parsed base URL
    pub fn validate(&self) -> Result<Url, ConfigurationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigurationError::InvalidBaseUrl(self.base_url.clone()));
        }
        let url = Url::parse(&self.base_url)
            .map_err(|_| ConfigurationError::InvalidBaseUrl(self.base_url.clone()))?;
        if self.timeout.is_zero() {
            return Err(ConfigurationError::ZeroTimeout);
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigurationError::ZeroAttempts);
        }
        Ok(url)
    }
}

/// Fluent constructor for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    /// Validates the accumulated configuration and builds the client
    pub fn build(self) -> Result<AltitraceClient, ConfigurationError> {
        AltitraceClient::new(self.config)
    }
}

/// Typed async client for the Altitrace simulation and trace API
#[derive(Clone)]
pub struct AltitraceClient {
    connection: Arc<ApiConnection>,
}

impl std::fmt::Debug for AltitraceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AltitraceClient").finish_non_exhaustive()
    }
}

impl AltitraceClient {
    /// Creates a client over the production HTTP transport
    pub fn new(config: ClientConfig) -> Result<Self, ConfigurationError> {
        let base_url = config.validate()?;
        let transport =
            ReqwestTransport::new(base_url, config.timeout, config.headers.clone());
        Ok(Self::assemble(config, Arc::new(transport)))
    }

    /// Creates a client over a caller-supplied transport
    ///
    /// The main use is substituting a scripted transport in tests; the retry
    /// policy and envelope handling still apply.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self::assemble(config, transport))
    }

    fn assemble(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let connection = ApiConnection::new(transport, config.retry.clone(), config.debug);
        Self { connection: Arc::new(connection) }
    }

    /// Starts a fluent configuration chain
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Starts building a simulation request
    pub fn simulate(&self) -> SimulationBuilder {
        SimulationBuilder::new(Arc::clone(&self.connection))
    }

    /// Starts building a trace request
    pub fn trace(&self) -> TraceBuilder {
        TraceBuilder::new(Arc::clone(&self.connection))
    }

    /// Starts building an access-list request
    pub fn access_list(&self) -> AccessListBuilder {
        AccessListBuilder::new(Arc::clone(&self.connection))
    }

    /// Queries the service health endpoint
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.connection.get_json(endpoints::HEALTH).await
    }

    /// Executes one already-built simulation request
    ///
    /// This is the single-execution primitive the batch engine folds over;
    /// builders call it from their `execute()`.
    pub async fn execute_simulation(
        &self,
        request: &SimulationRequest,
    ) -> Result<ExecutedSimulation, ClientError> {
        request.validate()?;
        let result: SimulationResult =
            self.connection.post_json(endpoints::SIMULATE, request).await?;
        Ok(ExecutedSimulation::new(result))
    }

    /// Submits several simulations in one round trip to the batch endpoint
    ///
    /// All requests are validated up front; the service executes them as a
    /// unit and returns one result per request. For client-side concurrency
    /// control and partial-failure semantics, use
    /// [`simulate_batch`](Self::simulate_batch) instead.
    pub async fn simulate_many(
        &self,
        requests: &[SimulationRequest],
    ) -> Result<Vec<ExecutedSimulation>, ClientError> {
        if requests.is_empty() {
            return Err(crate::errors::ValidationError::EmptyBatch.into());
        }
        for request in requests {
            request.validate()?;
        }
        let results: Vec<SimulationResult> =
            self.connection.post_json(endpoints::SIMULATE_BATCH, &requests).await?;
        Ok(results.into_iter().map(ExecutedSimulation::new).collect())
    }
}
