//! # Altitrace SDK
//!
//! A typed async client for the Altitrace EVM transaction simulation and
//! tracing API.
//!
//! ## Core Features
//!
//! - **Request Building**
//!   - Fluent builders for simulations, traces and access lists
//!   - Full validation before any network call
//!   - State and block overrides with per-address merging
//!
//! - **Resilient Transport**
//!   - Per-request timeout
//!   - Configurable retry with exponential back-off
//!   - Uniform error classification
//!
//! - **Response Enrichment**
//!   - Gas aggregation and status predicates
//!   - Call-frame tree analysis (depth, counts, accessed accounts)
//!   - Asset change and decoded event summaries
//!
//! - **Batch Execution**
//!   - Sequential and concurrency-limited strategies
//!   - Partial-failure semantics without exceptions
//!
//! ## Features
//!
//! - `rustls-tls`: Uses rustls as the TLS implementation instead of
//!   native-tls (OpenSSL). This is useful for environments where OpenSSL is
//!   not available or not desired.
//!
//!   Usage example:
//!   ```toml
//!   [dependencies]
//!   altitrace-sdk = { version = "0.3", default-features = false, features = ["rustls-tls"] }
//!   ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use altitrace_sdk::{
//!     types::{BlockTag, TransactionCall},
//!     AltitraceClient, ClientConfig,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! // Initialize the client against a local deployment
//! let client = AltitraceClient::new(ClientConfig::local())?;
//!
//! // Simulate an ERC-20 transfer at the latest block
//! let result = client
//!     .simulate()
//!     .call(
//!         TransactionCall::new()
//!             .from("0xC255fC198eEdAC7AF8aF0f6e0ca781794B094A61")
//!             .to("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")
//!             .data("0xa9059cbb"),
//!     )
//!     .block_tag(BlockTag::Latest)
//!     .execute()
//!     .await?;
//!
//! match result.is_success() {
//!     true => {
//!         println!("Simulation succeeded, gas used: {}", result.total_gas_used()?);
//!         for change in result.asset_changes_summary() {
//!             println!("{}: {} ({:?})", change.token_address, change.net_change, change.direction);
//!         }
//!     }
//!     false => {
//!         println!("Simulation failed");
//!     }
//! }
//!
//! // Trace the same call and inspect the call tree
//! let trace = client
//!     .trace()
//!     .call(TransactionCall::new().to("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"))
//!     .with_four_byte_tracer()
//!     .execute()
//!     .await?;
//! println!(
//!     "{} calls, max depth {}, {} accounts touched",
//!     trace.call_count(),
//!     trace.max_depth(),
//!     trace.accessed_accounts().len()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `client`: Client construction and configuration
//! - `builders`: Fluent request builders for each endpoint family
//! - `transport`: HTTP transport, timeout and retry policy
//! - `types`: Wire types shared with the service
//! - `enrich`: Derived accessors over raw results
//! - `batch`: Batch execution strategies
//! - `errors`: Error types and classification
//! - `validation`: Input validators

pub mod batch;
pub mod builders;
pub mod client;
pub mod enrich;
pub mod errors;
pub mod transport;
pub mod types;
pub mod validation;

// Re-export only the essential types and entry points
pub use batch::{BatchSimulationConfig, BatchSimulationResult, BatchStatus};
pub use client::{AltitraceClient, ClientBuilder, ClientConfig};
pub use enrich::{ExecutedAccessList, ExecutedSimulation, ExecutedTrace};
pub use errors::{
    AltitraceApiError, ClientError, ConfigurationError, NetworkError, ValidationError,
};
pub use transport::RetryPolicy;
