//! Batch execution engine
//!
//! Orchestrates N independent simulation requests above the single-request
//! primitive. Two strategies, selected by `max_concurrency`:
//! - **Sequential** (`max_concurrency == 1`): requests run in order; with
//!   `stop_on_failure` set, iteration stops after the first non-success
//!   result and the results collected so far are returned
//! - **Chunked** (`max_concurrency > 1`): requests run in chunks of that
//!   size; every request in a chunk settles before the chunk is tallied, and
//!   results are placed by original index, not completion order
//!
//! A single request's failure never aborts the batch with an error: it is
//! folded into a synthetic failed result, so callers inspect the batch
//! result instead of catching per-request exceptions. Only an invalid batch
//! configuration rejects the whole operation before any request is issued.

use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::debug;

use crate::{
    client::AltitraceClient,
    enrich::ExecutedSimulation,
    errors::{ClientError, ConfigurationError, ValidationError},
    types::SimulationRequest,
};

/// Configuration of one batch execution
#[derive(Debug, Clone)]
pub struct BatchSimulationConfig {
    /// The simulations to execute, in order
    pub simulations: Vec<SimulationRequest>,

    /// Stop issuing further requests once any result is non-success
    pub stop_on_failure: bool,

    /// Number of requests in flight at once (1 = sequential)
    pub max_concurrency: usize,
}

impl Default for BatchSimulationConfig {
    fn default() -> Self {
        Self { simulations: Vec::new(), stop_on_failure: false, max_concurrency: 1 }
    }
}

impl BatchSimulationConfig {
    /// A sequential batch over the given simulations
    pub fn new(simulations: Vec<SimulationRequest>) -> Self {
        Self { simulations, ..Self::default() }
    }

    pub fn stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

/// Aggregate outcome of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every executed request succeeded
    Success,
    /// Some requests succeeded, some did not
    Partial,
    /// Every executed request failed
    Failed,
}

/// Result of one batch execution
///
/// `success_count + failure_count` always equals `results.len()`;
/// `results.len()` is smaller than the number of configured simulations only
/// when `stop_on_failure` truncated execution.
#[derive(Debug)]
pub struct BatchSimulationResult {
    /// One enriched result per executed request, in request order
    pub results: Vec<ExecutedSimulation>,

    /// Aggregate status derived from the counts
    pub batch_status: BatchStatus,

    /// Number of successful results
    pub success_count: usize,

    /// Number of failed or reverted results
    pub failure_count: usize,

    /// Wall-clock duration from batch start to the final result
    pub total_execution_time: Duration,
}

impl AltitraceClient {
    /// Executes a batch of simulations under the configured strategy
    ///
    /// Rejects only on invalid configuration, before any request is
    /// attempted; per-request failures become synthetic failed results.
    pub async fn simulate_batch(
        &self,
        config: BatchSimulationConfig,
    ) -> Result<BatchSimulationResult, ClientError> {
        if config.simulations.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }
        if config.max_concurrency == 0 {
            return Err(ConfigurationError::ZeroConcurrency.into());
        }

        let started = Instant::now();
        let results = if config.max_concurrency > 1 {
            self.run_chunked(&config).await
        } else {
            self.run_sequential(&config).await
        };

        let success_count = results.iter().filter(|r| r.is_success()).count();
        let failure_count = results.len() - success_count;
        let batch_status = if failure_count == 0 {
            BatchStatus::Success
        } else if success_count == 0 {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial
        };

        debug!(
            target: "altitrace::batch",
            executed = results.len(),
            success_count,
            failure_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );

        Ok(BatchSimulationResult {
            results,
            batch_status,
            success_count,
            failure_count,
            total_execution_time: started.elapsed(),
        })
    }

    async fn run_sequential(&self, config: &BatchSimulationConfig) -> Vec<ExecutedSimulation> {
        let mut results = Vec::with_capacity(config.simulations.len());
        for (index, request) in config.simulations.iter().enumerate() {
            let executed = self.execute_settled(request).await;
            let failed = !executed.is_success();
            results.push(executed);
            if failed && config.stop_on_failure {
                debug!(target: "altitrace::batch", index, "stopping batch on failure");
                break;
            }
        }
        results
    }

    async fn run_chunked(&self, config: &BatchSimulationConfig) -> Vec<ExecutedSimulation> {
        let mut results = Vec::with_capacity(config.simulations.len());
        for chunk in config.simulations.chunks(config.max_concurrency) {
            // join_all preserves input order, so results land by original
            // index regardless of completion order inside the chunk
            let chunk_results =
                join_all(chunk.iter().map(|request| self.execute_settled(request))).await;
            let chunk_failed = chunk_results.iter().any(|r| !r.is_success());
            results.extend(chunk_results);
            if chunk_failed && config.stop_on_failure {
                debug!(target: "altitrace::batch", executed = results.len(), "stopping batch on failure");
                break;
            }
        }
        results
    }

    /// Runs one request and folds any error into a synthetic failed result
    async fn execute_settled(&self, request: &SimulationRequest) -> ExecutedSimulation {
        match self.execute_simulation(request).await {
            Ok(executed) => executed,
            Err(error) => ExecutedSimulation::from_failure(&error),
        }
    }
}
