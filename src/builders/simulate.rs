//! Builder for simulation requests

use std::sync::Arc;

use crate::{
    client::endpoints,
    enrich::ExecutedSimulation,
    errors::{ClientError, ValidationError},
    transport::ApiConnection,
    types::{
        BlockOverrides, BlockTag, SimulationOptions, SimulationParams, SimulationRequest,
        SimulationResult, StateOverride, TransactionCall,
    },
};

/// Accumulates a simulation request and executes it
///
/// ```no_run
/// use altitrace_sdk::{
///     types::{BlockTag, TransactionCall},
///     AltitraceClient, ClientConfig,
/// };
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = AltitraceClient::new(ClientConfig::local())?;
/// let result = client
///     .simulate()
///     .call(
///         TransactionCall::new()
///             .to("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")
///             .data("0xa9059cbb"),
///     )
///     .block_tag(BlockTag::Latest)
///     .execute()
///     .await?;
/// assert!(result.is_success());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SimulationBuilder {
    connection: Arc<ApiConnection>,
    params: SimulationParams,
    state_overrides: Vec<StateOverride>,
    block_overrides: Option<BlockOverrides>,
}

impl SimulationBuilder {
    pub(crate) fn new(connection: Arc<ApiConnection>) -> Self {
        Self {
            connection,
            params: SimulationParams::default(),
            state_overrides: Vec::new(),
            block_overrides: None,
        }
    }

    /// Appends one transaction call to the simulation
    pub fn call(mut self, call: TransactionCall) -> Self {
        self.params.calls.push(call);
        self
    }

    /// Appends several transaction calls, preserving order
    pub fn calls(mut self, calls: impl IntoIterator<Item = TransactionCall>) -> Self {
        self.params.calls.extend(calls);
        self
    }

    /// Sets the account whose asset changes are tracked
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.params.account = Some(account.into());
        self
    }

    /// Sets the parent block number (hex-encoded)
    ///
    /// Mutually exclusive with [`block_tag`](Self::block_tag); setting both
    /// fails at `build()` regardless of order.
    pub fn block_number(mut self, block_number: impl Into<String>) -> Self {
        self.params.block_number = Some(block_number.into());
        self
    }

    /// Sets the parent block tag
    pub fn block_tag(mut self, tag: BlockTag) -> Self {
        self.params.block_tag = Some(tag);
        self
    }

    /// Enables or disables EVM validation
    pub fn validation(mut self, validation: bool) -> Self {
        self.params.validation = validation;
        self
    }

    /// Enables token balance change tracking (requires an account)
    pub fn trace_asset_changes(mut self, enabled: bool) -> Self {
        self.params.trace_asset_changes = enabled;
        self
    }

    /// Enables ETH transfer tracking (requires an account)
    pub fn trace_transfers(mut self, enabled: bool) -> Self {
        self.params.trace_transfers = enabled;
        self
    }

    /// Adds a state override
    ///
    /// Repeated calls accumulate; a second override for an address already
    /// present merges field-wise into the existing entry instead of
    /// duplicating it.
    pub fn with_state_override(mut self, state_override: StateOverride) -> Self {
        let key = state_override.address.as_deref().map(str::to_ascii_lowercase);
        let existing = key.as_ref().and_then(|key| {
            self.state_overrides
                .iter()
                .position(|o| o.address.as_deref().map(str::to_ascii_lowercase).as_ref() == Some(key))
        });
        match existing {
            Some(index) => self.state_overrides[index].merge(state_override),
            None => self.state_overrides.push(state_override),
        }
        self
    }

    /// Adds block overrides; repeated calls merge field-wise
    pub fn with_block_overrides(mut self, overrides: BlockOverrides) -> Self {
        match &mut self.block_overrides {
            Some(existing) => existing.merge(overrides),
            None => self.block_overrides = Some(overrides),
        }
        self
    }

    /// Validates the accumulated state and produces the wire payload
    pub fn build(&self) -> Result<SimulationRequest, ValidationError> {
        let options = if self.state_overrides.is_empty() && self.block_overrides.is_none() {
            None
        } else {
            Some(SimulationOptions {
                state_overrides: (!self.state_overrides.is_empty())
                    .then(|| self.state_overrides.clone()),
                block_overrides: self.block_overrides.clone(),
            })
        };
        let request = SimulationRequest { params: self.params.clone(), options };
        request.validate()?;
        Ok(request)
    }

    /// Builds, sends, and enriches the simulation
    ///
    /// All validation failures surface before any I/O.
    pub async fn execute(&self) -> Result<ExecutedSimulation, ClientError> {
        let request = self.build()?;
        let result: SimulationResult =
            self.connection.post_json(endpoints::SIMULATE, &request).await?;
        Ok(ExecutedSimulation::new(result))
    }
}
