//! Builders for trace requests
//!
//! [`TraceBuilder`] is the mode selector: it narrows into a transaction,
//! call, or call-many builder, each carrying only the options valid for its
//! mode. Tracer selection works the same on all three.

use std::{collections::HashMap, sync::Arc};

use crate::{
    client::endpoints,
    enrich::ExecutedTrace,
    errors::{ClientError, ValidationError},
    transport::ApiConnection,
    types::{
        BlockOverrides, Bundle, CallTracerConfig, PrestateTracerConfig, StateContext,
        StateOverride, StructLoggerConfig, TraceCallManyRequest, TraceCallRequest,
        TraceTransactionRequest, TracerConfig, TracerResponse, TransactionCall, TxIndex,
    },
};

/// Mode selector for trace requests
pub struct TraceBuilder {
    connection: Arc<ApiConnection>,
}

impl TraceBuilder {
    pub(crate) fn new(connection: Arc<ApiConnection>) -> Self {
        Self { connection }
    }

    /// Traces an already-mined transaction by hash
    pub fn transaction(self, hash: impl Into<String>) -> TraceTransactionBuilder {
        TraceTransactionBuilder {
            connection: self.connection,
            transaction_hash: hash.into(),
            tracer_config: TracerConfig::default(),
        }
    }

    /// Traces a hypothetical call
    pub fn call(self, call: TransactionCall) -> TraceCallBuilder {
        TraceCallBuilder {
            connection: self.connection,
            call,
            block: "latest".to_string(),
            tracer_config: TracerConfig::default(),
            state_overrides: HashMap::new(),
            block_overrides: None,
        }
    }

    /// Traces several bundles of calls against one state context
    pub fn call_many(self) -> TraceCallManyBuilder {
        TraceCallManyBuilder {
            connection: self.connection,
            bundles: Vec::new(),
            state_context: StateContext::default(),
            tracer_config: TracerConfig::default(),
        }
    }
}

macro_rules! tracer_selection_methods {
    () => {
        /// Enables the call tracer with the given options
        pub fn with_call_tracer(mut self, config: CallTracerConfig) -> Self {
            self.tracer_config.call_tracer = Some(config);
            self
        }

        /// Disables the call tracer (enabled by default)
        pub fn without_call_tracer(mut self) -> Self {
            self.tracer_config.call_tracer = None;
            self
        }

        /// Enables the 4-byte selector tracer
        pub fn with_four_byte_tracer(mut self) -> Self {
            self.tracer_config.four_byte_tracer = true;
            self
        }

        /// Enables the prestate tracer with the given options
        pub fn with_prestate_tracer(mut self, config: PrestateTracerConfig) -> Self {
            self.tracer_config.prestate_tracer = Some(config);
            self
        }

        /// Enables the struct logger with the given options
        pub fn with_struct_logger(mut self, config: StructLoggerConfig) -> Self {
            self.tracer_config.struct_logger = Some(config);
            self
        }
    };
}

/// Builder for tracing a mined transaction
#[derive(Clone)]
pub struct TraceTransactionBuilder {
    connection: Arc<ApiConnection>,
    transaction_hash: String,
    tracer_config: TracerConfig,
}

impl TraceTransactionBuilder {
    tracer_selection_methods!();

    /// Validates the accumulated state and produces the wire payload
    pub fn build(&self) -> Result<TraceTransactionRequest, ValidationError> {
        let request = TraceTransactionRequest {
            transaction_hash: self.transaction_hash.clone(),
            tracer_config: self.tracer_config.clone(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Builds, sends, and enriches the trace
    pub async fn execute(&self) -> Result<ExecutedTrace, ClientError> {
        let request = self.build()?;
        let response: TracerResponse =
            self.connection.post_json(endpoints::TRACE_TX, &request).await?;
        Ok(ExecutedTrace::new(response))
    }
}

/// Builder for tracing a hypothetical call
#[derive(Clone)]
pub struct TraceCallBuilder {
    connection: Arc<ApiConnection>,
    call: TransactionCall,
    block: String,
    tracer_config: TracerConfig,
    state_overrides: HashMap<String, StateOverride>,
    block_overrides: Option<BlockOverrides>,
}

impl TraceCallBuilder {
    tracer_selection_methods!();

    /// Sets the block number or tag to trace against (default `latest`)
    pub fn block(mut self, block: impl Into<String>) -> Self {
        self.block = block.into();
        self
    }

    /// Adds a state override for an address
    ///
    /// A second override for the same address merges field-wise into the
    /// existing entry.
    pub fn with_state_override(
        mut self,
        address: impl Into<String>,
        state_override: StateOverride,
    ) -> Self {
        let address = address.into().to_ascii_lowercase();
        let mut state_override = state_override;
        state_override.address.get_or_insert_with(|| address.clone());
        match self.state_overrides.entry(address) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                entry.get_mut().merge(state_override)
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(state_override);
            }
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
    pub fn build(&self) -> Result<TraceCallRequest, ValidationError> {
        let request = TraceCallRequest {
            call: self.call.clone(),
            block: self.block.clone(),
            tracer_config: self.tracer_config.clone(),
            state_overrides: (!self.state_overrides.is_empty())
                .then(|| self.state_overrides.clone()),
            block_overrides: self.block_overrides.clone(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Builds, sends, and enriches the trace
    pub async fn execute(&self) -> Result<ExecutedTrace, ClientError> {
        let request = self.build()?;
        let response: TracerResponse =
            self.connection.post_json(endpoints::TRACE_CALL, &request).await?;
        Ok(ExecutedTrace::new(response))
    }
}

/// Builder for tracing several bundles of calls
#[derive(Clone)]
pub struct TraceCallManyBuilder {
    connection: Arc<ApiConnection>,
    bundles: Vec<Bundle>,
    state_context: StateContext,
    tracer_config: TracerConfig,
}

impl TraceCallManyBuilder {
    tracer_selection_methods!();

    /// Appends one bundle of transactions
    pub fn bundle(mut self, bundle: Bundle) -> Self {
        self.bundles.push(bundle);
        self
    }

    /// Appends a bundle consisting of the given calls
    pub fn bundle_of(self, transactions: Vec<TransactionCall>) -> Self {
        self.bundle(Bundle { transactions, block_overrides: None })
    }

    /// Sets the block the bundles execute against
    pub fn block(mut self, block: impl Into<String>) -> Self {
        self.state_context.block = block.into();
        self
    }

    /// Sets the transaction index the bundles execute after
    pub fn tx_index(mut self, index: TxIndex) -> Self {
        self.state_context.tx_index = index;
        self
    }

    /// Validates the accumulated state and produces the wire payload
    pub fn build(&self) -> Result<TraceCallManyRequest, ValidationError> {
        let request = TraceCallManyRequest {
            bundles: self.bundles.clone(),
            state_context: self.state_context.clone(),
            tracer_config: self.tracer_config.clone(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Builds, sends, and enriches the traces; one response per bundle entry
    pub async fn execute(&self) -> Result<Vec<ExecutedTrace>, ClientError> {
        let request = self.build()?;
        let responses: Vec<TracerResponse> =
            self.connection.post_json(endpoints::TRACE_CALL_MANY, &request).await?;
        Ok(responses.into_iter().map(ExecutedTrace::new).collect())
    }
}
