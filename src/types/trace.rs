//! Trace requests, tracer configuration and tracer responses

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{
    call::TransactionCall,
    shared::{BlockOverrides, LogEntry, StateOverride},
};
use crate::{
    errors::ValidationError,
    validation::{validate_block_selector, validate_hash},
};

fn default_latest() -> String {
    "latest".to_string()
}

/// Request to trace an already-mined transaction by hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceTransactionRequest {
    /// Transaction hash to trace
    pub transaction_hash: String,

    /// Trace configuration options
    #[serde(default)]
    pub tracer_config: TracerConfig,
}

impl TraceTransactionRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_hash(&self.transaction_hash)
    }
}

/// Request to trace a call simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceCallRequest {
    /// Transaction call to trace
    pub call: TransactionCall,

    /// Block number or tag to trace against
    #[serde(default = "default_latest")]
    pub block: String,

    /// Trace configuration options
    #[serde(default)]
    pub tracer_config: TracerConfig,

    /// State overrides to apply during tracing, keyed by address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_overrides: Option<HashMap<String, StateOverride>>,

    /// Block overrides to apply during tracing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_overrides: Option<BlockOverrides>,
}

impl TraceCallRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.call.validate()?;
        validate_block_selector(&self.block)?;
        if let Some(overrides) = &self.state_overrides {
            for state_override in overrides.values() {
                state_override.validate()?;
            }
        }
        Ok(())
    }
}

/// Request to trace several bundles of calls against one state context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceCallManyRequest {
    /// Bundles of transactions executed sequentially
    pub bundles: Vec<Bundle>,

    /// State context the bundles execute against
    #[serde(default)]
    pub state_context: StateContext,

    /// Trace configuration options
    #[serde(default)]
    pub tracer_config: TracerConfig,
}

impl TraceCallManyRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bundles.is_empty() {
            return Err(ValidationError::NoBundles);
        }
        for bundle in &self.bundles {
            if bundle.transactions.is_empty() {
                return Err(ValidationError::EmptyBundle);
            }
            for call in &bundle.transactions {
                call.validate()?;
            }
        }
        validate_block_selector(&self.state_context.block)
    }
}

/// A group of transactions traced as one unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Transactions executed in order within this bundle
    pub transactions: Vec<TransactionCall>,

    /// Block overrides scoped to this bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_overrides: Option<BlockOverrides>,
}

/// Block and intra-block position the trace executes at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateContext {
    /// The block number or tag
    #[serde(default = "default_latest")]
    pub block: String,

    /// The transaction index in the block
    #[serde(default)]
    pub tx_index: TxIndex,
}

impl Default for StateContext {
    fn default() -> Self {
        Self { block: default_latest(), tx_index: TxIndex::default() }
    }
}

/// Transaction index within a block
///
/// Serialized as `-1` for end-of-block, or the zero-based index otherwise.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TxIndex {
    /// End of the block
    #[default]
    End,
    /// A specific transaction index
    Index(usize),
}

impl From<usize> for TxIndex {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl Serialize for TxIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::End => serializer.serialize_i8(-1),
            Self::Index(idx) => idx.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TxIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match isize::deserialize(deserializer)? {
            -1 => Ok(Self::End),
            idx if idx < -1 => Err(serde::de::Error::custom(format!(
                "Invalid transaction index, expected -1 or positive integer, got {idx}"
            ))),
            idx => Ok(Self::Index(idx as usize)),
        }
    }
}

/// Tracer selection for a trace request
///
/// Multiple tracers may be enabled at once; the service multiplexes them
/// and returns one sub-response per enabled tracer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracerConfig {
    /// Collect the 4-byte selectors of every function executed
    #[serde(rename = "4byteTracer", default)]
    pub four_byte_tracer: bool,

    /// Track all call frames executed during the transaction
    #[serde(rename = "callTracer", skip_serializing_if = "Option::is_none")]
    pub call_tracer: Option<CallTracerConfig>,

    /// Retrieve the accounts required to execute the transaction,
    /// or the state differences it causes in diff mode
    #[serde(rename = "prestateTracer", skip_serializing_if = "Option::is_none")]
    pub prestate_tracer: Option<PrestateTracerConfig>,

    /// Log execution opcode by opcode
    #[serde(rename = "structLogger", skip_serializing_if = "Option::is_none")]
    pub struct_logger: Option<StructLoggerConfig>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            four_byte_tracer: false,
            call_tracer: Some(CallTracerConfig::default()),
            prestate_tracer: None,
            struct_logger: None,
        }
    }
}

impl TracerConfig {
    /// Number of enabled tracers (excluding the struct logger)
    pub const fn count_active_tracers(&self) -> usize {
        let mut count = 0;
        if self.four_byte_tracer {
            count += 1;
        }
        if self.call_tracer.is_some() {
            count += 1;
        }
        if self.prestate_tracer.is_some() {
            count += 1;
        }
        count
    }
}

/// Call tracer options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallTracerConfig {
    /// Only trace the top-level call
    pub only_top_call: bool,

    /// Include event logs in call frames
    pub with_logs: bool,
}

impl Default for CallTracerConfig {
    fn default() -> Self {
        Self { only_top_call: false, with_logs: true }
    }
}

/// Prestate tracer options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrestateTracerConfig {
    /// Enable diff mode to show state changes
    pub diff_mode: bool,

    /// Omit contract code from the results
    pub disable_code: bool,

    /// Omit storage tracking from the results
    pub disable_storage: bool,
}

/// Struct logger options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructLoggerConfig {
    /// Omit memory capture (disabled by default for response size)
    pub disable_memory: bool,

    /// Omit stack capture
    pub disable_stack: bool,

    /// Omit storage capture
    pub disable_storage: bool,

    /// Omit return data capture
    pub disable_return_data: bool,
}

impl Default for StructLoggerConfig {
    fn default() -> Self {
        Self {
            disable_memory: true,
            disable_stack: false,
            disable_storage: false,
            disable_return_data: false,
        }
    }
}

/// Container for all tracer results of one traced call or transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracerResponse {
    /// The transaction receipt (traces of mined transactions only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<TransactionReceiptInfo>,

    /// Call tracer results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_tracer: Option<CallTraceResponse>,

    /// Prestate tracer results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prestate_tracer: Option<PrestateTraceResponse>,

    /// Struct logger results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_logger: Option<StructLogResponse>,

    /// Four byte tracer results
    #[serde(rename = "4byteTracer", skip_serializing_if = "Option::is_none")]
    pub four_byte_tracer: Option<FourByteResponse>,
}

/// Call tracer result with hierarchical call structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTraceResponse {
    /// Root call frame
    pub root_call: CallFrame,

    /// Total number of calls, including the root
    pub total_calls: u64,

    /// Maximum call depth reached (root is depth 0)
    pub max_depth: u32,
}

/// One node in the recursive execution trace
///
/// A frame's `gas_used` already includes the gas consumed by all of its
/// descendants; summing `gas_used` over a subtree double-counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    /// Call type (CALL, DELEGATECALL, STATICCALL, CREATE, ...)
    pub call_type: String,

    /// Sender address
    pub from: String,

    /// Recipient address (absent for contract creation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// Value transferred (hex-encoded wei)
    pub value: String,

    /// Gas provided to the call (hex-encoded)
    pub gas: String,

    /// Gas used by the call and all of its sub-calls (hex-encoded)
    pub gas_used: String,

    /// Input data (hex-encoded)
    pub input: String,

    /// Output data (hex-encoded)
    #[serde(default)]
    pub output: String,

    /// Call depth; the root call is at depth 0
    #[serde(default)]
    pub depth: u32,

    /// Whether the call reverted
    #[serde(default)]
    pub reverted: bool,

    /// Error message if the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Revert reason if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,

    /// Sub-calls made by this call
    #[serde(default)]
    pub calls: Vec<CallFrame>,

    /// Logs emitted by this call
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

/// Four byte tracer results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FourByteResponse {
    /// Selector to occurrence info
    #[serde(default)]
    pub identifiers: HashMap<String, FourByteInfo>,

    /// Total number of distinct selectors observed
    pub total_identifiers: u64,
}

/// Occurrence info for one 4-byte selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FourByteInfo {
    /// Calldata size the selector was invoked with
    pub data_size: u64,

    /// Number of times the function was called
    pub count: u64,
}

/// Prestate tracer response
///
/// Default mode returns the accounts necessary to execute the transaction;
/// diff mode returns the state differences it causes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrestateTraceResponse {
    /// State changes before and after execution
    Diff(PrestateDiffMode),
    /// Accounts touched during execution
    Default(PrestateDefaultMode),
}

/// Default prestate mode: accounts keyed by address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrestateDefaultMode {
    /// Map of account addresses to their states
    #[serde(flatten)]
    pub accounts: HashMap<String, AccountState>,
}

/// Diff prestate mode: account states before and after the transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrestateDiffMode {
    /// Account states before the transaction
    pub pre: HashMap<String, AccountState>,

    /// Account states after the transaction
    pub post: HashMap<String, AccountState>,
}

/// State of a single account in a prestate trace
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    /// Account balance in wei (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,

    /// Account bytecode (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Account nonce
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,

    /// Account storage slots (key and value hex-encoded)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub storage: HashMap<String, String>,
}

/// Struct logger results, aggregated opcode by opcode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLogResponse {
    /// Raw struct logs (absent when cleaned server-side)
    #[serde(rename = "structLogs", skip_serializing_if = "Option::is_none")]
    pub struct_logs: Option<Vec<StructLog>>,

    /// Total opcodes executed
    #[serde(default)]
    pub total_opcodes: u64,

    /// Error message if execution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Output of the transaction (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Total gas used
    #[serde(default)]
    pub total_gas: u64,
}

/// A single opcode execution record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLog {
    /// Program counter
    pub pc: u64,

    /// Opcode mnemonic
    pub op: String,

    /// Remaining gas before this operation
    pub gas: u64,

    /// Gas cost of this operation
    pub gas_cost: u64,

    /// Call depth
    pub depth: u64,

    /// Stack contents, if captured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,

    /// Memory contents, if captured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Vec<String>>,

    /// Storage touched so far, if captured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<HashMap<String, String>>,
}

/// Receipt of a mined transaction attached to trace responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceiptInfo {
    /// Sender address
    pub from: String,

    /// Recipient address (absent for contract creation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// Created contract address, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,

    /// Gas used by the transaction (hex-encoded)
    pub gas_used: String,

    /// Effective gas price (hex-encoded wei)
    pub effective_gas_price: String,

    /// Cumulative gas used in the block at this transaction (hex-encoded)
    pub cumulative_gas_used: String,

    /// Transaction type (0 legacy, 1 EIP-2930, 2 EIP-1559)
    pub transaction_type: u8,

    /// Whether the transaction succeeded
    pub status: bool,

    /// Number of logs emitted
    pub logs_count: u64,
}
