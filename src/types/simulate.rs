//! Simulation request and result types

use serde::{Deserialize, Serialize};

use super::{
    call::TransactionCall,
    shared::{BlockOverrides, BlockTag, StateOverride},
};
use crate::{
    errors::ValidationError,
    validation::{validate_address, validate_quantity},
};

/// Complete simulation request for transaction execution
///
/// Encapsulates the transaction calls, block context, simulation options,
/// and any state or block overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// The transaction parameters to simulate
    pub params: SimulationParams,

    /// Optional simulation-specific options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<SimulationOptions>,
}

/// Core simulation parameters including transaction calls and context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    /// Transaction calls executed in order within the simulation
    pub calls: Vec<TransactionCall>,

    /// Account address for tracking asset changes
    ///
    /// Required when `trace_asset_changes` or `trace_transfers` is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// Parent block number for the simulation (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,

    /// Parent block tag; mutually exclusive with `block_number`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_tag: Option<BlockTag>,

    /// Enable EVM validation during simulation
    ///
    /// When false, behaves like `eth_call` with relaxed validation.
    pub validation: bool,

    /// Enable tracking of token balance changes
    pub trace_asset_changes: bool,

    /// Enable tracking of ETH transfers as ERC-20-like logs
    pub trace_transfers: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            account: None,
            block_number: None,
            block_tag: None,
            validation: true,
            trace_asset_changes: false,
            trace_transfers: false,
        }
    }
}

/// Optional parameters for simulation behavior and output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOptions {
    /// State overrides applied before execution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_overrides: Option<Vec<StateOverride>>,

    /// Block environment overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_overrides: Option<BlockOverrides>,
}

impl SimulationRequest {
    /// Applies the full validation checklist to this request
    ///
    /// Checks run in a fixed order and the first violation is returned:
    /// call presence, per-call field formats, account format, block number
    /// format, block selector exclusivity, account requirement for asset
    /// tracing, and state-override consistency.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.params.calls.is_empty() {
            return Err(ValidationError::NoCalls);
        }
        for call in &self.params.calls {
            call.validate()?;
        }
        if let Some(account) = &self.params.account {
            validate_address(account)?;
        }
        if let Some(number) = &self.params.block_number {
            validate_quantity(number)?;
        }
        if self.params.block_number.is_some() && self.params.block_tag.is_some() {
            return Err(ValidationError::BlockSelectorConflict);
        }
        if (self.params.trace_asset_changes || self.params.trace_transfers) &&
            self.params.account.is_none()
        {
            return Err(ValidationError::AccountRequired);
        }
        if let Some(options) = &self.options {
            if let Some(overrides) = &options.state_overrides {
                for state_override in overrides {
                    state_override.validate()?;
                }
            }
        }
        Ok(())
    }
}

/// Overall execution status of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    /// All calls executed successfully
    Success,
    /// One or more calls reverted
    Reverted,
    /// Simulation failed due to an error
    Failed,
}

/// Execution status of an individual call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// Call executed successfully
    Success,
    /// Call reverted (with or without reason)
    Reverted,
}

/// Complete simulation result containing all execution details
///
/// Immutable snapshot returned by the service; the enrichment layer only
/// attaches derived read accessors, it never mutates this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Unique identifier for this simulation
    pub simulation_id: String,

    /// The final block number after simulation (hex-encoded)
    pub block_number: String,

    /// Overall simulation execution status
    pub status: SimulationStatus,

    /// Results for each transaction call in the simulation
    pub calls: Vec<CallResult>,

    /// Total gas consumed by all calls (hex-encoded)
    pub gas_used: String,

    /// Total gas used in the simulated block (hex-encoded)
    pub block_gas_used: String,

    /// Token balance changes (present if tracing was enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_changes: Option<Vec<AssetChange>>,
}

/// Result of a single transaction call within the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    /// Index of this call within the simulation
    pub call_index: u32,

    /// Execution status of this specific call
    pub status: CallStatus,

    /// Data returned by the call (hex-encoded)
    pub return_data: String,

    /// Gas consumed by this call (hex-encoded)
    pub gas_used: String,

    /// Event logs emitted by this call
    #[serde(default)]
    pub logs: Vec<EnhancedLog>,

    /// Error details (present if the call failed or reverted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CallFailure>,
}

/// Event log with optional decoded representation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedLog {
    /// Contract address that emitted this log
    pub address: String,

    /// Indexed log topics
    pub topics: Vec<String>,

    /// Raw log data (hex-encoded)
    pub data: String,

    /// Whether this log was removed due to chain reorganization
    #[serde(default)]
    pub removed: bool,

    /// Block number containing this log (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,

    /// Log index within the transaction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_index: Option<String>,

    /// Human-readable decoded event information, when recognized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<DecodedEvent>,
}

/// Human-readable event information decoded from log data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedEvent {
    /// Event name (e.g., "Transfer", "Approval")
    pub name: String,

    /// Event signature with types
    pub signature: String,

    /// Token/protocol standard (e.g., "ERC20", "ERC721")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,

    /// Human-readable description of the event
    #[serde(default)]
    pub description: String,

    /// Decoded event parameters with names and formatted values
    #[serde(default)]
    pub params: Vec<DecodedEventParam>,

    /// One-line human-readable summary
    #[serde(default)]
    pub summary: String,
}

/// Individual parameter from a decoded event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedEventParam {
    /// Parameter name from the ABI
    pub name: String,

    /// Parameter type (e.g., "address", "uint256", "bool")
    pub param_type: String,

    /// Formatted parameter value
    pub value: String,

    /// Whether this parameter was indexed in the event
    pub indexed: bool,
}

/// Detailed error information for a failed or reverted call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFailure {
    /// Human-readable error reason
    pub reason: String,

    /// Error type classification (e.g., "execution-reverted")
    pub error_type: String,

    /// Detailed error message with context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Contract address where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
}

/// Token balance change observed during the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetChange {
    /// Token contract information
    pub token: TokenInfo,

    /// Balance change details
    pub value: BalanceChange,
}

/// Token contract information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Token contract address
    pub address: String,

    /// Number of decimal places, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,

    /// Token symbol, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Balance change showing before/after/difference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChange {
    /// Balance before simulation (hex-encoded, smallest unit)
    pub pre: String,

    /// Balance after simulation (hex-encoded, smallest unit)
    pub post: String,

    /// Net change; a leading `-` denotes loss
    pub diff: String,
}

/// Service health report returned by the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Overall service status (e.g., "healthy", "degraded")
    pub status: String,

    /// Service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Seconds since service start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
}
