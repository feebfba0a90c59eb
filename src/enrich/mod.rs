//! Response enrichment
//!
//! Wraps raw API results with derived, read-only accessors:
//! - Status predicates and gas aggregation for simulations
//! - Call-frame tree metrics, accessed accounts/storage and decoded
//!   selectors for traces
//! - Per-address grouping for access lists
//!
//! Enrichment never mutates the raw payload; derived trace metrics are
//! computed once and memoized, so repeated accessor calls return the same
//! values from the same immutable snapshot.

pub mod analysis;

pub use analysis::TraceAnalysis;

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::OnceLock,
};

use alloy_primitives::U256;

use crate::{
    errors::{ClientError, ValidationError},
    types::{
        parse_u256, AccessListResponse, AssetChange, EnhancedLog, SimulationResult,
        SimulationStatus, TracerResponse,
    },
};

/// A simulation result with derived accessors attached
///
/// Also the shape batch execution folds failures into: a request that
/// errored becomes a synthetic failed result carrying the error text, so a
/// batch result can be inspected uniformly.
#[derive(Debug, Clone)]
pub struct ExecutedSimulation {
    result: SimulationResult,
    failure: Option<String>,
}

impl ExecutedSimulation {
    /// Wraps a result returned by the service
    pub fn new(result: SimulationResult) -> Self {
        Self { result, failure: None }
    }

    /// Synthesizes a failed result from a request-level error
    pub fn from_failure(error: &ClientError) -> Self {
        Self {
            result: SimulationResult {
                simulation_id: String::new(),
                block_number: "0x0".to_string(),
                status: SimulationStatus::Failed,
                calls: Vec::new(),
                gas_used: "0x0".to_string(),
                block_gas_used: "0x0".to_string(),
                asset_changes: None,
            },
            failure: Some(error.to_string()),
        }
    }

    /// The raw, immutable result snapshot
    pub fn raw(&self) -> &SimulationResult {
        &self.result
    }

    /// Consumes the wrapper and returns the raw result
    pub fn into_inner(self) -> SimulationResult {
        self.result
    }

    /// The request-level error this result was synthesized from, if any
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Whether the simulation executed successfully
    pub fn is_success(&self) -> bool {
        matches!(self.result.status, SimulationStatus::Success)
    }

    /// Whether the simulation reverted or failed
    pub fn is_failed(&self) -> bool {
        matches!(self.result.status, SimulationStatus::Reverted | SimulationStatus::Failed)
    }

    /// Total gas consumed by all calls, as an arbitrary-precision integer
    pub fn total_gas_used(&self) -> Result<U256, ValidationError> {
        parse_u256(&self.result.gas_used)
    }

    /// Summarizes asset changes as gains and losses per token
    pub fn asset_changes_summary(&self) -> Vec<AssetChangeSummary> {
        self.result
            .asset_changes
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(AssetChangeSummary::from_change)
            .collect()
    }

    /// All decoded event logs, flattened in call order then log order
    ///
    /// Logs without a decoded representation are skipped.
    pub fn decoded_events(&self) -> Vec<&EnhancedLog> {
        self.result
            .calls
            .iter()
            .flat_map(|call| call.logs.iter())
            .filter(|log| log.decoded.is_some())
            .collect()
    }
}

/// Direction of a token balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    /// The tracked account gained tokens
    Gain,
    /// The tracked account lost tokens
    Loss,
}

/// One token's net balance change, summarized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetChangeSummary {
    /// Token contract address
    pub token_address: String,
    /// Token symbol, if known
    pub symbol: Option<String>,
    /// Token decimals, if known
    pub decimals: Option<u8>,
    /// Net change as reported by the service
    pub net_change: String,
    /// Gain or loss, derived from the sign of the diff
    pub direction: ChangeDirection,
}

impl AssetChangeSummary {
    fn from_change(change: &AssetChange) -> Self {
        let direction = if change.value.diff.starts_with('-') {
            ChangeDirection::Loss
        } else {
            ChangeDirection::Gain
        };
        Self {
            token_address: change.token.address.clone(),
            symbol: change.token.symbol.clone(),
            decimals: change.token.decimals,
            net_change: change.value.diff.clone(),
            direction,
        }
    }
}

/// A tracer response with derived accessors attached
///
/// Tree aggregates are computed lazily on first access and cached for the
/// lifetime of the wrapper.
#[derive(Debug)]
pub struct ExecutedTrace {
    response: TracerResponse,
    analysis: OnceLock<TraceAnalysis>,
}

impl ExecutedTrace {
    pub fn new(response: TracerResponse) -> Self {
        Self { response, analysis: OnceLock::new() }
    }

    /// The raw, immutable response snapshot
    pub fn raw(&self) -> &TracerResponse {
        &self.response
    }

    /// Consumes the wrapper and returns the raw response
    pub fn into_inner(self) -> TracerResponse {
        self.response
    }

    fn analysis(&self) -> &TraceAnalysis {
        self.analysis.get_or_init(|| TraceAnalysis::collect(&self.response))
    }

    /// Number of call frames, including the root
    pub fn call_count(&self) -> u64 {
        self.analysis().call_count
    }

    /// Greatest call depth reached; the root call is at depth 0
    pub fn max_depth(&self) -> u32 {
        self.analysis().max_depth
    }

    /// Unique addresses seen as `from` or `to` in any frame (lowercase)
    pub fn accessed_accounts(&self) -> &BTreeSet<String> {
        &self.analysis().accounts
    }

    /// Storage slots touched, grouped by account address
    ///
    /// Populated from the prestate tracer; empty when it did not run.
    pub fn accessed_storage_slots(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.analysis().storage_slots
    }

    /// Unique 4-byte function selectors observed
    ///
    /// Taken from the 4-byte tracer when it ran, otherwise derived from
    /// call-frame inputs of at least ten hex characters.
    pub fn function_signatures(&self) -> &BTreeSet<String> {
        &self.analysis().selectors
    }

    /// Total gas used by the traced execution
    ///
    /// This is the root call frame's own `gasUsed`: child gas is already
    /// included in the parent, so summing over frames would double-count.
    /// Falls back to the receipt when no call tracer ran.
    pub fn total_gas_used(&self) -> Result<U256, ValidationError> {
        if let Some(call_tracer) = &self.response.call_tracer {
            return parse_u256(&call_tracer.root_call.gas_used);
        }
        if let Some(receipt) = &self.response.receipt {
            return parse_u256(&receipt.gas_used);
        }
        if let Some(struct_logger) = &self.response.struct_logger {
            return Ok(U256::from(struct_logger.total_gas));
        }
        Ok(U256::ZERO)
    }

    /// Whether the traced execution completed without reverting
    pub fn is_success(&self) -> bool {
        if let Some(call_tracer) = &self.response.call_tracer {
            let root = &call_tracer.root_call;
            return !root.reverted && root.error.is_none();
        }
        if let Some(receipt) = &self.response.receipt {
            return receipt.status;
        }
        true
    }
}

/// An access-list response with derived accessors attached
#[derive(Debug, Clone)]
pub struct ExecutedAccessList {
    response: AccessListResponse,
}

impl ExecutedAccessList {
    pub fn new(response: AccessListResponse) -> Self {
        Self { response }
    }

    /// The raw, immutable response snapshot
    pub fn raw(&self) -> &AccessListResponse {
        &self.response
    }

    /// Consumes the wrapper and returns the raw response
    pub fn into_inner(self) -> AccessListResponse {
        self.response
    }

    /// Gas the call would use with the access list applied
    pub fn gas_used(&self) -> Result<U256, ValidationError> {
        parse_u256(&self.response.gas_used)
    }

    /// Groups the raw entries by address
    ///
    /// Duplicate entries for the same address are merged and their storage
    /// keys deduplicated.
    pub fn summary(&self) -> AccessListSummary {
        let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for item in &self.response.access_list {
            let slots = grouped.entry(item.address.to_ascii_lowercase()).or_default();
            for key in &item.storage_keys {
                slots.insert(key.to_ascii_lowercase());
            }
        }
        let total_storage_slots = grouped.values().map(BTreeSet::len).sum();
        let accounts = grouped
            .into_iter()
            .map(|(address, slots)| AccountAccess { address, slot_count: slots.len() })
            .collect::<Vec<_>>();
        AccessListSummary { account_count: accounts.len(), total_storage_slots, accounts }
    }
}

/// Access-list entries grouped by address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessListSummary {
    /// Number of distinct accounts in the list
    pub account_count: usize,
    /// Total number of distinct storage slots across all accounts
    pub total_storage_slots: usize,
    /// Per-account slot counts, ordered by address
    pub accounts: Vec<AccountAccess>,
}

/// Slot count for one account in an access list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountAccess {
    /// Account address (lowercase)
    pub address: String,
    /// Number of distinct storage slots listed for this account
    pub slot_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccessListItem, BalanceChange, TokenInfo};

    fn simulation_result(status: SimulationStatus, gas_used: &str) -> SimulationResult {
        SimulationResult {
            simulation_id: "sim_01".into(),
            block_number: "0x10".into(),
            status,
            calls: vec![],
            gas_used: gas_used.into(),
            block_gas_used: gas_used.into(),
            asset_changes: None,
        }
    }

    #[test]
    fn status_predicates_follow_the_status_string() {
        let success = ExecutedSimulation::new(simulation_result(SimulationStatus::Success, "0x5208"));
        assert!(success.is_success());
        assert!(!success.is_failed());

        let reverted =
            ExecutedSimulation::new(simulation_result(SimulationStatus::Reverted, "0x5208"));
        assert!(!reverted.is_success());
        assert!(reverted.is_failed());
    }

    #[test]
    fn parses_total_gas_as_big_integer() {
        let executed =
            ExecutedSimulation::new(simulation_result(SimulationStatus::Success, "0x5208"));
        assert_eq!(executed.total_gas_used().unwrap(), U256::from(21000u64));
    }

    #[test]
    fn synthetic_failure_carries_the_error() {
        let error = ClientError::Network(crate::errors::NetworkError::Connect("refused".into()));
        let executed = ExecutedSimulation::from_failure(&error);
        assert!(executed.is_failed());
        assert!(executed.failure_reason().unwrap().contains("refused"));
    }

    #[test]
    fn asset_summary_derives_direction_from_sign() {
        let mut result = simulation_result(SimulationStatus::Success, "0x5208");
        result.asset_changes = Some(vec![
            AssetChange {
                token: TokenInfo {
                    address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".into(),
                    decimals: Some(6),
                    symbol: Some("USDC".into()),
                },
                value: BalanceChange {
                    pre: "0xf4240".into(),
                    post: "0x1e8480".into(),
                    diff: "0xf4240".into(),
                },
            },
            AssetChange {
                token: TokenInfo {
                    address: "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".into(),
                    decimals: Some(18),
                    symbol: Some("WETH".into()),
                },
                value: BalanceChange {
                    pre: "0x1e8480".into(),
                    post: "0xf4240".into(),
                    diff: "-0xf4240".into(),
                },
            },
        ]);
        let summary = ExecutedSimulation::new(result).asset_changes_summary();
        assert_eq!(summary[0].direction, ChangeDirection::Gain);
        assert_eq!(summary[1].direction, ChangeDirection::Loss);
        assert_eq!(summary[1].symbol.as_deref(), Some("WETH"));
    }

    #[test]
    fn access_list_summary_groups_by_address() {
        let executed = ExecutedAccessList::new(AccessListResponse {
            access_list: vec![
                AccessListItem {
                    address: "0xAA00000000000000000000000000000000000001".into(),
                    storage_keys: vec!["0x01".into(), "0x02".into()],
                },
                AccessListItem {
                    address: "0xaa00000000000000000000000000000000000001".into(),
                    storage_keys: vec!["0x02".into(), "0x03".into()],
                },
                AccessListItem {
                    address: "0xaa00000000000000000000000000000000000002".into(),
                    storage_keys: vec![],
                },
            ],
            gas_used: "0x6b6e".into(),
        });
        let summary = executed.summary();
        assert_eq!(summary.account_count, 2);
        assert_eq!(summary.total_storage_slots, 3);
        assert_eq!(summary.accounts[0].slot_count, 3);
        assert_eq!(summary.accounts[1].slot_count, 0);
    }
}
