//! Override and log types shared by the simulation and trace domains

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, validation::validate_address};

/// Block tag options for specifying block context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    /// The latest mined block
    Latest,
    /// The earliest/genesis block
    Earliest,
    /// The latest safe block (for chains with finality)
    Safe,
    /// The latest finalized block
    Finalized,
}

impl BlockTag {
    /// Wire representation of the tag
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Earliest => "earliest",
            Self::Safe => "safe",
            Self::Finalized => "finalized",
        }
    }
}

/// Hypothetical account state substituted before execution
///
/// `storage` replaces the whole storage of the account; `state_diff` only
/// modifies the named slots. The two are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOverride {
    /// Account the override applies to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Balance override in wei (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,

    /// Nonce override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,

    /// Contract code override (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Complete storage override (replaces all storage)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<HashMap<String, String>>,

    /// Differential storage override (modifies specific slots)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_diff: Option<HashMap<String, String>>,

    /// Storage slots expressed as explicit slot/value pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Vec<StorageSlot>>,

    /// Redirect precompile calls to this address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_precompile_to_address: Option<String>,
}

impl StateOverride {
    /// Creates an override for the given account
    pub fn for_address(address: impl Into<String>) -> Self {
        Self { address: Some(address.into()), ..Self::default() }
    }

    /// Sets the balance override
    pub fn balance(mut self, balance: impl Into<String>) -> Self {
        self.balance = Some(balance.into());
        self
    }

    /// Sets the nonce override
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Sets the code override
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Adds one differential storage slot
    pub fn state_diff_slot(mut self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        self.state_diff
            .get_or_insert_with(HashMap::new)
            .insert(slot.into(), value.into());
        self
    }

    /// Merges another override for the same address into this one
    ///
    /// Later non-empty fields win; storage maps are merged key-wise.
    pub fn merge(&mut self, other: Self) {
        if other.balance.is_some() {
            self.balance = other.balance;
        }
        if other.nonce.is_some() {
            self.nonce = other.nonce;
        }
        if other.code.is_some() {
            self.code = other.code;
        }
        if let Some(storage) = other.storage {
            self.storage.get_or_insert_with(HashMap::new).extend(storage);
        }
        if let Some(diff) = other.state_diff {
            self.state_diff.get_or_insert_with(HashMap::new).extend(diff);
        }
        if let Some(state) = other.state {
            self.state.get_or_insert_with(Vec::new).extend(state);
        }
        if other.move_precompile_to_address.is_some() {
            self.move_precompile_to_address = other.move_precompile_to_address;
        }
    }

    /// Checks address presence/format and storage exclusivity
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.address {
            Some(address) => validate_address(address)?,
            None => return Err(ValidationError::StateOverrideMissingAddress),
        }
        if self.state.is_some() && self.state_diff.is_some() {
            return Err(ValidationError::StateOverrideConflict);
        }
        Ok(())
    }
}

/// Storage slot definition for state overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSlot {
    /// Storage slot key (32 bytes, hex-encoded)
    pub slot: String,

    /// Storage slot value (32 bytes, hex-encoded)
    pub value: String,
}

/// Hypothetical block-environment values substituted for execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockOverrides {
    /// Override the block number (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    /// Override the block difficulty (pre-merge chains)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    /// Override the block timestamp (Unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,

    /// Override the block gas limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,

    /// Override the block coinbase (miner/fee recipient)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,

    /// Override the prevRandao value (post-merge)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random: Option<String>,

    /// Override the base fee per gas (hex-encoded, EIP-1559)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_fee: Option<String>,

    /// Custom block-number to block-hash mappings for the BLOCKHASH opcode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<BTreeMap<String, String>>,
}

impl BlockOverrides {
    /// Merges another set of overrides into this one; later non-empty fields win
    pub fn merge(&mut self, other: Self) {
        if other.number.is_some() {
            self.number = other.number;
        }
        if other.difficulty.is_some() {
            self.difficulty = other.difficulty;
        }
        if other.time.is_some() {
            self.time = other.time;
        }
        if other.gas_limit.is_some() {
            self.gas_limit = other.gas_limit;
        }
        if other.coinbase.is_some() {
            self.coinbase = other.coinbase;
        }
        if other.random.is_some() {
            self.random = other.random;
        }
        if other.base_fee.is_some() {
            self.base_fee = other.base_fee;
        }
        if let Some(hashes) = other.block_hash {
            self.block_hash.get_or_insert_with(BTreeMap::new).extend(hashes);
        }
    }
}

/// Base log entry emitted by a call frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Contract address that emitted the log
    pub address: String,

    /// Indexed log topics
    pub topics: Vec<String>,

    /// Log data (hex-encoded)
    pub data: String,
}
