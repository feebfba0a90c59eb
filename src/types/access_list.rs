//! Access-list generation request and response types

use serde::{Deserialize, Serialize};

use super::call::{AccessListItem, TransactionCall};
use crate::{errors::ValidationError, validation::validate_block_selector};

/// Request to generate the EIP-2930 access list for a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListRequest {
    /// The transaction parameters to analyze
    pub params: TransactionCall,

    /// The block number or tag to analyze against
    pub block: String,
}

impl AccessListRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.params.validate()?;
        validate_block_selector(&self.block)
    }
}

/// Predicted access list for a call, with the gas it would use
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListResponse {
    /// Addresses and storage slots the transaction is predicted to touch
    pub access_list: Vec<AccessListItem>,

    /// Gas used by the call with the access list applied (hex-encoded)
    pub gas_used: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_block_selector() {
        let request = AccessListRequest {
            params: TransactionCall::new().to("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            block: "latest".into(),
        };
        assert!(request.validate().is_ok());

        let request = AccessListRequest { block: "not-a-block".into(), ..request };
        assert!(request.validate().is_err());
    }

    #[test]
    fn deserializes_response() {
        let raw = r#"{
            "accessList": [
                {"address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "storageKeys": ["0x01", "0x02"]}
            ],
            "gasUsed": "0x6b6e"
        }"#;
        let response: AccessListResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.access_list.len(), 1);
        assert_eq!(response.access_list[0].storage_keys.len(), 2);
    }
}
