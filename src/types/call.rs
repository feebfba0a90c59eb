//! Transaction call parameters and EIP-2930 access lists

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{
    errors::ValidationError,
    validation::{validate_address, validate_hex_data, validate_quantity},
};

/// Parameters of a single transaction call
///
/// All fields are optional on the wire; numeric values are hex-encoded
/// strings. An empty call simulates a plain transfer of zero value from the
/// zero address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCall {
    /// Recipient address (absent for contract creation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// Sender address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Calldata (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Value to send in wei (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Gas limit (hex-encoded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,

    /// EIP-2930 access list to attach to the call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_list: Option<Vec<AccessListItem>>,
}

/// One entry of an EIP-2930 access list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    /// Account the transaction is predicted to touch
    pub address: String,

    /// Storage slots of that account the transaction is predicted to touch
    pub storage_keys: Vec<String>,
}

impl TransactionCall {
    /// Creates an empty call
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recipient address
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Sets the sender address
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Sets the calldata
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the value in wei
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the gas limit
    pub fn gas(mut self, gas: impl Into<String>) -> Self {
        self.gas = Some(gas.into());
        self
    }

    /// Attaches an EIP-2930 access list
    pub fn access_list(mut self, list: Vec<AccessListItem>) -> Self {
        self.access_list = Some(list);
        self
    }

    /// Builds a call from already-parsed primitives
    ///
    /// The inverse of the typed accessors below; hex casing is normalized
    /// but integer values are preserved bit-for-bit.
    pub fn from_parts(
        from: Option<Address>,
        to: Option<Address>,
        value: Option<U256>,
        data: Option<Bytes>,
        gas: Option<u64>,
    ) -> Self {
        Self {
            from: from.map(|a| format!("{a:?}")),
            to: to.map(|a| format!("{a:?}")),
            value: value.map(|v| format!("0x{v:x}")),
            data: data.map(|d| format!("0x{}", alloy_primitives::hex::encode(&d))),
            gas: gas.map(|g| format!("0x{g:x}")),
            access_list: None,
        }
    }

    /// Parsed recipient address, if set
    pub fn to_address(&self) -> Result<Option<Address>, ValidationError> {
        parse_address_opt(self.to.as_deref())
    }

    /// Parsed sender address, if set
    pub fn from_address(&self) -> Result<Option<Address>, ValidationError> {
        parse_address_opt(self.from.as_deref())
    }

    /// Parsed value in wei, if set
    pub fn value_wei(&self) -> Result<Option<U256>, ValidationError> {
        self.value.as_deref().map(super::parse_u256).transpose()
    }

    /// Parsed calldata, if set
    pub fn data_bytes(&self) -> Result<Option<Bytes>, ValidationError> {
        self.data
            .as_deref()
            .map(|s| {
                validate_hex_data(s)?;
                s.parse::<Bytes>()
                    .map_err(|_| ValidationError::InvalidHex(s.to_string()))
            })
            .transpose()
    }

    /// Parsed gas limit, if set
    pub fn gas_limit(&self) -> Result<Option<u64>, ValidationError> {
        self.gas
            .as_deref()
            .map(|s| {
                let digits = s
                    .strip_prefix("0x")
                    .filter(|d| !d.is_empty())
                    .ok_or_else(|| ValidationError::InvalidQuantity(s.to_string()))?;
                u64::from_str_radix(digits, 16)
                    .map_err(|_| ValidationError::InvalidQuantity(s.to_string()))
            })
            .transpose()
    }

    /// Checks every present field for well-formedness
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(to) = &self.to {
            validate_address(to)?;
        }
        if let Some(from) = &self.from {
            validate_address(from)?;
        }
        if let Some(data) = &self.data {
            validate_hex_data(data)?;
        }
        if let Some(value) = &self.value {
            validate_quantity(value)?;
        }
        if let Some(gas) = &self.gas {
            validate_quantity(gas)?;
        }
        if let Some(list) = &self.access_list {
            for item in list {
                validate_address(&item.address)?;
                for key in &item.storage_keys {
                    validate_hex_data(key)?;
                }
            }
        }
        Ok(())
    }
}

fn parse_address_opt(s: Option<&str>) -> Result<Option<Address>, ValidationError> {
    s.map(|s| {
        s.parse::<Address>()
            .map_err(|_| ValidationError::InvalidAddress(s.to_string()))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn round_trips_through_parsed_primitives() {
        let from = address!("C255fC198eEdAC7AF8aF0f6e0ca781794B094A61");
        let to = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        let value = U256::from(120_000_000_000_000_000u64);
        let data = Bytes::from(vec![0xa9, 0x05, 0x9c, 0xbb]);

        let call = TransactionCall::from_parts(
            Some(from),
            Some(to),
            Some(value),
            Some(data.clone()),
            Some(21000),
        );
        assert!(call.validate().is_ok());

        // Integer values survive the hex round trip bit-for-bit
        assert_eq!(call.from_address().unwrap(), Some(from));
        assert_eq!(call.to_address().unwrap(), Some(to));
        assert_eq!(call.value_wei().unwrap(), Some(value));
        assert_eq!(call.data_bytes().unwrap(), Some(data));
        assert_eq!(call.gas_limit().unwrap(), Some(21000));
    }

    #[test]
    fn validate_rejects_bad_fields() {
        assert!(TransactionCall::new().to("0x1234").validate().is_err());
        assert!(TransactionCall::new().data("0xabc").validate().is_err());
        assert!(TransactionCall::new().value("12").validate().is_err());
        assert!(TransactionCall::new().validate().is_ok());
    }

    #[test]
    fn serializes_camel_case_and_skips_absent_fields() {
        let call = TransactionCall::new()
            .to("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")
            .access_list(vec![AccessListItem {
                address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".into(),
                storage_keys: vec![],
            }]);
        let json = serde_json::to_value(&call).unwrap();
        assert!(json.get("accessList").is_some());
        assert!(json.get("from").is_none());
        assert!(json.get("storage_keys").is_none());
    }
}
