//! Builder for access-list generation requests

use std::sync::Arc;

use crate::{
    client::endpoints,
    enrich::ExecutedAccessList,
    errors::{ClientError, ValidationError},
    transport::ApiConnection,
    types::{AccessListRequest, AccessListResponse, TransactionCall},
};

/// Accumulates an access-list request and executes it
#[derive(Clone)]
pub struct AccessListBuilder {
    connection: Arc<ApiConnection>,
    call: TransactionCall,
    block: String,
}

impl AccessListBuilder {
    pub(crate) fn new(connection: Arc<ApiConnection>) -> Self {
        Self { connection, call: TransactionCall::default(), block: "latest".to_string() }
    }

    /// Sets the transaction call to analyze
    pub fn call(mut self, call: TransactionCall) -> Self {
        self.call = call;
        self
    }

    /// Sets the block number or tag to analyze against (default `latest`)
    pub fn block(mut self, block: impl Into<String>) -> Self {
        self.block = block.into();
        self
    }

    /// Validates the accumulated state and produces the wire payload
    pub fn build(&self) -> Result<AccessListRequest, ValidationError> {
        let request = AccessListRequest { params: self.call.clone(), block: self.block.clone() };
        request.validate()?;
        Ok(request)
    }

    /// Builds, sends, and enriches the access list
    pub async fn execute(&self) -> Result<ExecutedAccessList, ClientError> {
        let request = self.build()?;
        let response: AccessListResponse =
            self.connection.post_json(endpoints::ACCESS_LIST, &request).await?;
        Ok(ExecutedAccessList::new(response))
    }
}
