//! Relay service client.
//!
//! The relay fronts gas for proxy transactions and can deploy the proxy on
//! first use. Only its call contract is modeled here: two endpoints, each
//! returning the relayed proxy transaction hash.

use crate::{error::RelayError, types::OperationType};
use alloy::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

/// Request for execution through an already-deployed proxy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecTransactionRequest {
    /// The owner account authorizing the batch.
    pub from: Address,
    /// The deployed proxy to execute through.
    pub proxy_address: Address,
    /// The resolved call target.
    pub to: Address,
    /// Native value forwarded with the call.
    pub value: U256,
    /// The resolved calldata.
    pub data: Bytes,
    /// How the proxy performs the call.
    pub operation: OperationType,
    /// Gas made available to the proxy's internal execution.
    pub safe_tx_gas: U256,
    /// Gas reserved for data costs and refund bookkeeping.
    pub data_gas: U256,
    /// Price per gas unit refunded to the submitter.
    pub gas_price: U256,
    /// Token the refund is paid in; zero address means native currency.
    pub gas_token: Address,
    /// Recipient of the refund; zero address means the submitter.
    pub refund_receiver: Address,
    /// Owner signature, recovery byte in contract convention.
    pub signature: Bytes,
}

/// Request for deploying the proxy and executing in the same transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProxyAndExecTransactionRequest {
    /// The owner account the proxy is deployed for.
    pub from: Address,
    /// Implementation contract the new proxy delegates to.
    pub master_copy_address: Address,
    /// Factory the relay deploys through.
    pub proxy_factory_address: Address,
    /// Deterministic deployment salt; fixed per owner so repeated calls
    /// target the same address.
    pub predetermined_salt_nonce: B256,
    /// The resolved call target.
    pub to: Address,
    /// Native value forwarded with the call.
    pub value: U256,
    /// The resolved calldata.
    pub data: Bytes,
    /// How the proxy performs the call.
    pub operation: OperationType,
    /// Owner signature, recovery byte in contract convention.
    pub signature: Bytes,
}

/// Response of either relay endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayTransactionResponse {
    /// Hash of the proxy transaction the relay submitted.
    pub proxy_transaction_hash: B256,
}

/// The relay service's call contract.
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Executes a signed batch through an already-deployed proxy.
    async fn execute_transaction(
        &self,
        request: ExecTransactionRequest,
    ) -> Result<RelayTransactionResponse, RelayError>;

    /// Deploys the proxy and executes the signed batch in one transaction.
    async fn create_proxy_and_execute(
        &self,
        request: CreateProxyAndExecTransactionRequest,
    ) -> Result<RelayTransactionResponse, RelayError>;
}

/// HTTP client for the relay service.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    client: Client,
    url: Url,
}

impl HttpRelayClient {
    /// Creates a client against the relay's base endpoint.
    pub fn new(url: Url) -> Self {
        Self { client: Client::new(), url }
    }

    async fn post<Req, Resp>(&self, route: &str, request: &Req) -> Result<Resp, RelayError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.url.join(route)?;
        let response = self.client.post(url).json(request).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(RelayError::Api { status, message })
        }
    }
}

#[async_trait]
impl RelayApi for HttpRelayClient {
    async fn execute_transaction(
        &self,
        request: ExecTransactionRequest,
    ) -> Result<RelayTransactionResponse, RelayError> {
        self.post("exec-transaction", &request).await
    }

    async fn create_proxy_and_execute(
        &self,
        request: CreateProxyAndExecTransactionRequest,
    ) -> Result<RelayTransactionResponse, RelayError> {
        self.post("create-proxy-and-exec-transaction", &request).await
    }
}
