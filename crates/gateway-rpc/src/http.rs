//! # HTTP JSON-RPC Adapter
//!
//! Concrete [`RpcClient`] over the replica's JSON-RPC HTTP endpoint, with
//! Basic-Auth credentials taken from the node record. Each client is
//! per-node and cheap to build; the factory is handed to the fan-out
//! engine and the registry's validation gate.

use crate::client::{RpcClient, RpcClientFactory, SubmitTx};
use crate::error::RpcError;
use crate::responses::{
    RpcActiveZmqNotification, RpcBlockchainInfo, RpcNetworkInfo, RpcRawTransaction,
    RpcSendTransactions,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use gateway_types::Node;
use jsonrpsee::core::client::{ClientT, Error as JsonRpcError};
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::http_client::{HeaderMap, HeaderValue, HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Knobs for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpRpcOptions {
    /// Per-request timeout; bounds every replica call issued by the
    /// fan-out engine.
    pub request_timeout: Duration,
}

impl Default for HttpRpcOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

pub(crate) fn build_auth_headers(user: &str, password: &str) -> Result<HeaderMap, String> {
    let mut headers = HeaderMap::new();
    let credentials = format!("{user}:{password}");
    let encoded = BASE64_STANDARD.encode(credentials);
    let value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| format!("failed to build Authorization header: {e}"))?;
    headers.insert("Authorization", value);
    Ok(headers)
}

pub(crate) fn batch_params(batch: &[SubmitTx]) -> Vec<serde_json::Value> {
    batch
        .iter()
        .map(|tx| {
            serde_json::json!({
                "hex": hex::encode(&tx.raw),
                "allowhighfees": tx.allow_high_fees,
                "dontcheckfee": tx.dont_check_fee,
                "listunconfirmedancestors": tx.list_unconfirmed_ancestors,
            })
        })
        .collect()
}

/// JSON-RPC HTTP connection to one replica.
pub struct HttpRpcClient {
    node_id: String,
    client: HttpClient,
}

impl HttpRpcClient {
    /// Build a client for `node`. Fails when the credentials cannot be
    /// encoded into headers or the URL is rejected by the transport.
    pub fn new(node: &Node, options: &HttpRpcOptions) -> Result<Self, RpcError> {
        let node_id = node.id();
        let url = format!("http://{}:{}", node.host, node.port);

        let headers = build_auth_headers(&node.username, &node.password).map_err(|message| {
            RpcError::Call {
                node: node_id.clone(),
                method: "connect",
                message,
            }
        })?;

        let client = HttpClientBuilder::default()
            .set_headers(headers)
            .request_timeout(options.request_timeout)
            .build(&url)
            .map_err(|e| RpcError::Call {
                node: node_id.clone(),
                method: "connect",
                message: e.to_string(),
            })?;

        Ok(Self { node_id, client })
    }

    fn classify(&self, method: &'static str, error: JsonRpcError) -> RpcError {
        match error {
            JsonRpcError::RequestTimeout => RpcError::Timeout {
                node: self.node_id.clone(),
                method,
            },
            JsonRpcError::Call(e) => RpcError::Call {
                node: self.node_id.clone(),
                method,
                message: e.message().to_string(),
            },
            JsonRpcError::ParseError(e) => RpcError::Malformed {
                node: self.node_id.clone(),
                method,
                message: e.to_string(),
            },
            other => RpcError::Call {
                node: self.node_id.clone(),
                method,
                message: other.to_string(),
            },
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: ArrayParams,
    ) -> Result<T, RpcError> {
        self.client
            .request::<T, _>(method, params)
            .await
            .map_err(|e| self.classify(method, e))
    }
}

#[async_trait]
impl RpcClient for HttpRpcClient {
    fn node_id(&self) -> &str {
        &self.node_id
    }

    async fn get_block_count(&self) -> Result<u64, RpcError> {
        self.call("getblockcount", rpc_params![]).await
    }

    async fn get_blockchain_info(&self) -> Result<RpcBlockchainInfo, RpcError> {
        self.call("getblockchaininfo", rpc_params![]).await
    }

    async fn get_network_info(&self) -> Result<RpcNetworkInfo, RpcError> {
        self.call("getnetworkinfo", rpc_params![]).await
    }

    async fn active_zmq_notifications(&self) -> Result<Vec<RpcActiveZmqNotification>, RpcError> {
        self.call("activezmqnotifications", rpc_params![]).await
    }

    async fn send_raw_transactions(
        &self,
        batch: &[SubmitTx],
    ) -> Result<RpcSendTransactions, RpcError> {
        self.call("sendrawtransactions", rpc_params![batch_params(batch)])
            .await
    }

    async fn get_raw_transaction(&self, txid: &str) -> Result<RpcRawTransaction, RpcError> {
        // Verbosity 1 returns the decoded form with the containing block
        self.call("getrawtransaction", rpc_params![txid, 1]).await
    }
}

/// Factory producing [`HttpRpcClient`]s with shared transport options.
#[derive(Debug, Clone, Default)]
pub struct HttpRpcClientFactory {
    options: HttpRpcOptions,
}

impl HttpRpcClientFactory {
    /// Create a factory with the given transport options.
    #[must_use]
    pub fn new(options: HttpRpcOptions) -> Self {
        Self { options }
    }
}

impl RpcClientFactory for HttpRpcClientFactory {
    fn create(&self, node: &Node) -> Result<Arc<dyn RpcClient>, RpcError> {
        Ok(Arc::new(HttpRpcClient::new(node, &self.options)?))
    }
}
