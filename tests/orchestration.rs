//! End-to-end orchestration scenarios over in-memory collaborators.

use alloy::primitives::{Address, B256, Bytes, U256, address, bytes, keccak256};
use async_trait::async_trait;
use proxykit::{
    chain::ChainApi,
    config::{ProxyContracts, SafeTxGasParams},
    constants::PREDETERMINED_SALT_NONCE,
    error::{ChainQueryError, ExecutionError, InvalidSignatureError, PreconditionError},
    execution::ExecutionContext,
    managers::{ProxyContext, RelayedManager, TransactionManager},
    proxy::ProxyState,
    relay::{
        CreateProxyAndExecTransactionRequest, ExecTransactionRequest, RelayApi,
        RelayTransactionResponse,
    },
    signers::{MessageSigner, OwnerSigner},
    signing::{SignedRequest, sign_batch},
    types::{
        Batch, OperationType, ProxyTransaction, ProxyTxParams, StandardTransaction,
        TransactionResult,
    },
};
use std::sync::{Arc, Mutex};

const OWNER: Address = address!("0x1111111111111111111111111111111111111111");
const PROXY: Address = address!("0x2222222222222222222222222222222222222222");
const TARGET: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");

/// In-memory chain: fixed code and nonce, hash oracle as a pure function
/// over the request parameters.
#[derive(Clone)]
struct MockChain {
    code: Bytes,
    nonce: Option<U256>,
    hash_requests: Arc<Mutex<Vec<ProxyTxParams>>>,
}

impl MockChain {
    fn deployed(nonce: u64) -> Self {
        Self {
            code: bytes!("0x60806040"),
            nonce: Some(U256::from(nonce)),
            hash_requests: Default::default(),
        }
    }

    fn undeployed() -> Self {
        Self { code: Bytes::new(), nonce: None, hash_requests: Default::default() }
    }

    fn signed_nonces(&self) -> Vec<U256> {
        self.hash_requests.lock().unwrap().iter().map(|params| params.nonce).collect()
    }
}

fn transport_error(message: &str) -> ChainQueryError {
    ChainQueryError::Transport(alloy::transports::TransportErrorKind::custom_str(message))
}

#[async_trait]
impl ChainApi for MockChain {
    async fn code_at(&self, _address: Address) -> Result<Bytes, ChainQueryError> {
        Ok(self.code.clone())
    }

    async fn proxy_nonce(&self, _proxy: Address) -> Result<U256, ChainQueryError> {
        self.nonce.ok_or_else(|| transport_error("nonce query failed"))
    }

    async fn proxy_transaction_hash(
        &self,
        params: &ProxyTxParams,
    ) -> Result<B256, ChainQueryError> {
        self.hash_requests.lock().unwrap().push(params.clone());

        let mut preimage = Vec::new();
        preimage.extend_from_slice(params.proxy.as_slice());
        preimage.extend_from_slice(params.to.as_slice());
        preimage.extend_from_slice(&params.value.to_be_bytes::<32>());
        preimage.extend_from_slice(keccak256(&params.data).as_slice());
        preimage.push(params.operation.into());
        preimage.extend_from_slice(&params.nonce.to_be_bytes::<32>());
        Ok(keccak256(&preimage))
    }
}

/// Signing adapter returning a fixed signature body with a configurable raw
/// recovery byte.
struct MockSigner {
    v: u8,
}

#[async_trait]
impl MessageSigner for MockSigner {
    fn address(&self) -> Address {
        OWNER
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<Bytes, InvalidSignatureError> {
        let mut raw = vec![0xab; 64];
        raw.push(self.v);
        Ok(raw.into())
    }
}

/// Manager capturing every submission, standing in for the direct path.
#[derive(Clone, Default)]
struct RecordingManager {
    submissions: Arc<Mutex<Vec<(SignedRequest, ProxyContext)>>>,
}

#[async_trait]
impl TransactionManager for RecordingManager {
    async fn submit(
        &self,
        request: SignedRequest,
        ctx: &ProxyContext,
    ) -> Result<TransactionResult, ExecutionError> {
        self.submissions.lock().unwrap().push((request, ctx.clone()));
        Ok(TransactionResult::Submitted { tx_hash: B256::repeat_byte(0x99) })
    }
}

/// In-memory relay recording both endpoints.
#[derive(Clone, Default)]
struct MockRelay {
    executed: Arc<Mutex<Vec<ExecTransactionRequest>>>,
    deployed: Arc<Mutex<Vec<CreateProxyAndExecTransactionRequest>>>,
}

#[async_trait]
impl RelayApi for MockRelay {
    async fn execute_transaction(
        &self,
        request: ExecTransactionRequest,
    ) -> Result<RelayTransactionResponse, proxykit::error::RelayError> {
        self.executed.lock().unwrap().push(request);
        Ok(RelayTransactionResponse { proxy_transaction_hash: B256::repeat_byte(0x42) })
    }

    async fn create_proxy_and_execute(
        &self,
        request: CreateProxyAndExecTransactionRequest,
    ) -> Result<RelayTransactionResponse, proxykit::error::RelayError> {
        self.deployed.lock().unwrap().push(request);
        Ok(RelayTransactionResponse { proxy_transaction_hash: B256::repeat_byte(0x42) })
    }
}

fn context(
    chain: MockChain,
    signer: impl MessageSigner + 'static,
    manager: impl TransactionManager + 'static,
) -> ExecutionContext {
    ExecutionContext::new(
        Arc::new(chain),
        Arc::new(signer),
        Arc::new(manager),
        PROXY,
        ProxyContracts::default(),
        SafeTxGasParams::default(),
    )
}

/// One call, proxy deployed, relay disabled: the manager sees the
/// pass-through batch and the nonce fetched from chain.
#[tokio::test]
async fn deployed_proxy_submits_single_call_directly() {
    let chain = MockChain::deployed(5);
    let manager = RecordingManager::default();
    let ctx = context(chain.clone(), MockSigner { v: 27 }, manager.clone());

    let result = ctx
        .exec_transactions(vec![ProxyTransaction {
            to: TARGET,
            value: Some(U256::ZERO),
            data: Some(Bytes::new()),
            operation: None,
        }])
        .await
        .unwrap();

    assert_eq!(result, TransactionResult::Submitted { tx_hash: B256::repeat_byte(0x99) });

    let submissions = manager.submissions.lock().unwrap();
    let (request, proxy_ctx) = &submissions[0];
    assert_eq!(request.nonce, U256::from(5));
    assert_eq!(request.proxy, PROXY);
    assert!(!request.batch.is_aggregate());
    assert_eq!(request.batch.to, TARGET);
    assert_eq!(request.batch.data, Bytes::new());
    assert_eq!(request.batch.operation, OperationType::Call);
    assert_eq!(request.signature.recovery_byte(), 31);
    assert!(proxy_ctx.state.is_deployed);
    assert_eq!(proxy_ctx.owner, OWNER);
}

/// Two calls, proxy not deployed, relay enabled: the aggregated batch goes
/// through deploy-and-execute with nonce 0 and the fixed salt.
#[tokio::test]
async fn undeployed_proxy_aggregates_and_deploys_through_relay() {
    let chain = MockChain::undeployed();
    let relay = MockRelay::default();
    let contracts = ProxyContracts::default();
    let ctx = context(
        chain.clone(),
        MockSigner { v: 0 },
        RelayedManager::new(relay.clone()),
    );

    let transactions = vec![
        ProxyTransaction::call(TARGET),
        ProxyTransaction {
            to: Address::repeat_byte(0xbb),
            value: Some(U256::from(7)),
            data: Some(bytes!("0xdeadbeef")),
            operation: None,
        },
    ];
    let result = ctx.exec_transactions(transactions).await.unwrap();

    assert_eq!(result, TransactionResult::Relayed { proxy_tx_hash: B256::repeat_byte(0x42) });
    assert_eq!(chain.signed_nonces(), vec![U256::ZERO]);
    assert!(relay.executed.lock().unwrap().is_empty());

    let deployed = relay.deployed.lock().unwrap();
    let request = &deployed[0];
    assert_eq!(request.from, OWNER);
    assert_eq!(request.master_copy_address, contracts.master_copy);
    assert_eq!(request.proxy_factory_address, contracts.proxy_factory);
    assert_eq!(request.predetermined_salt_nonce, PREDETERMINED_SALT_NONCE);
    assert_eq!(request.to, contracts.multi_send);
    assert_eq!(request.operation, OperationType::DelegateCall);

    // the packed payload reproduces both calls in order
    let unpacked = Batch::decode_aggregate(&request.data).unwrap();
    assert_eq!(unpacked.len(), 2);
    assert_eq!(unpacked[0].to, TARGET);
    assert_eq!(unpacked[0].value, U256::ZERO);
    assert_eq!(unpacked[1].to, Address::repeat_byte(0xbb));
    assert_eq!(unpacked[1].data, bytes!("0xdeadbeef"));
}

/// An already-deployed proxy goes through the relay's execute endpoint, not
/// deploy-and-execute.
#[tokio::test]
async fn deployed_proxy_relays_through_execute_endpoint() {
    let relay = MockRelay::default();
    let ctx = context(
        MockChain::deployed(3),
        MockSigner { v: 28 },
        RelayedManager::new(relay.clone()),
    );

    let result = ctx.exec_transactions(vec![ProxyTransaction::call(TARGET)]).await.unwrap();

    assert_eq!(result, TransactionResult::Relayed { proxy_tx_hash: B256::repeat_byte(0x42) });
    assert!(relay.deployed.lock().unwrap().is_empty());

    let executed = relay.executed.lock().unwrap();
    assert_eq!(executed[0].proxy_address, PROXY);
    assert_eq!(executed[0].signature[64], 32);
}

/// An out-of-convention recovery byte aborts the call before any submission.
#[tokio::test]
async fn unknown_recovery_byte_fails_without_submission() {
    let manager = RecordingManager::default();
    let ctx = context(MockChain::deployed(0), MockSigner { v: 99 }, manager.clone());

    let err = ctx.exec_transactions(vec![ProxyTransaction::call(TARGET)]).await.unwrap_err();

    assert!(matches!(
        err,
        ExecutionError::Signature(InvalidSignatureError::RecoveryId(99))
    ));
    assert!(manager.submissions.lock().unwrap().is_empty());
}

/// The nonce is defined to be 0 for an undeployed proxy, even when the nonce
/// query itself fails: only the probe result gates it.
#[tokio::test]
async fn undeployed_proxy_has_nonce_zero() {
    let chain = MockChain::undeployed();
    let state = ProxyState::resolve(&chain, PROXY).await.unwrap();

    assert!(!state.is_deployed);
    assert_eq!(state.nonce, U256::ZERO);
}

/// A nonce failure on a deployed proxy surfaces; a stale nonce would produce
/// an unverifiable signature downstream.
#[tokio::test]
async fn deployed_proxy_nonce_failure_surfaces() {
    let chain = MockChain { nonce: None, ..MockChain::deployed(0) };
    assert!(ProxyState::resolve(&chain, PROXY).await.is_err());
}

/// The hash oracle is pure, so identical inputs sign to identical requests.
#[tokio::test]
async fn signing_is_deterministic() {
    let chain = MockChain::deployed(1);
    let signer = OwnerSigner::from_signing_key(
        "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    )
    .unwrap();

    let batch = || {
        Batch::new(
            vec![StandardTransaction {
                operation: OperationType::Call,
                to: TARGET,
                value: U256::from(1),
                data: bytes!("0x01"),
            }],
            ProxyContracts::default().multi_send,
        )
        .unwrap()
    };

    let first = sign_batch(&chain, &signer, PROXY, batch(), U256::from(1), Default::default())
        .await
        .unwrap();
    let second = sign_batch(&chain, &signer, PROXY, batch(), U256::from(1), Default::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert!(matches!(first.signature.recovery_byte(), 31 | 32));
}

/// Each missing context invariant is a distinct precondition failure.
#[tokio::test]
async fn zero_addresses_fail_preconditions() {
    let manager = RecordingManager::default();

    let ctx = ExecutionContext::new(
        Arc::new(MockChain::deployed(0)),
        Arc::new(MockSigner { v: 27 }),
        Arc::new(manager.clone()),
        Address::ZERO,
        ProxyContracts::default(),
        SafeTxGasParams::default(),
    );
    let err = ctx.exec_transactions(vec![ProxyTransaction::call(TARGET)]).await.unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::Precondition(PreconditionError::ProxyAddress)
    ));

    let contracts = ProxyContracts { master_copy: Address::ZERO, ..Default::default() };
    let ctx = ExecutionContext::new(
        Arc::new(MockChain::deployed(0)),
        Arc::new(MockSigner { v: 27 }),
        Arc::new(manager.clone()),
        PROXY,
        contracts,
        SafeTxGasParams::default(),
    );
    let err = ctx.exec_transactions(vec![ProxyTransaction::call(TARGET)]).await.unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::Precondition(PreconditionError::MasterCopy)
    ));

    assert!(manager.submissions.lock().unwrap().is_empty());
}

/// An empty transaction list never reaches the chain or the manager.
#[tokio::test]
async fn empty_batch_is_rejected() {
    let chain = MockChain::deployed(0);
    let manager = RecordingManager::default();
    let ctx = context(chain.clone(), MockSigner { v: 27 }, manager.clone());

    let err = ctx.exec_transactions(Vec::new()).await.unwrap_err();

    assert!(matches!(err, ExecutionError::Encoding(_)));
    assert!(chain.hash_requests.lock().unwrap().is_empty());
    assert!(manager.submissions.lock().unwrap().is_empty());
}
