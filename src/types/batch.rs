//! Batch packaging for proxy execution.

use super::{MultiSend, OperationType, StandardTransaction};
use crate::{constants::MULTI_SEND_RECORD_HEADER, error::EncodingError};
use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};

/// An ordered sequence of normalized transactions together with the single
/// call that executes them through the proxy.
///
/// A batch of one is a pass-through: the resolved call is the transaction
/// itself. A larger batch targets the multi-send aggregator with a
/// `DELEGATECALL` whose payload is the packed concatenation of every
/// transaction; executing the aggregate has byte-identical effect to
/// executing each transaction in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    txs: Vec<StandardTransaction>,
    /// The resolved call target.
    pub to: Address,
    /// Native value forwarded with the resolved call.
    pub value: U256,
    /// The resolved calldata.
    pub data: Bytes,
    /// How the proxy performs the resolved call.
    pub operation: OperationType,
}

impl Batch {
    /// Packages `txs` for execution through the proxy.
    ///
    /// Input order is preserved exactly. Fails with
    /// [`EncodingError::EmptyBatch`] on an empty sequence.
    pub fn new(
        txs: Vec<StandardTransaction>,
        multi_send: Address,
    ) -> Result<Self, EncodingError> {
        if txs.is_empty() {
            return Err(EncodingError::EmptyBatch);
        }

        if let [tx] = txs.as_slice() {
            let (to, value, data, operation) = (tx.to, tx.value, tx.data.clone(), tx.operation);
            return Ok(Self { txs, to, value, data, operation });
        }

        let data = encode_multi_send(&txs)?;
        Ok(Self {
            txs,
            to: multi_send,
            value: U256::ZERO,
            data,
            operation: OperationType::DelegateCall,
        })
    }

    /// The normalized transactions in execution order.
    pub fn transactions(&self) -> &[StandardTransaction] {
        &self.txs
    }

    /// Number of transactions in the batch. Never 0.
    pub fn len(&self) -> usize {
        self.txs.len()
    }

    /// Whether the batch resolved to a multi-send aggregation.
    pub fn is_aggregate(&self) -> bool {
        self.txs.len() > 1
    }

    /// Parses `multiSend` calldata back into the transactions it packs.
    ///
    /// Inverse of the aggregation in [`Batch::new`]; the returned sequence is
    /// in execution order.
    pub fn decode_aggregate(data: &[u8]) -> Result<Vec<StandardTransaction>, EncodingError> {
        let call = MultiSend::multiSendCall::abi_decode(data)?;
        decode_packed(&call.transactions)
    }
}

/// Packs `txs` into `multiSend` calldata.
///
/// Per transaction: 1 byte operation, 20 bytes target, 32 bytes big-endian
/// value, 32 bytes big-endian payload length, then the raw payload with no
/// padding. Records are concatenated with no separators.
fn encode_multi_send(txs: &[StandardTransaction]) -> Result<Bytes, EncodingError> {
    let mut packed = Vec::with_capacity(
        txs.iter().map(|tx| MULTI_SEND_RECORD_HEADER + tx.data.len()).sum(),
    );

    for tx in txs {
        let len = u64::try_from(tx.data.len())
            .map_err(|_| EncodingError::PayloadTooLong { len: tx.data.len() })?;

        packed.push(u8::from(tx.operation));
        packed.extend_from_slice(tx.to.as_slice());
        packed.extend_from_slice(&tx.value.to_be_bytes::<32>());
        packed.extend_from_slice(&U256::from(len).to_be_bytes::<32>());
        packed.extend_from_slice(&tx.data);
    }

    Ok(MultiSend::multiSendCall { transactions: packed.into() }.abi_encode().into())
}

/// Parses a packed multi-send payload into transactions.
fn decode_packed(mut data: &[u8]) -> Result<Vec<StandardTransaction>, EncodingError> {
    let mut txs = Vec::new();

    while !data.is_empty() {
        if data.len() < MULTI_SEND_RECORD_HEADER {
            return Err(EncodingError::Truncated { remaining: data.len() });
        }

        let operation = OperationType::try_from(data[0])?;
        let to = Address::from_slice(&data[1..21]);
        let value = U256::from_be_slice(&data[21..53]);
        let len = U256::from_be_slice(&data[53..85]);
        let len = usize::try_from(len).map_err(|_| EncodingError::LengthOverflow(len))?;

        let rest = &data[MULTI_SEND_RECORD_HEADER..];
        if rest.len() < len {
            return Err(EncodingError::Truncated { remaining: rest.len() });
        }

        txs.push(StandardTransaction {
            operation,
            to,
            value,
            data: Bytes::copy_from_slice(&rest[..len]),
        });
        data = &rest[len..];
    }

    if txs.is_empty() {
        return Err(EncodingError::EmptyBatch);
    }

    Ok(txs)
}
