//! Contract interfaces the orchestration core talks to.

use alloy::sol;

sol! {
    /// The deployed proxy account.
    #[sol(rpc)]
    #[derive(Debug)]
    contract SafeProxy {
        /// The proxy's execution nonce. Strictly increasing, starts at 0.
        function nonce() public view returns (uint256);

        /// Executes a signed transaction from the proxy.
        ///
        /// `signatures` must carry the recovery byte in the contract's
        /// {31,32} convention.
        function execTransaction(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 dataGas,
            uint256 gasPrice,
            address gasToken,
            address refundReceiver,
            bytes calldata signatures
        ) public returns (bool success);
    }
}

sol! {
    /// The proxy factory, which also hosts the transaction hash helper used
    /// by the relay path.
    #[sol(rpc)]
    #[derive(Debug)]
    contract ProxyFactory {
        /// Computes the hash a proxy owner must sign to authorize execution.
        ///
        /// Pure over its inputs; the proxy verifies signatures against the
        /// same computation.
        function getTransactionHash(
            address proxy,
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 dataGas,
            uint256 gasPrice,
            address gasToken,
            address refundReceiver,
            uint256 nonce
        ) public view returns (bytes32);
    }
}

sol! {
    /// The multi-send aggregator.
    #[derive(Debug)]
    contract MultiSend {
        /// Executes a packed concatenation of calls, reverting if any fails.
        ///
        /// `transactions` is the packed record layout produced by
        /// [`Batch`](crate::types::Batch): per call, 1 byte operation,
        /// 20 bytes target, 32 bytes value, 32 bytes payload length and the
        /// raw payload.
        function multiSend(bytes memory transactions) public;
    }
}
