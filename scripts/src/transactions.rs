//! Utilities for sending and waiting on transactions

use alloy::{
    contract::{CallBuilder, CallDecoder, Error as ContractError},
    network::Ethereum,
    primitives::B256,
    providers::{DynProvider, PendingTransactionBuilder},
    rpc::types::TransactionReceipt,
    transports::TransportError,
};
use tracing::{info, warn};

use crate::errors::ScriptError;

/// The call builder type for the scripts
pub type ScriptCallBuilder<'a, C> = CallBuilder<&'a DynProvider, C, Ethereum>;

/// The outcome of trying to initialize an upgradeable contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitializeOutcome {
    /// The initializer was called
    Initialized {
        /// The hash of the initialization transaction
        transaction_hash: B256,
    },
    /// The initializer would revert, usually because it already ran
    Skipped {
        /// Why the simulated call failed
        reason: String,
    },
}

/// Wait for a pending transaction and ensure it succeeded
pub async fn wait_contract_call(
    pending: PendingTransactionBuilder<Ethereum>,
) -> Result<TransactionReceipt, ScriptError> {
    let receipt = pending
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!(
        "Waiting transaction: \"{:#x}\" (block: {} gasUsed: {})",
        receipt.transaction_hash,
        receipt.block_number.unwrap_or_default(),
        receipt.gas_used
    );

    if !receipt.status() {
        return Err(ScriptError::ContractInteraction(format!(
            "transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    Ok(receipt)
}

/// Send a transaction and wait for it to succeed
pub async fn send_tx<C: CallDecoder>(
    tx: ScriptCallBuilder<'_, C>,
) -> Result<TransactionReceipt, ScriptError> {
    let pending = tx
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    wait_contract_call(pending).await
}

/// Initialize an upgradeable contract unless the initializer would revert
///
/// The call is simulated first; a simulation the node rejects is logged and
/// the transaction is not sent. Any other failure is an error
pub async fn try_initialize<C: CallDecoder + Unpin>(
    contract_name: &str,
    call: ScriptCallBuilder<'_, C>,
) -> Result<InitializeOutcome, ScriptError> {
    let simulation = call.call().await.map(|_| ());
    if let Some(reason) = rejected_simulation(simulation)? {
        warn!("Already initialized or initialize error ({contract_name}): {reason}");
        return Ok(InitializeOutcome::Skipped { reason });
    }

    info!("Initializing {contract_name}...");
    let receipt = send_tx(call).await?;
    Ok(InitializeOutcome::Initialized {
        transaction_hash: receipt.transaction_hash,
    })
}

/// The reason a simulated call was rejected by the node, if it was
///
/// Errors that never reached the node's EVM (transport failures, rate limits,
/// undecodable responses) are returned as errors
fn rejected_simulation(res: Result<(), ContractError>) -> Result<Option<String>, ScriptError> {
    match res {
        Ok(()) => Ok(None),
        Err(ContractError::TransportError(TransportError::ErrorResp(payload))) => {
            Ok(Some(payload.message.to_string()))
        }
        Err(e) => Err(ScriptError::ContractInteraction(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::Address,
        providers::{DynProvider, ProviderBuilder},
        rpc::json_rpc::ErrorPayload,
        transports::{mock::Asserter, TransportErrorKind},
    };

    use super::*;
    use crate::contracts::VoteMelos;

    const ALREADY_INITIALIZED: &str =
        "execution reverted: Initializable: contract is already initialized";

    /// A provider answering requests from `asserter`
    fn mocked_provider(asserter: &Asserter) -> DynProvider {
        DynProvider::new(
            ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_mocked_client(asserter.clone()),
        )
    }

    #[test]
    fn test_revert_is_rejected_simulation() {
        let payload = ErrorPayload {
            code: 3,
            message: ALREADY_INITIALIZED.into(),
            data: None,
        };
        let res = Err(ContractError::TransportError(TransportError::ErrorResp(payload)));

        assert_eq!(
            rejected_simulation(res).unwrap(),
            Some(ALREADY_INITIALIZED.to_string())
        );
        assert_eq!(rejected_simulation(Ok(())).unwrap(), None);
    }

    #[test]
    fn test_transport_failure_is_an_error() {
        let err = TransportErrorKind::custom_str("connection refused");
        let res = rejected_simulation(Err(ContractError::TransportError(err)));

        assert!(matches!(res, Err(ScriptError::ContractInteraction(_))));
    }

    #[tokio::test]
    async fn test_initialize_skipped_when_node_reverts() {
        let asserter = Asserter::new();
        asserter.push_failure_msg(ALREADY_INITIALIZED);
        let provider = mocked_provider(&asserter);

        let vote_melos = VoteMelos::new(Address::repeat_byte(1), provider);
        let outcome = try_initialize("VoteMelos", vote_melos.initialize(Address::repeat_byte(2)))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            InitializeOutcome::Skipped {
                reason: ALREADY_INITIALIZED.to_string()
            }
        );
    }
}
