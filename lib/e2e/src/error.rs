use alloy::sol_types::SolError;
use kindlink_deploy::ConstructorReverted;

/// Checks whether a failure is a revert with a specific Solidity error.
pub trait Revert<E> {
    /// Returns `true` if `self` reverted with `expected`.
    fn reverted_with(&self, expected: E) -> bool;
}

impl<E: SolError> Revert<E> for alloy::contract::Error {
    fn reverted_with(&self, expected: E) -> bool {
        let Self::TransportError(e) = self else {
            return false;
        };

        //  ErrorResp(
        //      ErrorPayload {
        //          code: 3,
        //          message: "execution reverted",
        //          data: Some(RawValue("0x...")),
        //      },
        //  )
        let Some(raw_value) =
            e.as_error_resp().and_then(|payload| payload.data.clone())
        else {
            return false;
        };
        let actual = raw_value.get().trim_matches('"').trim_start_matches("0x");
        let expected = alloy::hex::encode(expected.abi_encode());
        expected == actual
    }
}

impl<E: SolError> Revert<E> for eyre::Report {
    fn reverted_with(&self, expected: E) -> bool {
        // The factory wraps the constructor's revert data in its own error.
        let expected = alloy::hex::encode(expected.abi_encode());
        ConstructorReverted::from_report(self)
            .is_some_and(|reverted| reverted.revert_data.contains(&expected))
    }
}
