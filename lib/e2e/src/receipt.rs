/// Sends a contract call and waits for its receipt.
///
/// Evaluates to `eyre::Result<TransactionReceipt>`.
#[macro_export]
macro_rules! receipt {
    ($call:expr) => {
        match $call.send().await {
            Ok(pending) => pending
                .get_receipt()
                .await
                .map_err($crate::eyre::Report::from),
            Err(e) => Err($crate::eyre::Report::from(e)),
        }
    };
}

/// Sends a contract call without waiting for it to be mined.
///
/// Evaluates to the `Result` of sending, so reverts caught by gas
/// estimation surface as an `alloy::contract::Error`.
#[macro_export]
macro_rules! send {
    ($call:expr) => {
        $call.send().await
    };
}
