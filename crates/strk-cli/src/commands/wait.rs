//! Transaction wait command

use std::time::Duration;

use clap::Args;
use strk_primitives::felt_to_hex;
use strk_sdk::{CancellationToken, LedgerClient, WaitOptions};

use super::parse_felt_arg;
use crate::{config::Config, output::Output, CliError};

/// Wait for a transaction to become final
#[derive(Debug, Args)]
pub struct WaitArgs {
    /// Transaction hash
    hash: String,
    /// Seconds between status polls
    #[arg(long)]
    interval: Option<u64>,
    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Wait for L1 acceptance
    #[arg(long)]
    l1: bool,
    /// Consecutive NOT_RECEIVED polls tolerated before failing
    #[arg(long)]
    retries: Option<u32>,
}

impl WaitArgs {
    fn options(&self, config: &Config) -> WaitOptions {
        let mut options = config.client.wait_options();
        if let Some(secs) = self.interval {
            options = options.poll_interval(Duration::from_secs(secs));
        }
        if let Some(secs) = self.timeout {
            options = options.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.retries {
            options = options.not_received_retries(retries);
        }
        if self.l1 {
            options = options.strict();
        }
        options
    }

    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let hash = parse_felt_arg(&self.hash)?;
        let options = self.options(config);
        let client = LedgerClient::connect(&config.client.rpc_url);

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let receipt = client
            .wait_for_finality_cancellable(hash, &options, cancel)
            .await?;

        let mut output = Output::new(json)
            .field_felt("transaction_hash", &receipt.transaction_hash)
            .field("status", receipt.status.as_str())
            .field_u64("events", receipt.events.len() as u64);
        if let Some(block) = receipt.block_number {
            output = output.field_u64("block_number", block);
        }
        if let Some(fee) = &receipt.actual_fee {
            output = output.field_felt("actual_fee", &fee.amount());
            if let Some(unit) = fee.unit() {
                output = output.field("fee_unit", unit);
            }
        }

        output
            .message(&format!(
                "Transaction {} {}",
                felt_to_hex(&receipt.transaction_hash),
                receipt.status
            ))
            .print();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strk_sdk::FinalityLevel;

    fn args(l1: bool, interval: Option<u64>) -> WaitArgs {
        WaitArgs {
            hash: "0x1".to_string(),
            interval,
            timeout: None,
            l1,
            retries: None,
        }
    }

    #[test]
    fn test_options_follow_config() {
        let mut config = Config::default();
        config.client.poll_interval_secs = 9;
        config.client.timeout_secs = Some(60);

        let options = args(false, None).options(&config);
        assert_eq!(options.poll_interval, Duration::from_secs(9));
        assert_eq!(options.timeout, Some(Duration::from_secs(60)));
        assert_eq!(options.min_status, FinalityLevel::AcceptedOnL2);
    }

    #[test]
    fn test_flags_override_config() {
        let options = args(true, Some(1)).options(&Config::default());
        assert_eq!(options.poll_interval, Duration::from_secs(1));
        assert_eq!(options.min_status, FinalityLevel::AcceptedOnL1);
    }
}
