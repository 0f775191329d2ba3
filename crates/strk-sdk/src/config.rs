//! Client, wait and deployment options

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strk_primitives::{parse_felt, BigInt, Felt};

use crate::abi::AbiSchema;
use crate::finality::FinalityLevel;
use crate::SdkError;

/// Default seconds between status polls
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Address of the universal deployer contract
pub const UDC_ADDRESS: &str =
    "0x041a78e741e5af2fec34b695679bc6891742439f7afb8484ecd7766661ad02bf";

/// Options for [`wait_for_finality`](crate::finality::wait_for_finality)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    /// Delay between status polls
    pub poll_interval: Duration,
    /// Overall deadline; `None` polls forever
    pub timeout: Option<Duration>,
    /// Status at which the transaction counts as final
    pub min_status: FinalityLevel,
    /// Consecutive `NOT_RECEIVED` observations tolerated before failing
    pub not_received_retries: u32,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            timeout: None,
            min_status: FinalityLevel::AcceptedOnL2,
            not_received_retries: 0,
        }
    }
}

impl WaitOptions {
    /// Set the poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the overall deadline
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the finality level to wait for
    pub fn min_status(mut self, level: FinalityLevel) -> Self {
        self.min_status = level;
        self
    }

    /// Wait for L1 acceptance instead of L2
    pub fn strict(self) -> Self {
        self.min_status(FinalityLevel::AcceptedOnL1)
    }

    /// Tolerate `retries` consecutive `NOT_RECEIVED` polls
    pub fn not_received_retries(mut self, retries: u32) -> Self {
        self.not_received_retries = retries;
        self
    }

    /// Reject options the poll loop cannot honour
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.poll_interval.is_zero() {
            return Err(SdkError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(SdkError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for building a deployment
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Explicit salt; a random one is drawn when absent
    pub salt: Option<BigInt>,
    /// Schema used to encode constructor arguments
    pub abi: Option<AbiSchema>,
    /// Fee ceiling, passed through to the submitted transaction
    pub max_fee: Option<Felt>,
}

impl DeployOptions {
    /// Set the salt
    pub fn salt(mut self, salt: impl Into<BigInt>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Set the constructor ABI
    pub fn abi(mut self, abi: AbiSchema) -> Self {
        self.abi = Some(abi);
        self
    }

    /// Set the fee ceiling
    pub fn max_fee(mut self, max_fee: Felt) -> Self {
        self.max_fee = Some(max_fee);
        self
    }
}

/// Persistent client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Seconds between status polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Overall wait deadline in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Fee ceiling as a hex or decimal string
    #[serde(default)]
    pub max_fee: Option<String>,
    /// Wait for L1 acceptance
    #[serde(default)]
    pub strict_finality: bool,
    /// Consecutive `NOT_RECEIVED` polls tolerated
    #[serde(default)]
    pub not_received_retries: u32,
    /// Universal deployer contract address
    #[serde(default = "default_udc_address")]
    pub udc_address: String,
}

fn default_rpc_url() -> String {
    "http://localhost:5050/rpc".to_string()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_udc_address() -> String {
    UDC_ADDRESS.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: None,
            max_fee: None,
            strict_finality: false,
            not_received_retries: 0,
            udc_address: default_udc_address(),
        }
    }
}

impl ClientConfig {
    /// Wait options described by this config
    pub fn wait_options(&self) -> WaitOptions {
        let mut options = WaitOptions::default()
            .poll_interval(Duration::from_secs(self.poll_interval_secs))
            .not_received_retries(self.not_received_retries);
        if let Some(secs) = self.timeout_secs {
            options = options.timeout(Duration::from_secs(secs));
        }
        if self.strict_finality {
            options = options.strict();
        }
        options
    }

    /// Parsed deployer contract address
    pub fn udc_address(&self) -> Result<Felt, SdkError> {
        Ok(parse_felt(&self.udc_address)?)
    }

    /// Parsed fee ceiling
    pub fn max_fee(&self) -> Result<Option<Felt>, SdkError> {
        self.max_fee
            .as_deref()
            .map(parse_felt)
            .transpose()
            .map_err(SdkError::from)
    }
}

impl From<&ClientConfig> for WaitOptions {
    fn from(config: &ClientConfig) -> Self {
        config.wait_options()
    }
}
