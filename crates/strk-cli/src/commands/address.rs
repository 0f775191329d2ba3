//! Address prediction command

use std::path::PathBuf;

use clap::Args;
use serde_json::json;
use strk_primitives::{felt_to_hex, BigInt, Felt};
use strk_sdk::deployer::random_salt;
use strk_sdk::{DeployOptions, Deployer};

use super::{load_abi, parse_args_json, parse_felt_arg, parse_felt_list};
use crate::{config::Config, output::felts_line, output::Output, CliError};

/// Predict a contract address and build its deployment call
#[derive(Debug, Args)]
pub struct AddressArgs {
    /// Class hash of the contract
    #[arg(long)]
    class_hash: String,
    /// Salt; random when omitted
    #[arg(long)]
    salt: Option<String>,
    /// Account the deployment is bound to
    #[arg(long)]
    account: Option<String>,
    /// JSON ABI file describing the constructor
    #[arg(long)]
    abi: Option<PathBuf>,
    /// Constructor arguments as JSON, encoded with --abi
    #[arg(long, conflicts_with = "calldata")]
    args: Option<String>,
    /// Already-encoded constructor calldata, comma-separated
    #[arg(long, conflicts_with = "abi")]
    calldata: Option<String>,
}

impl AddressArgs {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let class_hash = parse_felt_arg(&self.class_hash)?;
        let salt = match &self.salt {
            Some(salt) => parse_felt_arg(salt)?,
            None => random_salt(),
        };
        let account = self
            .account
            .as_deref()
            .or(config.account_address.as_deref())
            .map(parse_felt_arg)
            .transpose()?;

        let deployer =
            Deployer::new(account).with_deployer_address(config.client.udc_address()?);

        let (call, address) = match &self.calldata {
            Some(raw) => {
                let calldata = parse_felt_list(raw)?;
                deployer.create_deployment_call_raw(class_hash, salt, &calldata)
            }
            None => {
                let mut options = DeployOptions::default().salt(felt_to_bigint(&salt));
                if let Some(path) = &self.abi {
                    options = options.abi(load_abi(path)?);
                }
                let args = self.args.as_deref().map(parse_args_json).transpose()?;
                deployer.create_deployment_call(class_hash, args.as_ref(), &options)?
            }
        };

        let message = format!(
            "Address:  {}\nSalt:     {}\nUnique:   {}\nCall to:  {}\nSelector: {}\nCalldata: {}",
            address,
            felt_to_hex(&salt),
            account.is_some(),
            felt_to_hex(&call.to),
            felt_to_hex(&call.selector),
            felts_line(&call.calldata),
        );

        Output::new(json)
            .field("address", &address.to_string())
            .field_felt("class_hash", &class_hash)
            .field_felt("salt", &salt)
            .field_value("unique", json!(account.is_some()))
            .field_value(
                "call",
                json!({
                    "to": felt_to_hex(&call.to),
                    "selector": felt_to_hex(&call.selector),
                    "calldata": call.calldata.iter().map(felt_to_hex).collect::<Vec<_>>(),
                }),
            )
            .message(&message)
            .print();

        Ok(())
    }
}

fn felt_to_bigint(felt: &Felt) -> BigInt {
    BigInt::from(felt.to_biguint())
}
