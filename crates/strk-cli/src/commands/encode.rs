//! Calldata encoding command

use std::path::PathBuf;

use clap::Args;
use strk_sdk::abi::{encode, encode_arguments, encode_untyped, CONSTRUCTOR_NAME};
use strk_sdk::SdkError;

use super::{load_abi, parse_args_json};
use crate::{output::felts_line, output::Output, CliError};

/// Encode arguments into calldata
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// JSON ABI file; without it arguments are encoded positionally
    #[arg(long)]
    abi: Option<PathBuf>,
    /// Entry point whose parameters describe the arguments
    #[arg(long, default_value = CONSTRUCTOR_NAME, conflicts_with = "struct_name")]
    entry_point: String,
    /// Encode the arguments as a single value of this struct instead
    #[arg(long = "struct", requires = "abi")]
    struct_name: Option<String>,
    /// Arguments as JSON
    #[arg(long)]
    args: String,
}

impl EncodeArgs {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let value = parse_args_json(&self.args)?;

        let calldata = match &self.abi {
            None => encode_untyped(&value).map_err(SdkError::from)?,
            Some(path) => {
                let schema = load_abi(path)?;
                match &self.struct_name {
                    Some(name) => {
                        let ty = schema.resolve_struct(name).map_err(SdkError::from)?;
                        encode(&ty, &value).map_err(SdkError::from)?
                    }
                    None => {
                        let params = schema
                            .parameters_for(&self.entry_point)
                            .map_err(SdkError::from)?;
                        encode_arguments(&params, &value).map_err(SdkError::from)?
                    }
                }
            }
        };

        Output::new(json)
            .field_felts("calldata", &calldata)
            .field_u64("length", calldata.len() as u64)
            .message(&felts_line(&calldata))
            .print();

        Ok(())
    }
}
