//! Subcommand implementations

pub mod address;
pub mod encode;
pub mod wait;

use std::path::Path;

use strk_primitives::{parse_felt, Felt};
use strk_sdk::abi::{AbiSchema, CalldataValue};

use crate::CliError;

/// Parse a hex or decimal field element argument
pub fn parse_felt_arg(input: &str) -> Result<Felt, CliError> {
    parse_felt(input).map_err(|source| CliError::InvalidFelt {
        input: input.to_string(),
        source,
    })
}

/// Parse a comma-separated list of field elements; empty input is an empty list
pub fn parse_felt_list(input: &str) -> Result<Vec<Felt>, CliError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_felt_arg)
        .collect()
}

/// Load a JSON ABI file
pub fn load_abi(path: &Path) -> Result<AbiSchema, CliError> {
    let content = std::fs::read_to_string(path)?;
    let schema = AbiSchema::from_json(&content).map_err(strk_sdk::SdkError::from)?;
    tracing::debug!(path = %path.display(), entry_points = schema.entry_points().len(), "loaded abi");
    Ok(schema)
}

/// Parse a JSON argument document into a calldata value
pub fn parse_args_json(input: &str) -> Result<CalldataValue, CliError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    CalldataValue::try_from(&value).map_err(|e| CliError::Sdk(e.into()))
}
