//! Contract address derivation and deployment through the universal deployer

use rand::RngCore;
use strk_crypto::{compute_hash_on_elements, get_selector_from_name, pedersen};
use strk_primitives::{felt_from_bigint, felt_to_hex, BigInt, Felt, NonZeroFelt, TxHash};
use tracing::debug;

use crate::abi::{encode_arguments, encode_untyped, CalldataValue};
use crate::client::Submitter;
use crate::config::{DeployOptions, WaitOptions, UDC_ADDRESS};
use crate::error::DerivationError;
use crate::finality::{wait_for_finality, LedgerQuery};
use crate::types::{Call, TransactionReceipt};
use crate::SdkError;

/// Name of the deployer contract's deployment entry point
pub const DEPLOY_ENTRY_POINT: &str = "deployContract";

/// Domain constants of the address hash
#[derive(Debug, Clone)]
pub struct AddressConstants {
    /// Domain-separation prefix hashed in first
    pub prefix: Felt,
    /// Addresses are reduced modulo this bound
    pub bound: NonZeroFelt,
}

impl AddressConstants {
    /// Short string `STARKNET_CONTRACT_ADDRESS`
    pub const PREFIX_CONTRACT_ADDRESS: Felt = Felt::from_raw([
        533439743893157637,
        8635008616843941496,
        17289941567720117366,
        3829237882463328880,
    ]);

    /// 2 ** 251 - 256
    pub const ADDR_BOUND: NonZeroFelt = NonZeroFelt::from_raw([
        576459263475590224,
        18446744073709255680,
        160989183,
        18446743986131443745,
    ]);
}

impl Default for AddressConstants {
    fn default() -> Self {
        Self {
            prefix: Self::PREFIX_CONTRACT_ADDRESS,
            bound: Self::ADDR_BOUND,
        }
    }
}

/// Compute the address a contract receives when deployed.
///
/// A missing deployer hashes as zero.
pub fn compute_address(
    constants: &AddressConstants,
    deployer: Option<Felt>,
    salt: Felt,
    class_hash: Felt,
    calldata: &[Felt],
) -> Felt {
    compute_hash_on_elements(&[
        constants.prefix,
        deployer.unwrap_or(Felt::ZERO),
        salt,
        class_hash,
        compute_hash_on_elements(calldata),
    ])
    .mod_floor(&constants.bound)
}

/// Address computed before deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PredictedAddress(pub Felt);

impl PredictedAddress {
    /// The address
    pub fn address(&self) -> Felt {
        self.0
    }
}

impl std::fmt::Display for PredictedAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&felt_to_hex(&self.0))
    }
}

/// Inputs of an address derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// Class being deployed
    pub class_hash: Felt,
    /// Salt as hashed into the address
    pub salt: Felt,
    /// Deployer address, `None` for a deployer-independent address
    pub deployer: Option<Felt>,
    /// Encoded constructor calldata
    pub calldata: Vec<Felt>,
}

impl DeploymentRequest {
    /// Build a request from arbitrary-precision integers, range-checking them
    pub fn new(
        class_hash: &BigInt,
        salt: &BigInt,
        deployer: Option<Felt>,
        calldata: Vec<Felt>,
    ) -> Result<Self, DerivationError> {
        Ok(Self {
            class_hash: felt_from_bigint(class_hash).map_err(DerivationError::InvalidClassHash)?,
            salt: felt_from_bigint(salt).map_err(DerivationError::InvalidSalt)?,
            deployer,
            calldata,
        })
    }

    /// Address this request deploys to
    pub fn derive_address(&self, constants: &AddressConstants) -> PredictedAddress {
        PredictedAddress(compute_address(
            constants,
            self.deployer,
            self.salt,
            self.class_hash,
            &self.calldata,
        ))
    }
}

/// A random salt below 2^251
pub fn random_salt() -> Felt {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes[0] &= 0x07;
    Felt::from_bytes_be(&bytes)
}

/// Builds deployment calls against a universal deployer contract
#[derive(Debug, Clone)]
pub struct Deployer {
    deployer_address: Felt,
    account_address: Option<Felt>,
    constants: AddressConstants,
}

impl Deployer {
    /// Deployer at the well-known UDC address.
    ///
    /// With an account address, deployments are unique to that account.
    pub fn new(account_address: Option<Felt>) -> Self {
        Self {
            deployer_address: Felt::from_hex_unchecked(UDC_ADDRESS),
            account_address,
            constants: AddressConstants::default(),
        }
    }

    /// Use a deployer contract at another address
    pub fn with_deployer_address(mut self, address: Felt) -> Self {
        self.deployer_address = address;
        self
    }

    /// Override the address hash constants
    pub fn with_constants(mut self, constants: AddressConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Deployer contract address
    pub fn deployer_address(&self) -> Felt {
        self.deployer_address
    }

    /// Account deployments are bound to, if any
    pub fn account_address(&self) -> Option<Felt> {
        self.account_address
    }

    /// Build the deployment call and predict the resulting address.
    ///
    /// The deployment is unique exactly when this deployer has an account
    /// address. Constructor arguments are encoded against `options.abi`. Arguments
    /// without an ABI, or a constructor with arguments and none given, are
    /// rejected.
    pub fn create_deployment_call(
        &self,
        class_hash: Felt,
        constructor_args: Option<&CalldataValue>,
        options: &DeployOptions,
    ) -> Result<(Call, PredictedAddress), SdkError> {
        let calldata = match (&options.abi, constructor_args) {
            (None, Some(_)) => return Err(SdkError::CalldataWithoutAbi),
            (None, None) => Vec::new(),
            (Some(abi), None) => {
                if abi.has_constructor_arguments() {
                    return Err(SdkError::MissingConstructorArguments);
                }
                Vec::new()
            }
            (Some(abi), Some(args)) => {
                let params = abi.constructor()?.unwrap_or_default();
                encode_arguments(&params, args)?
            }
        };

        let salt = match &options.salt {
            Some(salt) => felt_from_bigint(salt).map_err(DerivationError::InvalidSalt)?,
            None => random_salt(),
        };

        Ok(self.create_deployment_call_raw(class_hash, salt, &calldata))
    }

    /// Build the deployment call from already-encoded calldata
    pub fn create_deployment_call_raw(
        &self,
        class_hash: Felt,
        salt: Felt,
        calldata: &[Felt],
    ) -> (Call, PredictedAddress) {
        let unique = self.account_address.is_some();

        let mut call_data = Vec::with_capacity(calldata.len() + 4);
        call_data.push(class_hash);
        call_data.push(salt);
        call_data.push(Felt::from(u64::from(unique)));
        call_data.push(Felt::from(calldata.len() as u64));
        call_data.extend_from_slice(calldata);

        let call = Call {
            to: self.deployer_address,
            selector: get_selector_from_name(DEPLOY_ENTRY_POINT),
            calldata: call_data,
        };

        let request = self.deployment_request(class_hash, salt, calldata.to_vec());
        let address = request.derive_address(&self.constants);
        debug!(
            class_hash = %felt_to_hex(&class_hash),
            salt = %felt_to_hex(&salt),
            unique,
            %address,
            "built deployment call"
        );

        (call, address)
    }

    /// Address-derivation inputs the deployer contract will use
    pub fn deployment_request(
        &self,
        class_hash: Felt,
        salt: Felt,
        calldata: Vec<Felt>,
    ) -> DeploymentRequest {
        match self.account_address {
            Some(account) => DeploymentRequest {
                class_hash,
                salt: pedersen(&account, &salt),
                deployer: Some(self.deployer_address),
                calldata,
            },
            None => DeploymentRequest {
                class_hash,
                salt,
                deployer: None,
                calldata,
            },
        }
    }

    /// Submit a deployment and return its hash with the predicted address
    pub async fn deploy<S>(
        &self,
        submitter: &S,
        class_hash: Felt,
        constructor_args: Option<&CalldataValue>,
        options: &DeployOptions,
    ) -> Result<DeployResult, SdkError>
    where
        S: Submitter + ?Sized,
    {
        let (call, address) = self.create_deployment_call(class_hash, constructor_args, options)?;
        let transaction_hash = submitter.submit(vec![call], options.max_fee).await?;
        Ok(DeployResult {
            transaction_hash,
            address,
        })
    }
}

/// Encode constructor calldata when no ABI is available
pub fn encode_raw_calldata(values: &[CalldataValue]) -> Result<Vec<Felt>, SdkError> {
    let mut out = Vec::new();
    for value in values {
        out.extend(encode_untyped(value)?);
    }
    Ok(out)
}

/// Check the receipt's deployment event against the predicted address.
///
/// The deployer contract emits the new address as the first data element of
/// its first event.
pub fn verify_deployment(
    receipt: &TransactionReceipt,
    predicted: &PredictedAddress,
) -> Result<(), SdkError> {
    let actual = receipt
        .events
        .first()
        .and_then(|event| event.data.first())
        .copied()
        .ok_or(SdkError::MissingDeploymentEvent(receipt.transaction_hash))?;

    if actual != predicted.0 {
        return Err(SdkError::AddressMismatch {
            predicted: predicted.0,
            actual,
        });
    }
    Ok(())
}

/// A submitted deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployResult {
    /// Hash of the deployment transaction
    pub transaction_hash: TxHash,
    /// Address the contract will receive
    pub address: PredictedAddress,
}

impl DeployResult {
    /// Wait for the deployment to be accepted and check the emitted address
    pub async fn wait_for_acceptance<Q>(
        &self,
        ledger: &Q,
        options: &WaitOptions,
    ) -> Result<TransactionReceipt, SdkError>
    where
        Q: LedgerQuery + ?Sized,
    {
        let receipt = wait_for_finality(ledger, self.transaction_hash, options).await?;
        verify_deployment(&receipt, &self.address)?;
        Ok(receipt)
    }
}
