//! Constants used in the deploy scripts

use alloy_primitives::{b256, B256};

/// The selector bitmask passed to the Zikuani initializers.
///
/// Identifies which fields the TD3 query proof discloses, and must match the
/// value used when the proof was generated. 2593 decimal == 0xA21.
pub const SELECTOR_BITMASK: u64 = 2593;

/// The number of seconds in a day
pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// The number of seconds in a (365 day) year
pub const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// How far past the reference time an identity may have been created
pub const IDENTITY_CREATION_WINDOW_SECS: u64 = 30 * SECONDS_PER_DAY;

/// The minimum age, in years, of an eligible identity holder
pub const MINIMUM_AGE_YEARS: u64 = 18;

/// The format of calendar dates in policy files
pub const POLICY_DATE_FORMAT: &str = "%Y-%m-%d";

/// The number of ASCII characters in an ISO 3166-1 alpha-3 country code
pub const COUNTRY_CODE_LEN: usize = 3;

/// The placeholder signing key used when no key is supplied.
///
/// This is not a valid secp256k1 key, so signing with it always fails.
pub const DEFAULT_PRIVATE_KEY: &str = "0xAAAAAAAA";

/// The default path of the address registry, relative to the working directory
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployed-contracts/ethereum.json";

/// The default directory holding Hardhat compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The extension of a compilation artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// Separates the source file from the contract name in a qualified contract name
pub const QUALIFIED_NAME_SEPARATOR: char = ':';

/// The default number of confirmations to wait for on deployment transactions
pub const DEFAULT_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: B256 =
    b256!("0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// The name of the OpenZeppelin transparent proxy contract artifact
pub const TRANSPARENT_PROXY_CONTRACT: &str = "TransparentUpgradeableProxy";

/// The name of the Zikuani vote contract
pub const ZIKUANI_VOTE_CONTRACT: &str = "ZikuaniVote";

/// The name of the Zikuani vote initializer
pub const ZIKUANI_VOTE_INITIALIZER: &str = "__ZikuaniVote_init";

/// The name of the Zikuani blacklist transfer contract
pub const ZIKUANI_BLACKLIST_TRANSFER_CONTRACT: &str = "ZikuaniBlacklistTransfer";

/// The name of the Zikuani blacklist transfer initializer
pub const ZIKUANI_BLACKLIST_TRANSFER_INITIALIZER: &str = "__ZikuaniBlacklistTransfer_init";

/// The suffix appended to a contract name to form the registry key of its proxy
pub const PROXY_KEY_SUFFIX: &str = "Proxy";

/// The credential issuer contract key in the address registry
pub const CREDENTIAL_ISSUER_KEY: &str = "ZKFirmaDigitalCredentialIssuer";

/// The TD3 query proof verifier contract key in the address registry
pub const VERIFIER_KEY: &str = "TD3QueryProofVerifier";

/// The registration SMT replicator contract key in the address registry
pub const REGISTRATION_SMT_KEY: &str = "RegistrationSMTReplicator";
