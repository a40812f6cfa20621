//! Construction of the eligibility parameters passed to the Zikuani initializers

use std::{fs, path::Path};

use alloy_primitives::{address, Address, U256};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        COUNTRY_CODE_LEN, IDENTITY_CREATION_WINDOW_SECS, MINIMUM_AGE_YEARS, POLICY_DATE_FORMAT,
        SECONDS_PER_YEAR,
    },
    errors::ScriptError,
    solidity::{InitialLists, VoteParams},
};

// ----------
// | Policy |
// ----------

/// The externally supplied policy values the parameters are built from
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolicyConfig {
    /// ISO 3166-1 alpha-3 codes of the accepted citizenships
    pub citizenship_whitelist: Vec<String>,
    /// The date, as `YYYY-MM-DD`, after which documents must expire
    pub expiration_date_lower_bound: String,
    /// The maximum identity counter of an eligible identity
    pub identity_counter_upper_bound: u64,
    /// Addresses initially allowed to transfer
    #[serde(default)]
    pub transfer_whitelist: Vec<Address>,
    /// Addresses initially barred from transferring
    #[serde(default)]
    pub transfer_blacklist: Vec<Address>,
    /// ISO 3166-1 alpha-3 codes of the nationalities initially allowed to transfer
    #[serde(default)]
    pub nationality_whitelist: Vec<String>,
}

impl PolicyConfig {
    /// Read a policy from a JSON file
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScriptError::Configuration(format!("failed to read policy {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ScriptError::Configuration(format!("failed to parse policy {}: {}", path.display(), e))
        })
    }

    /// The example policy used when no policy file is given
    pub fn example() -> Self {
        Self {
            citizenship_whitelist: vec!["CRI".to_string()],
            expiration_date_lower_bound: "2026-01-01".to_string(),
            identity_counter_upper_bound: 1,
            transfer_whitelist: vec![address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8")],
            transfer_blacklist: vec![address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC")],
            nationality_whitelist: vec!["CRI".to_string()],
        }
    }
}

// --------------
// | Parameters |
// --------------

/// The eligibility constraints a Zikuani contract is initialized with
///
/// Serializes with the field names of the on-chain `VoteParams` struct.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EligibilityParams {
    /// Latest accepted identity creation time, in seconds since the epoch
    #[serde(rename = "identityCreationTimestampUpperBound")]
    pub identity_creation_timestamp_upper_bound: u64,
    /// Accepted citizenships, each a 24-bit encoded country code
    #[serde(rename = "citizenshipWhitelist")]
    pub citizenship_whitelist: Vec<u32>,
    /// Earliest accepted birth date, in seconds since the epoch
    #[serde(rename = "birthDateLowerbound")]
    pub birth_date_lower_bound: u64,
    /// Earliest accepted document expiration date, in seconds since the epoch
    #[serde(rename = "expirationDateLowerBound")]
    pub expiration_date_lower_bound: u64,
    /// Maximum accepted identity counter
    #[serde(rename = "identityCounterUpperBound")]
    pub identity_counter_upper_bound: u64,
}

impl EligibilityParams {
    /// Build the parameters for the given policy, relative to the reference
    /// time `now` in seconds since the epoch
    pub fn build(policy: &PolicyConfig, now: u64) -> Result<Self, ScriptError> {
        let citizenship_whitelist = encode_country_codes(&policy.citizenship_whitelist)?;
        let expiration_date_lower_bound = parse_policy_date(&policy.expiration_date_lower_bound)?;
        let identity_creation_timestamp_upper_bound =
            now.checked_add(IDENTITY_CREATION_WINDOW_SECS).ok_or_else(|| {
                ScriptError::Configuration(format!("reference time {} is out of range", now))
            })?;

        Ok(Self {
            identity_creation_timestamp_upper_bound,
            citizenship_whitelist,
            // Clamped at the epoch, the contract takes an unsigned bound
            birth_date_lower_bound: now.saturating_sub(MINIMUM_AGE_YEARS * SECONDS_PER_YEAR),
            expiration_date_lower_bound,
            identity_counter_upper_bound: policy.identity_counter_upper_bound,
        })
    }

    /// Render the parameters as indented JSON
    pub fn to_pretty_json(&self) -> Result<String, ScriptError> {
        serde_json::to_string_pretty(self).map_err(|e| ScriptError::Serde(e.to_string()))
    }
}

impl From<&EligibilityParams> for VoteParams {
    fn from(params: &EligibilityParams) -> Self {
        VoteParams {
            identityCreationTimestampUpperBound: U256::from(
                params.identity_creation_timestamp_upper_bound,
            ),
            citizenshipWhitelist: params
                .citizenship_whitelist
                .iter()
                .copied()
                .map(U256::from)
                .collect(),
            birthDateLowerbound: U256::from(params.birth_date_lower_bound),
            expirationDateLowerBound: U256::from(params.expiration_date_lower_bound),
            identityCounterUpperBound: U256::from(params.identity_counter_upper_bound),
        }
    }
}

/// The transfer lists a blacklist transfer contract is initialized with
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferLists {
    /// Addresses allowed to transfer
    pub whitelist: Vec<Address>,
    /// Addresses barred from transferring
    pub blacklist: Vec<Address>,
    /// Nationalities allowed to transfer, each a 24-bit encoded country code
    pub nationality_whitelist: Vec<u32>,
}

impl TransferLists {
    /// Build the transfer lists for the given policy
    pub fn build(policy: &PolicyConfig) -> Result<Self, ScriptError> {
        Ok(Self {
            whitelist: policy.transfer_whitelist.clone(),
            blacklist: policy.transfer_blacklist.clone(),
            nationality_whitelist: encode_country_codes(&policy.nationality_whitelist)?,
        })
    }

    /// Render the lists as indented JSON
    pub fn to_pretty_json(&self) -> Result<String, ScriptError> {
        serde_json::to_string_pretty(self).map_err(|e| ScriptError::Serde(e.to_string()))
    }
}

impl From<&TransferLists> for InitialLists {
    fn from(lists: &TransferLists) -> Self {
        InitialLists {
            whitelist: lists.whitelist.clone(),
            blacklist: lists.blacklist.clone(),
            nationalityWhitelist: lists
                .nationality_whitelist
                .iter()
                .copied()
                .map(U256::from)
                .collect(),
        }
    }
}

// -----------
// | Helpers |
// -----------

/// Encode an ISO 3166-1 alpha-3 country code as a 24-bit big-endian ASCII integer,
/// e.g. `"CRI"` -> `0x435249`
pub fn encode_country_code(code: &str) -> Result<u32, ScriptError> {
    let bytes = code.as_bytes();
    if bytes.len() != COUNTRY_CODE_LEN || !bytes.iter().all(u8::is_ascii_uppercase) {
        return Err(ScriptError::Configuration(format!(
            "invalid country code `{}`, expected three uppercase ASCII letters",
            code
        )));
    }

    Ok(bytes.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b)))
}

/// Encode a list of country codes
fn encode_country_codes(codes: &[String]) -> Result<Vec<u32>, ScriptError> {
    codes.iter().map(|c| encode_country_code(c)).collect()
}

/// Parse a `YYYY-MM-DD` date into seconds since the epoch at midnight UTC
pub fn parse_policy_date(date: &str) -> Result<u64, ScriptError> {
    let timestamp = NaiveDate::parse_from_str(date, POLICY_DATE_FORMAT)
        .map_err(|e| ScriptError::Configuration(format!("invalid date `{}`: {}", date, e)))?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ScriptError::Configuration(format!("invalid date `{}`", date)))?
        .and_utc()
        .timestamp();

    u64::try_from(timestamp)
        .map_err(|_| ScriptError::Configuration(format!("date `{}` predates the epoch", date)))
}

/// The current wall-clock time in seconds since the epoch
pub fn current_timestamp() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use alloy_primitives::U256;

    use crate::{errors::ScriptError, solidity::VoteParams};

    use super::{encode_country_code, parse_policy_date, EligibilityParams, PolicyConfig};

    /// 2025-06-01T12:00:00Z
    const REFERENCE_TIME: u64 = 1_748_779_200;

    /// 2026-01-01T00:00:00Z
    const NEW_YEAR_2026: u64 = 1_767_225_600;

    #[test]
    fn test_relative_bounds() {
        for now in [REFERENCE_TIME, REFERENCE_TIME + 1, 2_000_000_000] {
            let params = EligibilityParams::build(&PolicyConfig::example(), now).unwrap();
            assert_eq!(params.identity_creation_timestamp_upper_bound, now + 2_592_000);
            assert_eq!(params.birth_date_lower_bound, now - 18 * 365 * 24 * 3600);
        }
    }

    #[test]
    fn test_expiration_bound_is_fixed() {
        let a = EligibilityParams::build(&PolicyConfig::example(), REFERENCE_TIME).unwrap();
        let b = EligibilityParams::build(&PolicyConfig::example(), 2_000_000_000).unwrap();
        assert_eq!(a.expiration_date_lower_bound, NEW_YEAR_2026);
        assert_eq!(b.expiration_date_lower_bound, NEW_YEAR_2026);
        assert_eq!(a.identity_counter_upper_bound, 1);
    }

    #[test]
    fn test_birth_date_clamped() {
        let params = EligibilityParams::build(&PolicyConfig::example(), 1_000).unwrap();
        assert_eq!(params.birth_date_lower_bound, 0);
    }

    #[test]
    fn test_reference_time_overflow() {
        let err = EligibilityParams::build(&PolicyConfig::example(), u64::MAX).unwrap_err();
        assert!(matches!(err, ScriptError::Configuration(_)));

        let last = u64::MAX - 30 * 24 * 60 * 60;
        let params = EligibilityParams::build(&PolicyConfig::example(), last).unwrap();
        assert_eq!(params.identity_creation_timestamp_upper_bound, u64::MAX);
    }

    #[test]
    fn test_country_codes() {
        assert_eq!(encode_country_code("CRI").unwrap(), 0x435249);
        assert_eq!(encode_country_code("USA").unwrap(), 0x555341);
        for bad in ["CR", "CRIA", "cri", "C1I", ""] {
            assert!(matches!(encode_country_code(bad), Err(ScriptError::Configuration(_))));
        }
    }

    #[test]
    fn test_policy_dates() {
        assert_eq!(parse_policy_date("2026-01-01").unwrap(), NEW_YEAR_2026);
        assert_eq!(parse_policy_date("1970-01-01").unwrap(), 0);
        assert!(parse_policy_date("2026-13-01").is_err());
        assert!(parse_policy_date("1969-12-31").is_err());
    }

    #[test]
    fn test_json_field_names() {
        let params = EligibilityParams::build(&PolicyConfig::example(), REFERENCE_TIME).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&params.to_pretty_json().unwrap()).unwrap();

        assert_eq!(json["citizenshipWhitelist"][0], 0x435249);
        assert_eq!(json["birthDateLowerbound"], REFERENCE_TIME - 567_648_000);
        assert_eq!(json["expirationDateLowerBound"], NEW_YEAR_2026);
        assert_eq!(json["identityCreationTimestampUpperBound"], REFERENCE_TIME + 2_592_000);
        assert_eq!(json["identityCounterUpperBound"], 1);
    }

    #[test]
    fn test_policy_file() {
        let policy: PolicyConfig = serde_json::from_str(
            r#"{
                "citizenshipWhitelist": ["CRI", "PAN"],
                "expirationDateLowerBound": "2027-06-30",
                "identityCounterUpperBound": 3
            }"#,
        )
        .unwrap();
        assert!(policy.transfer_whitelist.is_empty());

        let params = EligibilityParams::build(&policy, REFERENCE_TIME).unwrap();
        assert_eq!(params.citizenship_whitelist, vec![0x435249, 0x50414e]);
        assert_eq!(params.identity_counter_upper_bound, 3);

        let sol_params = VoteParams::from(&params);
        assert_eq!(sol_params.identityCounterUpperBound, U256::from(3));
        assert_eq!(sol_params.citizenshipWhitelist.len(), 2);
    }

    #[test]
    fn test_shipped_example_policy() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../policies/example.json");
        assert_eq!(PolicyConfig::load(&path).unwrap(), PolicyConfig::example());
    }

    #[test]
    fn test_unknown_policy_fields_rejected() {
        let res = serde_json::from_str::<PolicyConfig>(
            r#"{
                "citizenshipWhitelist": [],
                "expirationDateLowerBound": "2026-01-01",
                "identityCounterUpperBound": 1,
                "minAge": 21
            }"#,
        );
        assert!(res.is_err());
    }
}
