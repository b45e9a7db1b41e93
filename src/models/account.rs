use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A meter/user/contract association, identified primarily by `hepek`.
///
/// Unknown keys sent by clients are kept in `extra` and written back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub user: String,
    pub info: String,
    pub hepek: String,
    #[serde(default)]
    pub energy_contract_address: Option<String>,
    #[serde(default)]
    pub ergon_contract_address: Option<String>,
    #[serde(default)]
    pub carbon_contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountRecord {
    /// Name of the readings log owned by this account: `{info}_{hepek}`.
    pub fn readings_key(&self) -> String {
        format!("{}_{}", self.info, self.hepek)
    }

    pub fn field(&self, field: LookupField) -> &str {
        match field {
            LookupField::Info => &self.info,
            LookupField::Hepek => &self.hepek,
            LookupField::User => &self.user,
        }
    }

    /// The Upsert match rule: same `hepek`, or same `info` under a different `hepek`.
    pub fn matches_for_upsert(&self, incoming: &AccountRecord) -> bool {
        self.hepek == incoming.hepek
            || (self.info == incoming.info && incoming.hepek != self.hepek)
    }

    /// Overwrite the contract addresses present in `addrs`; an explicit null
    /// clears the address. Returns true if any field changed.
    pub fn apply_contracts(&mut self, addrs: &ContractAddresses) -> bool {
        let mut changed = false;
        let pairs = [
            (&mut self.energy_contract_address, &addrs.energy_contract_address),
            (&mut self.ergon_contract_address, &addrs.ergon_contract_address),
            (&mut self.carbon_contract_address, &addrs.carbon_contract_address),
        ];

        for (current, wanted) in pairs {
            if let Some(w) = wanted
                && current != w
            {
                *current = w.clone();
                changed = true;
            }
        }
        changed
    }
}

/// Body of `POST /acc/setcontracts`.
///
/// Outer `None`: field absent, records untouched. `Some(None)`: explicit
/// null, address cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractAddresses {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub energy_contract_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub ergon_contract_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub carbon_contract_address: Option<Option<String>>,
}

/// Marks a field as sent, keeping `null` distinct from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Fields accepted by Lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupField {
    Info,
    Hepek,
    User,
}

impl LookupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupField::Info => "info",
            LookupField::Hepek => "hepek",
            LookupField::User => "user",
        }
    }
}

impl fmt::Display for LookupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupField {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "info" => Ok(LookupField::Info),
            "hepek" => Ok(LookupField::Hepek),
            "user" => Ok(LookupField::User),
            other => Err(AppError::InvalidInput(format!(
                "unknown lookup field '{other}'"
            ))),
        }
    }
}
