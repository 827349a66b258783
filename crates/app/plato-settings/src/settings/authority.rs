use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthoritySettings {
    /// Base URL of the hosted database that publishes releases
    pub endpoint: String,
    /// Name of the RPC that answers version lookups
    pub function: String,
    pub api_key: Option<String>,
}
