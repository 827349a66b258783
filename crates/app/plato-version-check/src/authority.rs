//! The remote side of the version check.
//!
//! The authority owns the "is it newer" and "is it mandatory" decisions; the
//! client only forwards its running version code and trusts the flags that
//! come back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    error::{Result, VersionCheckError},
    types::{AppVersionRecord, Platform, UpdateType, VersionCode},
};

/// Parameters of a single lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionQuery {
    #[serde(rename = "p_current_version_code")]
    pub current_version_code: VersionCode,
    #[serde(rename = "p_platform")]
    pub platform: Platform,
}

/// One row as returned by the authority
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionRow {
    pub update_required: bool,
    pub is_mandatory: bool,
    pub latest_version_name: String,
    pub latest_version_code: i64,
    pub update_type: UpdateType,
    #[serde(default)]
    pub update_message: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub release_notes: Option<String>,
}

impl TryFrom<VersionRow> for AppVersionRecord {
    type Error = VersionCheckError;

    fn try_from(row: VersionRow) -> Result<Self> {
        let version_code = VersionCode::try_from(row.latest_version_code)?;
        let download_url = match row.download_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(Url::parse(raw).map_err(|e| {
                VersionCheckError::InvalidRecord(format!("download_url '{}': {}", raw, e))
            })?),
        };

        Ok(AppVersionRecord {
            version_name: row.latest_version_name,
            version_code,
            update_type: row.update_type,
            is_mandatory: row.is_mandatory,
            download_url,
            update_message: row.update_message.filter(|m| !m.trim().is_empty()),
            release_notes: row.release_notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Source of truth for published releases
#[async_trait]
pub trait VersionAuthority: Send + Sync {
    /// Returns the newest active release for the platform, or `None` when
    /// nothing is published for it.
    async fn latest_version(&self, query: VersionQuery) -> Result<Option<VersionRow>>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RowsOrRow {
    Rows(Vec<VersionRow>),
    Row(VersionRow),
}

/// Decode an authority response body. An empty body, `null` and `[]` all
/// mean "nothing published"; when several rows come back the highest
/// version code wins.
pub fn parse_response(body: &str) -> Result<Option<VersionRow>> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let parsed: Option<RowsOrRow> = serde_json::from_str(body)?;
    Ok(match parsed {
        None => None,
        Some(RowsOrRow::Row(row)) => Some(row),
        Some(RowsOrRow::Rows(rows)) => rows.into_iter().max_by_key(|r| r.latest_version_code),
    })
}
