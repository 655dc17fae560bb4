// src/models.rs

use serde::Deserialize;
use std::path::PathBuf;

/// Runtime classification of one raw target string from the command line or
/// the interactive form. Variants mirror the order the checks run in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Url(String),
    File(PathBuf),
    Directory(PathBuf),
    Invalid(String),
}

/// Standard `{ data, success, status }` wrapper every API resource comes in.
/// `data` stays untyped here; callers decode it once `success` is known,
/// because on failure the same field holds an error payload instead.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub success: bool,
}

impl Envelope {
    /// Service-reported failure message. The `error` field is a plain string
    /// on most endpoints but an object on a few, so both shapes are handled.
    pub fn error_message(&self) -> Option<String> {
        match self.data.get("error")? {
            serde_json::Value::String(message) => Some(message.clone()),
            serde_json::Value::Object(detail) => detail
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_owned),
            _ => None,
        }
    }
}

/// Result of creating an album. `deletehash` doubles as the association
/// token that later uploads pass to land inside the album.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumHandle {
    pub id: String,
    pub deletehash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub id: String,
    #[serde(default)]
    pub deletehash: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Optional metadata attached to an individual image upload.
#[derive(Debug, Clone, Default)]
pub struct UploadConfig {
    pub album: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Token pair handed back by the OAuth endpoint. Unlike the resource
/// endpoints this payload is flat, with no envelope around it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub account_username: Option<String>,
}

/// Subset of the account settings payload. Fetching it is how a stored
/// access token is probed for validity.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSettings {
    #[serde(default)]
    pub account_url: Option<String>,
}

/// Rate-limit counters as reported by the credits endpoint. The service
/// uses PascalCase keys here, unlike everywhere else.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimit {
    #[serde(rename = "UserLimit", default)]
    pub user_limit: Option<i64>,
    #[serde(rename = "UserRemaining", default)]
    pub user_remaining: Option<i64>,
    #[serde(rename = "UserReset", default)]
    pub user_reset: Option<i64>,
    #[serde(rename = "ClientLimit", default)]
    pub client_limit: Option<i64>,
    #[serde(rename = "ClientRemaining", default)]
    pub client_remaining: Option<i64>,
}

impl RateLimit {
    pub fn summary(&self) -> String {
        let fmt = |v: Option<i64>| v.map_or_else(|| "?".to_string(), |n| n.to_string());
        format!(
            "Credits remaining: client {}/{}, user {}/{}",
            fmt(self.client_remaining),
            fmt(self.client_limit),
            fmt(self.user_remaining),
            fmt(self.user_limit),
        )
    }
}

/// What a completed batch hands back to the front-end for the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub album_id: String,
    pub image_ids: Vec<String>,
}
