//! Data models for the repository layer

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use techwiser_core::{ChatMessage, GeneratedFile};

/// Keys assigned by the store; never taken from client payloads
const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "expiresAt"];

fn strip_reserved(extra: &mut Map<String, Value>) {
    for key in RESERVED_KEYS {
        extra.remove(key);
    }
}

/// A saved generation project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Local time of the last generation, `HH:MM`
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub files: Vec<GeneratedFile>,

    /// The last prompt sent, including any language prefix
    #[serde(default)]
    pub last_prompt: String,

    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    /// Fields this server does not know about, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Whether the project is at least `ttl` old at `now`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.created_at) >= ttl
    }

    /// Shallow-merge `patch` into this project
    pub fn apply(&mut self, patch: ProjectPatch) {
        let ProjectPatch {
            title,
            date,
            files,
            last_prompt,
            chat_history,
            mut extra,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(files) = files {
            self.files = files;
        }
        if let Some(last_prompt) = last_prompt {
            self.last_prompt = last_prompt;
        }
        if let Some(chat_history) = chat_history {
            self.chat_history = chat_history;
        }

        strip_reserved(&mut extra);
        self.extra.extend(extra);
    }
}

/// Create payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub files: Vec<GeneratedFile>,

    #[serde(default)]
    pub last_prompt: String,

    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewProject {
    /// Stamp id and timestamps onto the payload
    pub fn into_project(self, id: String, now: DateTime<Utc>, ttl: Duration) -> Project {
        let mut extra = self.extra;
        strip_reserved(&mut extra);

        let created_at = now.trunc_subsecs(3);
        Project {
            id,
            title: self.title,
            date: self.date,
            files: self.files,
            last_prompt: self.last_prompt,
            chat_history: self.chat_history,
            created_at,
            expires_at: created_at + ttl,
            extra,
        }
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<GeneratedFile>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<Vec<ChatMessage>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Next free millisecond id at `now`
pub(crate) fn next_project_id(existing: &[Project], now: DateTime<Utc>) -> String {
    let mut millis = now.timestamp_millis();
    loop {
        let candidate = millis.to_string();
        if !existing.iter().any(|p| p.id == candidate) {
            return candidate;
        }
        millis += 1;
    }
}

/// A chat workspace stored in the hosted document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Document id
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Arbitrary message list owned by the front end
    #[serde(default)]
    pub messages: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_token: Option<String>,
}

/// Result of a workspace delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
