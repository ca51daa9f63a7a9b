use crate::api::EnvConfig;
use crate::models::DocNode;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LiveErrorKind {
    Network,
    Http,
    Parse,
    NotFound,
}

#[derive(Clone, Debug)]
pub(crate) struct LiveError {
    pub kind: LiveErrorKind,
    pub message: String,
}

impl std::fmt::Display for LiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl LiveError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: LiveErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: LiveErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn not_found(key: &str) -> Self {
        Self {
            kind: LiveErrorKind::NotFound,
            message: format!("No live-state record for {key}"),
        }
    }

    fn http(status: reqwest::StatusCode, ctx: &str) -> Self {
        Self {
            kind: LiveErrorKind::Http,
            message: format!("{ctx} ({status})"),
        }
    }
}

pub(crate) type LiveResult<T> = Result<T, LiveError>;

/// Shape persisted and broadcast through the live-state channel, one record
/// per session key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct LiveStateRecord {
    pub content: DocNode,
}

#[derive(Serialize, Debug)]
struct GetRecordRequest<'a> {
    key: &'a str,
}

#[derive(Serialize, Debug)]
struct PutRecordRequest<'a> {
    key: &'a str,
    record: &'a LiveStateRecord,
}

/// Decide what `ensure` should do given the record currently on the channel.
///
/// Returns the record the caller should start from, plus whether the default
/// must be written. The default is strictly a creation fallback: an existing
/// record is returned untouched with no write.
pub(crate) fn ensure_outcome(
    existing: Option<LiveStateRecord>,
    default: LiveStateRecord,
) -> (LiveStateRecord, bool) {
    match existing {
        Some(record) => (record, false),
        None => (default, true),
    }
}

/// Client for the shared live-state channel: a key-value store holding one
/// `LiveStateRecord` per session.
///
/// Replication and merging across peers belong to the channel service; from
/// here every write is last-write-wins and fire-and-forget.
#[derive(Clone)]
pub(crate) struct LiveStateClient {
    base_url: String,
}

impl LiveStateClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().sync_url)
    }

    pub async fn read(&self, key: &str) -> LiveResult<LiveStateRecord> {
        let client = reqwest::Client::new();
        let res = client
            .post(format!("{}/livestate/get", self.base_url))
            .json(&GetRecordRequest { key })
            .send()
            .await
            .map_err(LiveError::network)?;

        if res.status().as_u16() == 404 {
            return Err(LiveError::not_found(key));
        }
        if !res.status().is_success() {
            return Err(LiveError::http(res.status(), "Live-state read failed"));
        }

        res.json().await.map_err(LiveError::parse)
    }

    pub async fn write(&self, key: &str, record: &LiveStateRecord) -> LiveResult<()> {
        let client = reqwest::Client::new();
        let res = client
            .post(format!("{}/livestate/put", self.base_url))
            .json(&PutRecordRequest { key, record })
            .send()
            .await
            .map_err(LiveError::network)?;

        if !res.status().is_success() {
            return Err(LiveError::http(res.status(), "Live-state write failed"));
        }
        Ok(())
    }

    /// Create-if-absent. Reads first and writes the default only when the
    /// channel reports the key missing, so calling this against an existing
    /// record never resets remote content.
    pub async fn ensure(
        &self,
        key: &str,
        default: LiveStateRecord,
    ) -> LiveResult<LiveStateRecord> {
        let existing = match self.read(key).await {
            Ok(record) => Some(record),
            Err(e) if e.kind == LiveErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        let (record, write_default) = ensure_outcome(existing, default);
        if write_default {
            self.write(key, &record).await?;
        }
        Ok(record)
    }
}
