// Wire types for the label service.
//
// Records keep every field the server sends: known fields are typed,
// anything else lands in a flattened `extra` map so round-tripping a
// record never drops data.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use url::Url;

// ── EntityId ────────────────────────────────────────────────────────

/// Identifier of a server record.
///
/// The service issues integer ids; string ids are accepted so the client
/// keeps working against deployments that use opaque keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Numeric))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|never| match never {})
    }
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful `/auth/login` response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: SecretString,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Payload for `/auth/register`.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

#[derive(Serialize)]
pub(crate) struct RegistrationRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// The signed-in user as reported by `/auth/me`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Shallow-merge `patch` into this profile. Keys present in `patch`
    /// overwrite existing values; everything else is left alone.
    pub fn merge(&mut self, patch: Map<String, Value>) -> Result<(), serde_json::Error> {
        let mut current = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        current.extend(patch);
        *self = serde_json::from_value(Value::Object(current))?;
        Ok(())
    }
}

/// Partial profile update for `PUT /auth/me`. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

// ── Labels ──────────────────────────────────────────────────────────

/// A label record as returned by list and create endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Label {
    /// A bare record carrying only an id.
    pub fn with_id(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            sender_name: None,
            shipping_code: None,
            image_path: None,
            created_at: None,
            sender_phone: None,
            recipient_name: None,
            recipient_address: None,
            recipient_phone: None,
            extra: Map::new(),
        }
    }
}

/// Print-ready view of a label (`GET /{category}/print/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintableLabel {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_data: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Creation payload for a generic label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLabel {
    pub sender_name: String,
    pub shipping_code: String,
}

/// Creation payload for a shipping label. An empty `shipping_code` asks
/// the server to assign one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShippingLabel {
    pub sender_name: String,
    pub sender_phone: String,
    pub recipient_name: String,
    pub recipient_address: String,
    pub recipient_phone: String,
    #[serde(default)]
    pub shipping_code: String,
}

#[derive(Serialize)]
pub(crate) struct BulkDeleteRequest<'a> {
    pub ids: &'a [EntityId],
}

/// Server summary for a bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkDeleteResult {
    #[serde(default, alias = "deleted_count", skip_serializing_if = "Option::is_none")]
    pub deleted: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_ids: Vec<FailedDelete>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BulkDeleteResult {
    /// Build a result from any JSON the server sent.
    ///
    /// An object that does not fit the typed shape keeps its recognisable
    /// `deleted` and `message` fields and is otherwise preserved verbatim
    /// in `extra`. A non-object body lands in `extra["result"]`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::default(),
            Value::Object(map) => match serde_json::from_value(Value::Object(map.clone())) {
                Ok(result) => result,
                Err(_) => Self {
                    deleted: map
                        .get("deleted")
                        .or_else(|| map.get("deleted_count"))
                        .and_then(Value::as_u64),
                    failed_ids: Vec::new(),
                    message: map.get("message").and_then(Value::as_str).map(str::to_owned),
                    extra: map,
                },
            },
            other => {
                let mut extra = Map::new();
                extra.insert("result".to_owned(), other);
                Self {
                    extra,
                    ..Self::default()
                }
            }
        }
    }
}

/// One record the server refused to delete: a bare id or an object
/// describing the failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FailedDelete {
    Id(EntityId),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<EntityId>,
        #[serde(default, alias = "error", alias = "detail", skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl FailedDelete {
    pub fn id(&self) -> Option<&EntityId> {
        match self {
            Self::Id(id) => Some(id),
            Self::Detailed { id, .. } => id.as_ref(),
        }
    }
}

impl fmt::Display for FailedDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Detailed { id, reason, .. } => {
                match id {
                    Some(id) => write!(f, "{id}")?,
                    None => f.write_str("?")?,
                }
                match reason {
                    Some(reason) => write!(f, " ({reason})"),
                    None => Ok(()),
                }
            }
        }
    }
}

/// A downloaded preview image.
///
/// `url` carries the token as a query parameter so it can be handed to
/// consumers that cannot attach headers.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub url: Url,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

// ── Timestamp handling ──────────────────────────────────────────────

/// Accept RFC 3339 timestamps as well as naive ISO timestamps (read as UTC).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}
