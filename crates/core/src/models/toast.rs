//! Toast (promotional popup) model

use serde::{Deserialize, Serialize};

use super::{is_object_id, EventRef};

/// A promotional notice shown as a popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub event_id: Option<EventRef>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_active: bool,
}

/// Admin form state for a new toast
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastDraft {
    pub message: String,
    pub event_id: String,
    pub photo: String,
    pub link: String,
}

/// Body sent to `POST /toast`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastPayload {
    pub message: String,
    pub photo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl ToastDraft {
    /// Build the request body, dropping an empty link and any event id that
    /// is not a backend object id
    pub fn to_payload(&self, photo_url: Option<&str>) -> ToastPayload {
        let link = self.link.trim();
        let event_id = self.event_id.trim();
        ToastPayload {
            message: self.message.clone(),
            photo: photo_url.unwrap_or(&self.photo).to_string(),
            link: (!link.is_empty()).then(|| link.to_string()),
            event_id: is_object_id(event_id).then(|| event_id.to_string()),
        }
    }
}
