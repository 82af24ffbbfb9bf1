//! Gallery item model

use serde::{Deserialize, Serialize};

use super::EventRef;

/// A photo in the gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub event_id: Option<EventRef>,
}

/// Admin form payload for a gallery item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryDraft {
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl From<&GalleryItem> for GalleryDraft {
    fn from(item: &GalleryItem) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone().unwrap_or_default(),
            image_url: item.image_url.clone(),
            event_id: item.event_id.as_ref().map(|r| r.id().to_string()),
        }
    }
}
