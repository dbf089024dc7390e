use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: i64,
    #[serde(rename = "screenId")]
    pub screen_id: String,
    pub data: String,
    pub created_at: String,
    pub updated_at: String,
}

/// `data` is kept as raw JSON so a non-string body can be rejected with a
/// 400 rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct SaveContent {
    #[serde(rename = "screenId", default)]
    pub screen_id: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContent {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    #[serde(rename = "screenId")]
    pub screen_id: Option<String>,
}
