use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screen {
    pub id: String,
    pub created_at: String,
}

/// Registry-aware view returned by the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenStatus {
    pub id: String,
    pub created_at: String,
    pub connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterScreen {
    #[serde(rename = "screenId", default)]
    pub screen_id: Option<String>,
}
