use serde::{Deserialize, Serialize};

/// Inbound frame type names.
pub mod peer_type {
    pub const SUBSCRIBE: &str = "subscribe";
    pub const IDENTIFY: &str = "identify";
    pub const NEW_SCREEN: &str = "new-screen";
    pub const NEW_CONTENT: &str = "new-content";
    pub const UPDATE_CONTENT: &str = "update-content";
    pub const DELETE_CONTENT: &str = "delete-content";
}

pub const WELCOME_MESSAGE: &str = "Connected to signage server";
pub const INVALID_FRAME_MESSAGE: &str = "Invalid message format";
pub const MISSING_SCREEN_ID_MESSAGE: &str = "screenId is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ScreenRegistered,
    ContentCreated,
    ContentUpdated,
    ContentDeleted,
}

/// Where an event is delivered. Fixed per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    All,
    Screen(&'a str),
}

/// One fact to push to live screens after it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ScreenRegistered {
        screen_id: String,
    },
    ContentCreated {
        id: i64,
        screen_id: String,
        data: String,
    },
    ContentUpdated {
        id: i64,
        screen_id: String,
        data: String,
    },
    ContentDeleted {
        id: i64,
        screen_id: String,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ScreenRegistered { .. } => EventKind::ScreenRegistered,
            Event::ContentCreated { .. } => EventKind::ContentCreated,
            Event::ContentUpdated { .. } => EventKind::ContentUpdated,
            Event::ContentDeleted { .. } => EventKind::ContentDeleted,
        }
    }

    /// Screen announcements go to everyone; content changes only to the
    /// screen they belong to.
    pub fn target(&self) -> Target<'_> {
        match self {
            Event::ScreenRegistered { .. } => Target::All,
            Event::ContentCreated { screen_id, .. }
            | Event::ContentUpdated { screen_id, .. }
            | Event::ContentDeleted { screen_id, .. } => Target::Screen(screen_id),
        }
    }

    pub fn to_frame(&self) -> ServerFrame<'_> {
        match self {
            Event::ScreenRegistered { screen_id } => ServerFrame::NewScreen { screen_id },
            Event::ContentCreated {
                id,
                screen_id,
                data,
            } => ServerFrame::NewContent {
                id: *id,
                screen_id,
                data,
            },
            Event::ContentUpdated { id, data, .. } => ServerFrame::UpdateContent { id: *id, data },
            Event::ContentDeleted { id, .. } => ServerFrame::DeleteContent { id: *id },
        }
    }

    /// Build an event from a peer-relayed frame. `None` if the frame is not a
    /// publish type or lacks part of the payload.
    pub fn from_peer(frame: &PeerFrame) -> Option<Event> {
        let screen_id = frame
            .screen_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        match frame.kind.as_str() {
            peer_type::NEW_SCREEN => Some(Event::ScreenRegistered {
                screen_id: screen_id?,
            }),
            peer_type::NEW_CONTENT => Some(Event::ContentCreated {
                id: frame.id?,
                screen_id: screen_id?,
                data: frame.data.clone()?,
            }),
            peer_type::UPDATE_CONTENT => Some(Event::ContentUpdated {
                id: frame.id?,
                screen_id: screen_id?,
                data: frame.data.clone()?,
            }),
            peer_type::DELETE_CONTENT => Some(Event::ContentDeleted {
                id: frame.id?,
                screen_id: screen_id?,
            }),
            _ => None,
        }
    }
}

pub fn is_publish_type(kind: &str) -> bool {
    matches!(
        kind,
        peer_type::NEW_SCREEN
            | peer_type::NEW_CONTENT
            | peer_type::UPDATE_CONTENT
            | peer_type::DELETE_CONTENT
    )
}

/// Frames written to peers.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerFrame<'a> {
    Welcome {
        message: &'a str,
    },
    NewScreen {
        #[serde(rename = "screenId")]
        screen_id: &'a str,
    },
    NewContent {
        id: i64,
        #[serde(rename = "screenId")]
        screen_id: &'a str,
        data: &'a str,
    },
    UpdateContent {
        id: i64,
        data: &'a str,
    },
    DeleteContent {
        id: i64,
    },
    Error {
        message: &'a str,
    },
}

impl ServerFrame<'_> {
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Envelope for every frame a peer sends. Only `type` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerFrame {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "screenId", default)]
    pub screen_id: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub data: Option<String>,
}
