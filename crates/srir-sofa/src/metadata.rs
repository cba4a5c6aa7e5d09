//! Descriptive metadata carried in the container's global attributes.

use serde::{Deserialize, Serialize};

/// The free-text attributes of a container: database, room, and listener
/// names plus provenance fields. Everything here ends up verbatim in the
/// global attribute block.
///
/// # Example
/// ```
/// use srir_sofa::SofaMetadata;
///
/// let meta = SofaMetadata::default()
///     .with_database_name("living_room_scan")
///     .with_room_name("living_room")
///     .with_comment("synthesized from sweep 07");
/// assert_eq!(meta.title(), "living_room_scan - living_room");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofaMetadata {
    /// Database short name (`DatabaseName`).
    pub database_name: String,
    /// Room short name (`RoomShortName`, also part of `Title`).
    pub room_name: String,
    /// Listener short name (`ListenerShortName`), typically the array name.
    pub listener_name: String,
    /// Free-text comment (`Comment`).
    pub comment: String,
    /// Contact for the producing party (`AuthorContact`).
    pub author_contact: String,
    /// Producing organization (`Organization`).
    pub organization: String,
    /// License string (`License`).
    pub license: String,
}

impl Default for SofaMetadata {
    fn default() -> Self {
        Self {
            database_name: "Default_db".to_string(),
            room_name: "Room_name".to_string(),
            listener_name: "foa".to_string(),
            comment: "N/A".to_string(),
            author_contact: "N/A".to_string(),
            organization: "N/A".to_string(),
            license: "No license specified".to_string(),
        }
    }
}

impl SofaMetadata {
    /// Sets the database short name.
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }

    /// Sets the room short name.
    pub fn with_room_name(mut self, name: impl Into<String>) -> Self {
        self.room_name = name.into();
        self
    }

    /// Sets the listener short name.
    pub fn with_listener_name(mut self, name: impl Into<String>) -> Self {
        self.listener_name = name.into();
        self
    }

    /// Sets the free-text comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// The `Title` attribute: `<database> - <room>`.
    pub fn title(&self) -> String {
        format!("{} - {}", self.database_name, self.room_name)
    }
}
