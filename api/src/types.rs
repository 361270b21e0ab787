//! Wire types for the Smart Entry conference API
//!
//! All payloads are camelCase JSON, matching the server's conventions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity record for a conference attendee
///
/// The email is the identity key and never changes; the barcode is the
/// only field this client mutates (via assign/deassign), and it is unique
/// across all participants when present.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Unique email (identity key, immutable)
    pub email: String,
    /// Attendee name
    pub name: String,
    /// Registration reference number
    pub reference_no: String,
    /// Mobile number
    #[serde(default)]
    pub mobile: Option<String>,
    /// Institution
    #[serde(default)]
    pub institution: Option<String>,
    /// Designation
    #[serde(default)]
    pub designation: Option<String>,
    /// Registered category
    #[serde(default)]
    pub category: Option<String>,
    /// Submitted paper id
    #[serde(default)]
    pub paper_id: Option<String>,
    /// Amount paid at registration
    #[serde(default)]
    pub amount_paid: Option<f64>,
    /// Invoice number
    #[serde(default)]
    pub invoice_no: Option<String>,
    /// Assigned badge barcode, absent until an operator assigns one
    #[serde(default)]
    pub barcode: Option<String>,
}

impl Participant {
    /// Returns `true` if a badge barcode is currently assigned
    ///
    /// An empty-string barcode from the server counts as unassigned.
    #[must_use]
    pub fn has_barcode(&self) -> bool {
        self.barcode.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// A single attendance record
///
/// Append-only: entries are created by the mark-entry operation and never
/// mutated or deleted by this client. Multiple entries per participant
/// per venue are permitted (re-entry).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryEvent {
    /// Server-assigned identifier
    pub id: String,
    /// Barcode the entry was recorded against
    pub barcode: String,
    /// Participant snapshot, when the server embeds one
    #[serde(default)]
    pub participant: Option<Participant>,
    /// Venue the entry was recorded at
    pub venue: Venue,
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
}

/// One of the fixed set of physical locations where entry can be recorded
///
/// The set is config-like and not user-extensible at runtime; operator
/// input is parsed case-insensitively via [`str::parse`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Venue {
    /// Main conference hall
    #[serde(rename = "Main Hall")]
    MainHall,
    /// Exhibition hall
    #[serde(rename = "Exhibition Hall")]
    ExhibitionHall,
    /// Dining hall
    #[serde(rename = "Dining Hall")]
    DiningHall,
    /// Auditorium
    #[serde(rename = "Auditorium")]
    Auditorium,
}

impl Venue {
    /// Every venue, in display order
    pub const ALL: [Venue; 4] = [
        Venue::MainHall,
        Venue::ExhibitionHall,
        Venue::DiningHall,
        Venue::Auditorium,
    ];

    /// Display name, as sent over the wire
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Venue::MainHall => "Main Hall",
            Venue::ExhibitionHall => "Exhibition Hall",
            Venue::DiningHall => "Dining Hall",
            Venue::Auditorium => "Auditorium",
        }
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Operator input did not name a known venue
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown venue '{input}' (valid: Main Hall, Exhibition Hall, Dining Hall, Auditorium)")]
pub struct UnknownVenue {
    /// The rejected input
    pub input: String,
}

impl std::str::FromStr for Venue {
    type Err = UnknownVenue;

    /// Parse a venue name, ignoring case, whitespace, and separators
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "mainhall" | "main" => Ok(Venue::MainHall),
            "exhibitionhall" | "exhibition" => Ok(Venue::ExhibitionHall),
            "dininghall" | "dining" => Ok(Venue::DiningHall),
            "auditorium" => Ok(Venue::Auditorium),
            _ => Err(UnknownVenue { input: s.to_string() }),
        }
    }
}

/// Operator role, controlling which tabs the shell offers
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full access: workflows, reporting, and roster upload
    Admin,
    /// Desk workflows only: search/assign and entry marking
    Staff,
}

impl Role {
    /// Returns `true` for the admin role
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Staff => f.write_str("staff"),
        }
    }
}

/// Authenticated operator identity, as returned by login
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Operator email
    pub email: String,
    /// Display name, when the server has one
    #[serde(default)]
    pub name: Option<String>,
    /// Operator role
    pub role: Role,
}

/// Login request body
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Email or staff id
    pub identifier: String,
    /// Password
    pub password: String,
}

/// Successful login response
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Opaque bearer token for subsequent requests
    pub token: String,
    /// Authenticated operator identity
    pub user: UserIdentity,
}

/// Assign-barcode request body
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignBarcodeRequest {
    /// Participant identity key
    pub email: String,
    /// Badge barcode to assign
    pub barcode: String,
}

/// Deassign-barcode request body
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeassignBarcodeRequest {
    /// Participant identity key
    pub email: String,
}

/// Mark-entry request body
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkEntryRequest {
    /// Badge barcode
    pub barcode: String,
    /// Venue where the entry is recorded
    pub venue: Venue,
}

/// Mark-entry response: confirmation plus the updated recent history
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntryResponse {
    /// Human-readable confirmation from the server
    pub message: String,
    /// Participant the entry was recorded for
    #[serde(default)]
    pub participant: Option<Participant>,
    /// The entry that was just recorded
    pub entry: EntryEvent,
    /// Recent entries for the same barcode, most recent first
    #[serde(default)]
    pub history: Vec<EntryEvent>,
}

/// Entry-history response for a single barcode
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct EntryHistory {
    /// Recent entries, most recent first
    #[serde(default)]
    pub entries: Vec<EntryEvent>,
}

/// Aggregate entry statistics, computed server-side and displayed as-is
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EntryStats {
    /// Total number of entry events recorded
    pub total_entries: u64,
    /// Number of distinct participants with at least one entry
    pub unique_participants: u64,
}

/// Result summary of a roster upload
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Rows imported
    pub imported: u64,
    /// Rows skipped (duplicates or already present)
    #[serde(default)]
    pub skipped: u64,
    /// Per-row import errors reported by the server
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;

    #[test]
    fn participant_deserializes_camel_case() {
        let json = r#"{
            "email": "jane@event.com",
            "name": "Jane Doe",
            "referenceNo": "REF-001",
            "mobile": "555-0100",
            "institution": "Example University",
            "barcode": "BC100"
        }"#;

        let participant: Participant = serde_json::from_str(json).unwrap();
        assert_eq!(participant.email, "jane@event.com");
        assert_eq!(participant.reference_no, "REF-001");
        assert_eq!(participant.barcode.as_deref(), Some("BC100"));
        assert!(participant.has_barcode());
        assert!(participant.paper_id.is_none());
    }

    #[test]
    fn empty_barcode_counts_as_unassigned() {
        let json = r#"{"email":"a@b.c","name":"A","referenceNo":"R1","barcode":""}"#;
        let participant: Participant = serde_json::from_str(json).unwrap();
        assert!(!participant.has_barcode());
    }

    #[test]
    fn venue_serializes_as_display_name() {
        assert_eq!(
            serde_json::to_string(&Venue::MainHall).unwrap(),
            "\"Main Hall\""
        );
    }

    #[test]
    fn venue_parses_loosely() {
        assert_eq!("Main Hall".parse::<Venue>().unwrap(), Venue::MainHall);
        assert_eq!("main-hall".parse::<Venue>().unwrap(), Venue::MainHall);
        assert_eq!("AUDITORIUM".parse::<Venue>().unwrap(), Venue::Auditorium);
        assert_eq!("dining".parse::<Venue>().unwrap(), Venue::DiningHall);
        assert!("backstage".parse::<Venue>().is_err());
    }

    #[test]
    fn role_uses_uppercase_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"STAFF\"").unwrap();
        assert_eq!(role, Role::Staff);
    }

    #[test]
    fn entry_stats_deserializes_camel_case() {
        let stats: EntryStats =
            serde_json::from_str(r#"{"totalEntries":42,"uniqueParticipants":17}"#).unwrap();
        assert_eq!(stats.total_entries, 42);
        assert_eq!(stats.unique_participants, 17);
    }
}
