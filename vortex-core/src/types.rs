//! Shared domain types exchanged with the Vortex service.
//!
//! Invitation and JWT payloads themselves are opaque to this crate and travel
//! as `serde_json::Value`; these types only describe the identifying data the
//! gateway validates and forwards.

use serde::{Deserialize, Serialize};

/// The kind of contact a target descriptor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "username")]
    Username,
    #[serde(rename = "phoneNumber")]
    PhoneNumber,
}

impl TargetKind {
    pub const ALLOWED: &'static [&'static str] = &["email", "username", "phoneNumber"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "email" => Some(TargetKind::Email),
            "username" => Some(TargetKind::Username),
            "phoneNumber" => Some(TargetKind::PhoneNumber),
            _ => None,
        }
    }

    /// Like [`TargetKind::parse`] but also accepts the legacy `phone` spelling
    /// still sent by older accept-invitation callers.
    pub fn parse_legacy(raw: &str) -> Option<Self> {
        match raw {
            "phone" => Some(TargetKind::PhoneNumber),
            other => Self::parse(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Email => "email",
            TargetKind::Username => "username",
            TargetKind::PhoneNumber => "phoneNumber",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact-addressed invitation target, e.g. `{type: "email", value: "a@b.com"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTarget {
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub value: String,
}

/// A group an invitation is scoped to, identified by type and id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    #[serde(rename = "type")]
    pub group_type: String,
    pub id: String,
}

/// The richer accept-invitation shape: a user object with at least one
/// contact coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptingUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AcceptingUser {
    /// A user object is addressable only if it carries an email or a phone.
    pub fn has_contact(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }
}

/// Who is accepting a batch of invitations: either a contact target (legacy
/// payload shape) or a user object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acceptor {
    Target(ContactTarget),
    User(AcceptingUser),
}

/// Outcome reported when resyncing an internally-tracked invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Accepted,
    Declined,
}

impl SyncAction {
    pub const ALLOWED: &'static [&'static str] = &["accepted", "declined"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "accepted" => Some(SyncAction::Accepted),
            "declined" => Some(SyncAction::Declined),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Accepted => "accepted",
            SyncAction::Declined => "declined",
        }
    }
}

/// Resync record forwarded to Vortex when the host application has resolved
/// an invitation internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalInvitationSync {
    pub creator_id: String,
    pub target_value: String,
    pub action: SyncAction,
    pub component_id: String,
}

/// The authenticated principal resolved from an inbound request by the
/// host-supplied identity hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admin_scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_email_domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupRef>,
}

/// Claims forwarded to the Vortex JWT issuer. Optional fields are sent only
/// when present and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtRequest {
    pub user_id: String,
    pub user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admin_scopes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_email_domains: Vec<String>,
}
