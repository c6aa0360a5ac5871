//! Viewer Types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform role of the person making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    /// Not signed in.
    #[default]
    Guest,
    /// Regular account.
    User,
    /// Content moderator.
    Moderator,
    /// Platform administrator.
    Admin,
}

impl ViewerRole {
    /// Moderators and admins.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }

    /// Returns the lowercase role name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

/// Privilege context for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Viewer {
    /// Account ID; `None` for guests.
    pub id: Option<Uuid>,
    /// Platform role.
    pub role: ViewerRole,
    /// Whether the account has an active premium subscription.
    pub is_premium: bool,
}

impl Viewer {
    /// An anonymous viewer.
    #[must_use]
    pub const fn guest() -> Self {
        Self {
            id: None,
            role: ViewerRole::Guest,
            is_premium: false,
        }
    }

    /// A signed-in viewer.
    #[must_use]
    pub const fn authenticated(id: Uuid, role: ViewerRole, is_premium: bool) -> Self {
        Self {
            id: Some(id),
            role,
            is_premium,
        }
    }

    /// Staff and premium viewers bypass every age and quota rule.
    #[must_use]
    pub const fn has_unrestricted_access(&self) -> bool {
        self.role.is_staff() || self.is_premium
    }

    /// Returns true if this viewer is not signed in.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self.role, ViewerRole::Guest)
    }
}
