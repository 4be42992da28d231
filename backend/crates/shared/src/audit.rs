//! Audit Envelope
//!
//! Ownership and modification metadata attached to every mutable record.
//! Values are only ever derived from the authenticated principal; the wire
//! field names below are shared by the attribution middleware and the
//! request DTOs that consume them.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// JSON field holding the creator of a record
pub const CREATED_BY_FIELD: &str = "createdBy";

/// JSON field holding the last modifier of a record
pub const UPDATED_BY_FIELD: &str = "updatedBy";

/// JSON field holding the owning user of a record
pub const OWNER_FIELD: &str = "userId";

/// Creator / last-modifier pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEnvelope {
    pub created_by: UserId,
    pub updated_by: UserId,
}

impl AuditEnvelope {
    /// Envelope for a freshly created record
    pub fn created(by: UserId) -> Self {
        Self {
            created_by: by,
            updated_by: by,
        }
    }

    /// Record a modification, leaving the creator untouched
    pub fn touch(&mut self, by: UserId) {
        self.updated_by = by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_sets_both_fields() {
        let user = UserId::new();
        let envelope = AuditEnvelope::created(user);
        assert_eq!(envelope.created_by, user);
        assert_eq!(envelope.updated_by, user);
    }

    #[test]
    fn test_touch_keeps_creator() {
        let creator = UserId::new();
        let editor = UserId::new();
        let mut envelope = AuditEnvelope::created(creator);
        envelope.touch(editor);
        assert_eq!(envelope.created_by, creator);
        assert_eq!(envelope.updated_by, editor);
    }

    #[test]
    fn test_wire_names() {
        let envelope = AuditEnvelope::created(UserId::new());
        let json = serde_json::to_value(envelope).unwrap();
        assert!(json.get(CREATED_BY_FIELD).is_some());
        assert!(json.get(UPDATED_BY_FIELD).is_some());
    }
}
