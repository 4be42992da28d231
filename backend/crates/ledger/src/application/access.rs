//! Ownership rules shared by the ledger services
//!
//! - list routes: the requested user must be the principal
//! - single records: the principal must own or have created the record
//! - creates: the owner must be the principal

use kernel::audit::AuditEnvelope;
use kernel::id::UserId;

use crate::domain::entity::Owned;
use crate::error::{LedgerError, LedgerResult};

pub fn ensure_self(principal: UserId, requested: UserId) -> LedgerResult<()> {
    if principal != requested {
        return Err(LedgerError::Forbidden(
            "Cannot access records of another user".into(),
        ));
    }
    Ok(())
}

pub fn ensure_access<T: Owned>(record: &T, principal: UserId) -> LedgerResult<()> {
    if !record.is_accessible_by(principal) {
        return Err(LedgerError::Forbidden(
            "Not allowed to access this record".into(),
        ));
    }
    Ok(())
}

/// Audit fields as they arrive in a request body
///
/// Normally stamped by the audit attributor. When attribution was skipped
/// the fields may be absent (the principal is used) but never different
/// from the principal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attribution {
    pub owner: Option<UserId>,
    pub created_by: Option<UserId>,
    pub updated_by: Option<UserId>,
}

impl Attribution {
    /// Owner and envelope for a record created by `principal`
    pub fn for_create(self, principal: UserId) -> LedgerResult<(UserId, AuditEnvelope)> {
        self.check_stamped(principal)?;
        let owner = self.owner.unwrap_or(principal);
        if owner != principal {
            return Err(LedgerError::Forbidden(
                "Cannot create records for another user".into(),
            ));
        }
        Ok((owner, AuditEnvelope::created(principal)))
    }

    /// Modifier for an update by `principal`
    pub fn for_update(self, principal: UserId) -> LedgerResult<UserId> {
        self.check_stamped(principal)?;
        Ok(principal)
    }

    fn check_stamped(&self, principal: UserId) -> LedgerResult<()> {
        let mismatch = [self.created_by, self.updated_by]
            .into_iter()
            .flatten()
            .any(|stamped| stamped != principal);
        if mismatch {
            return Err(LedgerError::Forbidden(
                "Audit fields do not match the authenticated user".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults_owner_to_principal() {
        let me = UserId::new();
        let (owner, audit) = Attribution::default().for_create(me).unwrap();
        assert_eq!(owner, me);
        assert_eq!(audit, AuditEnvelope::created(me));
    }

    #[test]
    fn test_create_for_someone_else_is_forbidden() {
        let me = UserId::new();
        let attribution = Attribution {
            owner: Some(UserId::new()),
            created_by: Some(me),
            updated_by: Some(me),
        };
        assert!(matches!(
            attribution.for_create(me),
            Err(LedgerError::Forbidden(_))
        ));
    }

    #[test]
    fn test_forged_audit_fields_are_rejected() {
        let me = UserId::new();
        let forged = Attribution {
            updated_by: Some(UserId::new()),
            ..Default::default()
        };
        assert!(forged.for_update(me).is_err());
        assert_eq!(
            Attribution {
                updated_by: Some(me),
                ..Default::default()
            }
            .for_update(me)
            .unwrap(),
            me
        );
    }

    #[test]
    fn test_ensure_self() {
        let me = UserId::new();
        assert!(ensure_self(me, me).is_ok());
        assert!(ensure_self(me, UserId::new()).is_err());
    }
}
