mod category;
mod profile;
mod transaction;

pub use category::{Category, CategoryChanges};
pub use profile::Profile;
pub use transaction::{Transaction, TransactionChanges};

use kernel::audit::AuditEnvelope;
use kernel::id::UserId;

/// A record with an owning user and an audit envelope
pub trait Owned {
    fn owner(&self) -> UserId;

    fn audit(&self) -> &AuditEnvelope;

    /// Owner and creator may read, change and delete the record
    fn is_accessible_by(&self, user: UserId) -> bool {
        self.owner() == user || self.audit().created_by == user
    }
}
