//! Ownership of domain records.

use crate::id::AccountId;

/// A record with exactly one owning account.
///
/// The owner never changes after creation. For jobs it is the author.
pub trait Owned {
    fn owner(&self) -> AccountId;

    fn is_owned_by(&self, account: AccountId) -> bool {
        self.owner() == account
    }
}
