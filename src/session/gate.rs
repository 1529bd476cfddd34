//! Protection gate
//!
//! The core only stores the `is_protected` flag. Whether the user may open or
//! unprotect an item is decided by whoever implements `ProtectionGate` (a
//! biometric prompt, a password, a terminal confirmation).

use crate::model::FileItem;

pub trait ProtectionGate: Send + Sync {
    /// Ask for access to a protected item
    fn authenticate(&self, item: &FileItem) -> bool;
}

/// Gate that grants every request
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl ProtectionGate for AllowAll {
    fn authenticate(&self, _item: &FileItem) -> bool {
        true
    }
}

/// Gate that refuses every request
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl ProtectionGate for DenyAll {
    fn authenticate(&self, item: &FileItem) -> bool {
        tracing::debug!(id = %item.id, "protection gate refused access");
        false
    }
}
