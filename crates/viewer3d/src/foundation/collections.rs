//! Specialized collection types

use slotmap::new_key_type;
pub use slotmap::SlotMap;

new_key_type! {
    /// Key identifying a registered load observer
    pub struct ObserverKey;
}

/// Handle-based map for observer registrations with stable keys
pub type ObserverMap<T> = SlotMap<ObserverKey, T>;
