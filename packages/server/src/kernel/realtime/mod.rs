//! Database change notifications for live dashboard refresh.
//!
//! Row triggers emit `pg_notify('table_changes', ...)`; [`RealtimeHub::listen`]
//! forwards those into a broadcast channel, and each subscription debounces
//! matching changes into a single refresh callback.

pub mod change;
pub mod debounce;
pub mod hub;

pub use change::{ChangeFilter, ChangeOp, TableChange, WatchedTable};
pub use hub::{RealtimeHub, RealtimeSubscription, NOTIFY_CHANNEL};
