//! repo::security
//!
//! Stack-scoped suspension of write restrictions.
//!
//! # Architecture
//!
//! Provisioning runs engine-internal writes on behalf of an already
//! authorized user action, so write restrictions on individual nodes are
//! suspended for the duration of those writes. The suspension is strictly
//! scoped to the current call stack: it is a thread-local depth counter
//! managed by an RAII guard, never a global toggle, so a concurrently
//! running operation on another thread observes restrictions unchanged.
//!
//! # Invariants
//!
//! - Suspension is re-entrant (guards nest)
//! - Suspension ends when the guard drops, even on panic
//! - Suspension never crosses thread boundaries
//!
//! # Example
//!
//! ```
//! use sitewright::repo::security::{self, PrivilegeSuspension};
//!
//! assert!(!security::is_suspended());
//! {
//!     let _guard = PrivilegeSuspension::new();
//!     assert!(security::is_suspended());
//! }
//! assert!(!security::is_suspended());
//! ```

use std::cell::Cell;

thread_local! {
    static SUSPENSION_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// True if write restrictions are currently suspended on this thread.
pub fn is_suspended() -> bool {
    SUSPENSION_DEPTH.with(|depth| depth.get() > 0)
}

/// RAII guard suspending write restrictions on the current thread.
///
/// Restrictions are restored when the guard is dropped.
#[derive(Debug)]
pub struct PrivilegeSuspension(());

impl PrivilegeSuspension {
    /// Begin a suspension scope.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        SUSPENSION_DEPTH.with(|depth| depth.set(depth.get() + 1));
        PrivilegeSuspension(())
    }
}

impl Drop for PrivilegeSuspension {
    fn drop(&mut self) {
        SUSPENSION_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_nest() {
        assert!(!is_suspended());
        let outer = PrivilegeSuspension::new();
        {
            let _inner = PrivilegeSuspension::new();
            assert!(is_suspended());
        }
        assert!(is_suspended());
        drop(outer);
        assert!(!is_suspended());
    }

    #[test]
    fn suspension_is_thread_local() {
        let _guard = PrivilegeSuspension::new();
        let handle = std::thread::spawn(|| is_suspended());
        assert!(!handle.join().unwrap());
    }
}
