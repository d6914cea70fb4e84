use core::sync::atomic::{AtomicBool, Ordering};

/// Single-bit hand-off between a timer fire (interrupt context) and the
/// cooperative loop (thread context).
///
/// Single writer per direction: only timer context sets, only the loop
/// takes. Multiple sets between two loop iterations coalesce into one
/// dispatch, which is fine because every dispatched action is an
/// idempotent poll, not a discrete event. A set that lands right after
/// `take` only means "run again" and is picked up next iteration.
pub struct PendingFlag(AtomicBool);

impl PendingFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Mark the flag pending. Safe to call from interrupt context.
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Consume the flag. Returns `true` exactly once per set-since-last-take.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for PendingFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed flag set of one node, one flag per distinct timed action.
///
/// Lives in a `static` in the firmware binary so timer slots can hold
/// `&'static` references to the individual flags.
pub struct NodeFlags {
    pub link_poll: PendingFlag,
    pub session_retry: PendingFlag,
    pub sample: PendingFlag,
}

impl NodeFlags {
    pub const fn new() -> Self {
        Self {
            link_poll: PendingFlag::new(),
            session_retry: PendingFlag::new(),
            sample: PendingFlag::new(),
        }
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::new()
    }
}
