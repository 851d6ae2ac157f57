//! Process-wide diagnostics toggle for the classifier's file path.
//!
//! Off by default: unreadable files and undecodable lines are an expected,
//! silent "no information" case. Turn it on to see what got skipped.

use std::sync::atomic::{AtomicBool, Ordering};

static CLASSIFY_DEBUG: AtomicBool = AtomicBool::new(false);

pub fn set_classify_debug(enabled: bool) {
    CLASSIFY_DEBUG.store(enabled, Ordering::Relaxed);
}

pub fn classify_debug_enabled() -> bool {
    CLASSIFY_DEBUG.load(Ordering::Relaxed)
}
