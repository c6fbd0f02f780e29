//! Duration of the last frame written, in nanoseconds.
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_FRAME_NS: AtomicU64 = AtomicU64::new(0);

pub fn record_last_frame_ns(ns: u64) {
    LAST_FRAME_NS.store(ns, Ordering::Relaxed);
}

pub fn last_frame_ns() -> u64 {
    LAST_FRAME_NS.load(Ordering::Relaxed)
}
