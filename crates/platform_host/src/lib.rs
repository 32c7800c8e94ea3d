//! Host-domain contracts shared by the desktop runtime and its adapters.
//!
//! The window-management core never reads wall time directly; it asks an injected [`Clock`] so the
//! overlay-reveal delay, frame throttle, and taskbar debounce stay deterministic under test.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod time;

pub use time::{unix_time_ms_now, Clock, ManualClock, SystemClock};
