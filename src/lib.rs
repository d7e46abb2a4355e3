#![no_std]

//! Suspendable buffered input and restart-marker resynchronization for JPEG
//! decoders.
//!
//! A JPEG decoder reads its compressed stream through a [`cursor::Cursor`],
//! which buffers chunks delivered by a pluggable [`source::Source`]. Sources
//! may _suspend_: when no data is available yet, reads return
//! [`cursor::Suspended`] without losing position, and the application retries
//! the same top-level call once more input has arrived.
//!
//! When the entropy decoder finds a marker where a restart marker was expected,
//! [`resync::resync_to_restart`] decides how to realign the stream. It never
//! backtracks, so it works over pipes and sockets as well as files.
//!
//! Most users should begin with [`scanner::Markers`], which pairs a cursor with
//! the marker bookkeeping a decoder needs, and one of the sources in the
//! [`source`] module.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable the [`std::io::Read`]-based source (default).

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod cursor;
pub mod diagnostics;
pub mod marker;
pub mod resync;
pub mod scanner;
pub mod source;

pub use cursor::{Cursor, Suspended, Window};
pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use marker::MarkerCode;
pub use resync::{MarkerScanner, RecoveryAction, resync_to_restart};
pub use scanner::Markers;
pub use source::Source;
