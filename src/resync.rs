//! Recovery from an unexpected marker at a restart boundary.
//!
//! When a restart interval is in effect, the decoder expects restart markers
//! `RST0` to `RST7` in cyclic order. If it finds anything else, it calls
//! [`resync_to_restart`] to position the stream at the next data segment.
//!
//! The stream cannot be backed up, which leaves three actions:
//!
//! 1. [`RecoveryAction::Discard`] the marker and let the entropy decoder
//!    resume at the next byte.
//! 2. [`RecoveryAction::ScanForward`] to the next marker, discarding the data
//!    in between, and decide again.
//! 3. [`RecoveryAction::Defer`] by leaving the marker unread. The entropy
//!    decoder then processes an empty segment and the marker is reprocessed.
//!
//! Scanning forward suits a marker behind the expected one; deferring suits a
//! marker up to two counts ahead (the expected one was probably corrupted) and
//! any valid non-restart marker, which keeps a scan from being overrun. Codes
//! that are not legal markers are bogus data and scanned past. A restart
//! marker further away is too likely erroneous and is discarded.

use core::fmt;

use either::Either::{Left, Right};

use crate::{
    cursor::Suspended,
    diagnostics::{Diagnostics, Trace, Warning},
    marker::MarkerCode,
};

/// An action taken to realign the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryAction {
    /// Forget the marker; decoding resumes at the next byte.
    Discard,
    /// Skip to the next marker and decide again.
    ScanForward,
    /// Leave the marker unread for reprocessing.
    Defer,
}

impl RecoveryAction {
    /// Choose the action for a marker found where restart marker `desired`
    /// was expected.
    pub fn decide(marker: MarkerCode, desired: u8) -> Self {
        match marker.classify() {
            None => Self::ScanForward,
            Some(Right(_)) => Self::Defer,
            Some(Left(index)) => match index.wrapping_sub(desired) & 7 {
                // One of the next two expected restarts.
                1 | 2 => Self::Defer,
                // A prior restart, so advance.
                6 | 7 => Self::ScanForward,
                // The desired restart, or too far away.
                _ => Self::Discard,
            },
        }
    }

    /// Numeric code reported in trace events.
    pub const fn code(self) -> u8 {
        match self {
            Self::Discard => 1,
            Self::ScanForward => 2,
            Self::Defer => 3,
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discard => "discard",
            Self::ScanForward => "scan forward",
            Self::Defer => "defer",
        };
        f.write_str(name)
    }
}

/// Access to the pending marker of a decoder, and to the stream beyond it.
pub trait MarkerScanner {
    /// The marker read from the stream but not yet processed, if any.
    fn unread_marker(&self) -> Option<MarkerCode>;

    /// Forget the unread marker.
    fn discard_marker(&mut self);

    /// Scan forward over non-marker bytes, making the next marker found the
    /// unread marker.
    fn next_marker(&mut self) -> Result<(), Suspended>;
}

/// Realign the stream after the unread marker was found in place of restart
/// marker `desired`.
///
/// A missing unread marker is treated as an invalid code. Always warns once,
/// and traces each decision. On suspension, retry with the same arguments
/// once more data is available.
pub fn resync_to_restart<C>(ctx: &mut C, desired: u8) -> Result<RecoveryAction, Suspended>
where
    C: MarkerScanner + Diagnostics + ?Sized,
{
    let marker = ctx.unread_marker().unwrap_or_default();
    ctx.warn(Warning::MustResync { marker, desired });

    loop {
        let marker = ctx.unread_marker().unwrap_or_default();
        let action = RecoveryAction::decide(marker, desired);

        ctx.trace(4, Trace::RecoveryAction { marker, action });

        match action {
            RecoveryAction::Discard => {
                ctx.discard_marker();
                return Ok(action);
            }
            RecoveryAction::Defer => return Ok(action),
            RecoveryAction::ScanForward => ctx.next_marker()?,
        }
    }
}
