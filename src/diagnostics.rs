//! Warning and trace events, and a sink forwarding them to [`log`].

use core::fmt;

use crate::{marker::MarkerCode, resync::RecoveryAction};

/// A recoverable problem with the compressed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// A marker other than the expected restart marker was found.
    MustResync { marker: MarkerCode, desired: u8 },
    /// Bytes were discarded while scanning for a marker.
    ExtraneousData { discarded: usize, marker: MarkerCode },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MustResync { marker, desired } => {
                write!(f, "Corrupt JPEG data: found marker {marker} instead of RST{desired}")
            }
            Self::ExtraneousData { discarded, marker } => write!(
                f,
                "Corrupt JPEG data: {discarded} extraneous bytes before marker {marker}"
            ),
        }
    }
}

/// A step taken while reading markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    /// The resynchronization engine chose an action for a marker.
    RecoveryAction {
        marker: MarkerCode,
        action: RecoveryAction,
    },
    /// The expected restart marker was read.
    Restart { index: u8 },
    /// A variable-length marker segment was skipped.
    SkipSegment { marker: MarkerCode, length: u16 },
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecoveryAction { marker, action } => {
                write!(f, "At marker {marker}, recovery action {}", action.code())
            }
            Self::Restart { index } => write!(f, "RST{index}"),
            Self::SkipSegment { marker, length } => {
                write!(f, "Miscellaneous marker {marker}, length {length}")
            }
        }
    }
}

/// Receiver of warning and trace events.
///
/// Implementations must not fail or block.
pub trait Diagnostics {
    /// Receive a warning.
    fn warn(&mut self, warning: Warning);
    /// Receive a trace event with its verbosity level (higher is chattier).
    fn trace(&mut self, level: u8, event: Trace);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn warn(&mut self, warning: Warning) {
        (**self).warn(warning)
    }

    fn trace(&mut self, level: u8, event: Trace) {
        (**self).trace(level, event)
    }
}

/// Forwards warnings to `log::warn!` and trace events to `log::trace!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&mut self, warning: Warning) {
        log::warn!("{warning}");
    }

    fn trace(&mut self, level: u8, event: Trace) {
        log::trace!("[{level}] {event}");
    }
}
