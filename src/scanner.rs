//! Marker scanning over a cursor.

use thiserror::Error;

use crate::{
    cursor::{Cursor, Suspended},
    diagnostics::{Diagnostics, LogDiagnostics, Trace, Warning},
    marker::{FILL, MarkerCode},
    resync::{MarkerScanner, RecoveryAction, resync_to_restart},
    source::{SkipError, Source},
};

/// Errors occurring while reading markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MarkerError {
    /// More input is required.
    #[error(transparent)]
    Suspended(#[from] Suspended),
    /// The data does not begin with a start-of-image marker.
    #[error("Not a JPEG file: starts with 0x{0:02x} 0x{1:02x}.")]
    NoStartOfImage(u8, u8),
    /// The source suspended while skipping a marker segment.
    #[error(transparent)]
    Skip(#[from] SkipError),
}

/// A cursor paired with the marker state of a decoder.
///
/// Holds the unread marker (found in the stream but not yet processed) and the
/// index of the next expected restart marker.
#[derive(Debug)]
pub struct Markers<S, D = LogDiagnostics> {
    cursor: Cursor<S>,
    diagnostics: D,
    unread: Option<MarkerCode>,
    next_restart: u8,
    // Scan state, kept across suspension.
    discarded: usize,
    after_fill: bool,
}

impl<S: Source> Markers<S> {
    /// Initialize a source, reporting diagnostics through `log`.
    pub fn new(source: S) -> Self {
        Self::with_diagnostics(source, LogDiagnostics)
    }
}

impl<S: Source, D: Diagnostics> Markers<S, D> {
    /// Initialize a source, reporting diagnostics to a custom sink.
    pub fn with_diagnostics(source: S, diagnostics: D) -> Self {
        Self {
            cursor: Cursor::new(source),
            diagnostics,
            unread: None,
            next_restart: 0,
            discarded: 0,
            after_fill: false,
        }
    }

    /// Read the start-of-image marker which must begin the data.
    ///
    /// The marker is consumed and not left unread.
    pub fn first_marker(&mut self) -> Result<(), MarkerError> {
        let [c, c2] = self.cursor.read_u16_be()?.to_be_bytes();

        if c != FILL || c2 != MarkerCode::SOI.0 {
            Err(MarkerError::NoStartOfImage(c, c2))?;
        }

        Ok(())
    }

    /// Return the unread marker, scanning for the next one if none is pending.
    pub fn read_marker(&mut self) -> Result<MarkerCode, Suspended> {
        match self.unread {
            Some(marker) => Ok(marker),
            None => self.scan(),
        }
    }

    /// Skip the length-prefixed segment of the unread marker, then forget it.
    pub fn skip_variable(&mut self) -> Result<(), MarkerError> {
        let length = self.cursor.read_u16_be()?;
        let marker = self.unread.take().unwrap_or_default();

        self.diagnostics
            .trace(1, Trace::SkipSegment { marker, length });

        self.cursor.skip(usize::from(length.saturating_sub(2)))?;
        Ok(())
    }

    /// Read the restart marker expected at the end of a restart interval.
    ///
    /// If a different marker is found, the stream is resynchronized and the
    /// action taken is returned. Either way, the expected index advances.
    pub fn read_restart_marker(&mut self) -> Result<Option<RecoveryAction>, Suspended> {
        let marker = self.read_marker()?;
        let desired = self.next_restart;

        let action = if marker == MarkerCode::restart(desired) {
            self.diagnostics.trace(3, Trace::Restart { index: desired });
            self.unread = None;
            None
        } else {
            Some(resync_to_restart(self, desired)?)
        };

        self.next_restart = (desired + 1) & 7;
        Ok(action)
    }

    /// Expect `RST0` next, as at the start of a scan.
    pub fn reset_restart(&mut self) {
        self.next_restart = 0;
    }

    /// Index of the next expected restart marker.
    pub fn next_restart(&self) -> u8 {
        self.next_restart
    }

    pub fn cursor(&self) -> &Cursor<S> {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor<S> {
        &mut self.cursor
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Terminate the source after decoding has completed.
    pub fn finish(self) -> (S, D) {
        (self.cursor.finish(), self.diagnostics)
    }

    /// Scan to the next `FILL`-prefixed marker, skipping stuffed zero bytes.
    fn scan(&mut self) -> Result<MarkerCode, Suspended> {
        loop {
            if !self.after_fill {
                if self.cursor.read_u8()? != FILL {
                    self.discarded += 1;
                    continue;
                }
                self.after_fill = true;
            }

            match self.cursor.read_u8()? {
                FILL => {}
                0x00 => {
                    self.after_fill = false;
                    self.discarded += 2;
                }
                code => {
                    self.after_fill = false;
                    let marker = MarkerCode(code);

                    if self.discarded != 0 {
                        let discarded = core::mem::take(&mut self.discarded);
                        self.diagnostics
                            .warn(Warning::ExtraneousData { discarded, marker });
                    }

                    self.unread = Some(marker);
                    return Ok(marker);
                }
            }
        }
    }
}

impl<S: Source, D: Diagnostics> MarkerScanner for Markers<S, D> {
    fn unread_marker(&self) -> Option<MarkerCode> {
        self.unread
    }

    fn discard_marker(&mut self) {
        self.unread = None;
    }

    fn next_marker(&mut self) -> Result<(), Suspended> {
        self.scan().map(|_| ())
    }
}

impl<S, D: Diagnostics> Diagnostics for Markers<S, D> {
    fn warn(&mut self, warning: Warning) {
        self.diagnostics.warn(warning)
    }

    fn trace(&mut self, level: u8, event: Trace) {
        self.diagnostics.trace(level, event)
    }
}
