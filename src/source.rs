//! Data sources delivering compressed bytes in chunks.
//!
//! A [`Source`] loads chunks into the [`Window`] owned by a
//! [`Cursor`](crate::cursor::Cursor). Three implementations are provided:
//!
//! - [`SliceSource`] for data already in memory.
//! - [`FeedSource`] for incremental decoding, where the application pushes
//!   chunks as they arrive and reads suspend in between.
//! - [`ReaderSource`] for any [`std::io::Read`]. _Requires Cargo feature
//!   `std`._
//!
//! All three mark the end of data by delivering a fake end-of-image marker, so
//! a decoder reading past the end of a truncated file terminates.

use thiserror::Error;

use crate::{cursor::Window, marker::{FILL, MarkerCode}};

pub mod feed;
#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

pub use feed::FeedSource;
#[cfg(feature = "std")]
pub use reader::{ReaderSource, SourceError};
pub use slice::SliceSource;

/// Chunk inserted when a source runs out of data.
pub(crate) const FAKE_EOI: [u8; 2] = [FILL, MarkerCode::EOI.0];

/// An error skipping over input data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipError {
    /// The source suspended while refilling mid-skip.
    #[error("Source suspended with {outstanding} bytes left to skip.")]
    Suspended { outstanding: usize },
}

/// A supplier of compressed data.
pub trait Source {
    /// Prepare the source, optionally loading a first chunk into the window.
    ///
    /// Called exactly once, before any read.
    fn init(&mut self, window: &mut Window);

    /// Load the next chunk into the window, replacing it entirely.
    ///
    /// Returns `false` to suspend: no data is available yet, and the caller
    /// will retry its whole operation later. A source returning `true` must
    /// have loaded at least one byte.
    fn fill(&mut self, window: &mut Window) -> bool;

    /// Discard `n` bytes, starting with those left in the window.
    ///
    /// The default implementation refills repeatedly and assumes [`fill`]
    /// does not suspend; sources able to seek may override it.
    ///
    /// [`fill`]: Source::fill
    fn skip(&mut self, window: &mut Window, mut n: usize) -> Result<(), SkipError> {
        while n > window.remaining() {
            n -= window.remaining();
            window.clear();

            if !self.fill(window) {
                Err(SkipError::Suspended { outstanding: n })?;
            }
        }

        window.consume(n);
        Ok(())
    }

    /// Release resources once all data has been read. Not called when
    /// decoding is abandoned.
    fn term(&mut self) {}
}

impl<S: Source + ?Sized> Source for &mut S {
    fn init(&mut self, window: &mut Window) {
        (**self).init(window)
    }

    fn fill(&mut self, window: &mut Window) -> bool {
        (**self).fill(window)
    }

    fn skip(&mut self, window: &mut Window, n: usize) -> Result<(), SkipError> {
        (**self).skip(window, n)
    }

    fn term(&mut self) {
        (**self).term()
    }
}
