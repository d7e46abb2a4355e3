//! Reader-based source implementation.
//!
//! _Requires Cargo feature `std`._

use std::io::{ErrorKind, Read};

use thiserror::Error;

use super::{FAKE_EOI, Source};
use crate::cursor::Window;

/// Default number of bytes requested from the reader per refill.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Errors recorded while reading from a reader.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The reader produced no data at all.
    #[error("Empty input file.")]
    Empty,
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A source over any reader: files, pipes, or sockets.
///
/// A reader returning [`ErrorKind::WouldBlock`] suspends the read, which suits
/// non-blocking sockets. End of data, an empty reader, and other I/O errors all
/// deliver a fake end-of-image marker so decoding terminates; the latter two
/// are recorded and can be retrieved with [`ReaderSource::take_error`].
///
/// _Requires Cargo feature `std`._
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    capacity: usize,
    start_of_file: bool,
    error: Option<SourceError>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_CAPACITY)
    }

    /// Request at most `capacity` bytes from the reader per refill.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            capacity: capacity.max(1),
            start_of_file: true,
            error: None,
        }
    }

    /// Take the error that ended reading, if any.
    pub fn take_error(&mut self) -> Option<SourceError> {
        self.error.take()
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Source for ReaderSource<R> {
    fn init(&mut self, _: &mut Window) {
        self.start_of_file = true;
    }

    fn fill(&mut self, window: &mut Window) -> bool {
        let reader = &mut self.reader;

        let result = window.load_with(self.capacity, |buf| loop {
            match reader.read(buf) {
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                result => break result,
            }
        });

        match result {
            Ok(0) => {
                if self.start_of_file {
                    self.error = Some(SourceError::Empty);
                } else {
                    log::warn!("Premature end of JPEG file");
                }
                window.load(&FAKE_EOI);
            }
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::WouldBlock => return false,
            Err(err) => {
                log::warn!("Reading JPEG data failed: {err}");
                self.error = Some(err.into());
                window.load(&FAKE_EOI);
            }
        }

        self.start_of_file = false;
        true
    }
}
