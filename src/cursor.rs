//! Buffered access to a chunked, possibly suspending byte source.
//!
//! A [`Cursor`] holds the unread portion of the most recently loaded chunk in a
//! [`Window`], and asks its [`Source`] for the next chunk only once the window
//! is exhausted. Reads that cannot be satisfied return [`Suspended`] without
//! moving the logical position, so the same read can be retried after the
//! source has been given more data.

use alloc::vec::Vec;

use thiserror::Error;
use zerocopy::byteorder::{BigEndian, U16};

use crate::source::{SkipError, Source};

/// More input is required to complete the operation.
///
/// Suspension is not a failure: retry the whole operation once the source can
/// deliver more data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("More input is required.")]
pub struct Suspended;

/// The unread portion of the most recently loaded chunk.
///
/// The buffer is owned by the window and replaced wholesale on every load;
/// reads narrow it by advancing an offset.
#[derive(Debug, Default)]
pub struct Window {
    bytes: Vec<u8>,
    offset: usize,
}

impl Window {
    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Whether every loaded byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread bytes.
    pub fn unread(&self) -> &[u8] {
        &self.bytes[self.offset..]
    }

    /// Replace the window with a copy of `chunk`.
    pub fn load(&mut self, chunk: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(chunk);
        self.offset = 0;
    }

    /// Replace the window with an owned chunk, returning the previous buffer.
    pub fn replace(&mut self, chunk: Vec<u8>) -> Vec<u8> {
        self.offset = 0;
        core::mem::replace(&mut self.bytes, chunk)
    }

    /// Replace the window with at most `capacity` bytes written by `f`.
    ///
    /// The closure receives a zeroed buffer and returns the number of bytes it
    /// produced. On error the window is left empty.
    pub fn load_with<E>(
        &mut self,
        capacity: usize,
        f: impl FnOnce(&mut [u8]) -> Result<usize, E>,
    ) -> Result<usize, E> {
        self.bytes.clear();
        self.bytes.resize(capacity, 0);
        self.offset = 0;

        match f(&mut self.bytes) {
            Ok(n) => {
                self.bytes.truncate(n.min(capacity));
                Ok(n)
            }
            Err(err) => {
                self.bytes.clear();
                Err(err)
            }
        }
    }

    /// Mark `n` bytes as consumed, saturating at the end of the window.
    pub fn consume(&mut self, n: usize) {
        self.offset += n.min(self.remaining());
    }

    /// Discard every unread byte.
    pub fn clear(&mut self) {
        self.offset = self.bytes.len();
    }

    fn take_u8(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.offset)?;
        self.offset += 1;
        Some(b)
    }
}

/// A read position over a [`Source`].
///
/// Constructing a cursor initializes its source, so reads before
/// initialization are impossible. Call [`Cursor::finish`] once decoding has
/// completed to let the source release its resources; dropping a cursor skips
/// this step.
#[derive(Debug)]
pub struct Cursor<S> {
    source: S,
    window: Window,
    // A byte read ahead by an interrupted `read_u16_be`, logically still unread.
    held: Option<u8>,
}

impl<S: Source> Cursor<S> {
    /// Initialize a source and establish its first window.
    pub fn new(mut source: S) -> Self {
        let mut window = Window::default();
        source.init(&mut window);

        Self {
            source,
            window,
            held: None,
        }
    }

    /// Number of bytes readable without a refill.
    pub fn remaining(&self) -> usize {
        self.window.remaining() + usize::from(self.held.is_some())
    }

    /// Ensure at least one byte is buffered, refilling once if necessary.
    ///
    /// Returns `false` if the source suspended.
    pub fn make_byte_available(&mut self) -> bool {
        if self.remaining() == 0 {
            self.source.fill(&mut self.window)
        } else {
            true
        }
    }

    /// Read a single byte.
    ///
    /// On suspension the position is unchanged.
    pub fn read_u8(&mut self) -> Result<u8, Suspended> {
        if let Some(b) = self.held.take() {
            return Ok(b);
        }

        if !self.make_byte_available() {
            return Err(Suspended);
        }

        self.window.take_u8().ok_or(Suspended)
    }

    /// Read a big-endian `u16`.
    ///
    /// Either both bytes are consumed, or the call suspends and a retry reads
    /// the same two bytes again.
    pub fn read_u16_be(&mut self) -> Result<u16, Suspended> {
        let first = self.read_u8()?;

        let second = match self.read_u8() {
            Ok(b) => b,
            Err(err) => {
                // The window may have been refilled, so keep the first byte.
                self.held = Some(first);
                return Err(err);
            }
        };

        let value: U16<BigEndian> = zerocopy::transmute!([first, second]);
        Ok(value.get())
    }

    /// Copy buffered bytes into `dest`, returning the number copied.
    ///
    /// Never refills the window, and so never suspends.
    pub fn read_bytes(&mut self, dest: &mut [u8]) -> usize {
        let mut count = 0;

        if let (Some(b), Some(d)) = (self.held, dest.first_mut()) {
            *d = b;
            self.held = None;
            count = 1;
        }

        let unread = self.window.unread();
        let n = unread.len().min(dest.len() - count);
        dest[count..count + n].copy_from_slice(&unread[..n]);
        self.window.consume(n);

        count + n
    }

    /// Advance the position by `n` bytes, refilling as often as necessary.
    ///
    /// Skipping is not granted the right to suspend. If the source suspends
    /// anyway the window is left empty and the bytes still to be discarded are
    /// reported; arranging for them to be dropped is the caller's concern.
    pub fn skip(&mut self, mut n: usize) -> Result<(), SkipError> {
        if n > 0 && self.held.take().is_some() {
            n -= 1;
        }

        self.source.skip(&mut self.window, n)
    }

    /// Terminate the source after decoding has completed, returning it.
    pub fn finish(mut self) -> S {
        self.source.term();
        self.source
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The underlying source, mutably (for example to feed it more data).
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
