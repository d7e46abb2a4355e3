//! Push-fed source for incremental decoding.

use alloc::{collections::VecDeque, vec::Vec};

use super::{FAKE_EOI, Source};
use crate::cursor::Window;

/// A source the application pushes chunks into as they arrive.
///
/// Refills suspend while no chunk is queued, until [`FeedSource::finish_input`]
/// declares the end of data; from then on an empty queue yields a fake
/// end-of-image marker.
///
/// ```
/// let mut markers = Markers::new(FeedSource::new());
/// markers.cursor_mut().source_mut().feed(&[0xFF]);
/// assert!(markers.read_marker().is_err()); // Suspended.
///
/// markers.cursor_mut().source_mut().feed(&[0xD8]);
/// assert_eq!(markers.read_marker().unwrap(), MarkerCode::SOI);
/// ```
#[derive(Debug, Default)]
pub struct FeedSource {
    queue: VecDeque<Vec<u8>>,
    finished: bool,
    fills: usize,
    suspensions: usize,
}

impl FeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chunk of data. Empty chunks are ignored.
    pub fn feed(&mut self, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.queue.push_back(bytes.to_vec());
        }
    }

    /// Declare that no more data will be fed.
    pub fn finish_input(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of bytes queued but not yet loaded.
    pub fn queued(&self) -> usize {
        self.queue.iter().map(Vec::len).sum()
    }

    /// Number of refills requested so far.
    pub fn fills(&self) -> usize {
        self.fills
    }

    /// Number of refills that suspended.
    pub fn suspensions(&self) -> usize {
        self.suspensions
    }
}

impl Source for FeedSource {
    fn init(&mut self, _: &mut Window) {}

    fn fill(&mut self, window: &mut Window) -> bool {
        self.fills += 1;

        match self.queue.pop_front() {
            Some(chunk) => {
                window.replace(chunk);
            }
            None if self.finished => {
                log::warn!("Premature end of JPEG data");
                window.load(&FAKE_EOI);
            }
            None => {
                self.suspensions += 1;
                return false;
            }
        }

        true
    }
}
