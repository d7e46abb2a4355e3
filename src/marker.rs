//! Marker codes and their classification.

use core::fmt;

use either::Either::{self, Left, Right};

/// Byte introducing every marker; runs of it may pad the stream.
pub const FILL: u8 = 0xFF;

/// The code byte following [`FILL`] in a marker.
///
/// Codes fall into three disjoint classes: invalid (below [`Self::SOF0`]), the
/// eight cyclic restart markers, and every other valid marker. The default
/// code, `0x00`, is invalid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MarkerCode(pub u8);

impl MarkerCode {
    /// Temporary private use in arithmetic coding.
    pub const TEM: Self = Self(0x01);
    /// Baseline DCT frame, the lowest structural marker.
    pub const SOF0: Self = Self(0xC0);
    pub const DHT: Self = Self(0xC4);
    pub const RST0: Self = Self(0xD0);
    pub const RST7: Self = Self(0xD7);
    pub const SOI: Self = Self(0xD8);
    pub const EOI: Self = Self(0xD9);
    pub const SOS: Self = Self(0xDA);
    pub const DQT: Self = Self(0xDB);
    pub const DRI: Self = Self(0xDD);
    pub const APP0: Self = Self(0xE0);
    pub const COM: Self = Self(0xFE);

    /// The restart marker with cyclic index `n` (taken modulo 8).
    pub const fn restart(n: u8) -> Self {
        Self(Self::RST0.0 + (n & 7))
    }

    /// Whether the code is a legal marker.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::SOF0.0
    }

    /// The cyclic index of a restart marker.
    pub const fn restart_index(self) -> Option<u8> {
        if self.0 >= Self::RST0.0 && self.0 <= Self::RST7.0 {
            Some(self.0 - Self::RST0.0)
        } else {
            None
        }
    }

    /// Classify the code.
    ///
    /// Returns `None` for an invalid code, the index of a restart marker, or
    /// the code itself for any other valid marker.
    pub fn classify(self) -> Option<Either<u8, Self>> {
        if !self.is_valid() {
            return None;
        }

        Some(self.restart_index().map_or(Right(self), Left))
    }
}

impl From<u8> for MarkerCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Display for MarkerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}
