//! Directory contract handed over by the tag/byte-stream reader
//!
//! terrakit does not parse the TIFF byte stream itself. A
//! [`TagDirectoryProvider`] implementation (typically wrapping a low-level
//! TIFF library) yields one [`Directory`] per image file directory, carrying
//! the typed tag values and the already-decoded row-major pixel matrix.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::types::ByteOrder;

/// A raw tag value as decoded by the provider
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// SHORT (16-bit unsigned) values
    Shorts(Vec<u16>),
    /// LONG (32-bit unsigned) values
    Longs(Vec<u32>),
    /// DOUBLE values
    Doubles(Vec<f64>),
    /// ASCII string (NUL terminators stripped)
    Ascii(String),
}

/// Row-major pixel matrix decoded by the provider
///
/// Samples are stored interleaved: all channels of pixel (0, 0), then all
/// channels of pixel (1, 0), and so on row by row.
#[derive(Debug, Clone)]
pub struct PixelMatrix {
    width: usize,
    height: usize,
    channels: usize,
    samples: Vec<f64>,
}

impl PixelMatrix {
    /// Creates a pixel matrix; `samples` length must be width * height * channels
    pub fn new(width: usize, height: usize, channels: usize, samples: Vec<f64>) -> Self {
        assert_eq!(samples.len(), width * height * channels, "sample count mismatch");
        Self { width, height, channels, samples }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns one sample
    pub fn sample(&self, x: usize, y: usize, channel: usize) -> f64 {
        self.samples[(y * self.width + x) * self.channels + channel]
    }

    /// Returns the first channel of a pixel
    pub fn channel0(&self, x: usize, y: usize) -> f64 {
        self.sample(x, y, 0)
    }
}

/// One image file directory as decoded by the provider, read-only
#[derive(Debug, Clone)]
pub struct Directory {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Byte order of the source file
    pub byte_order: ByteOrder,
    /// Photometric interpretation tag value
    pub photometric: u16,
    /// Samples per pixel
    pub samples_per_pixel: u16,
    /// Sample format, one entry per sample
    pub sample_format: Vec<u16>,
    /// Bits per sample, one entry per sample
    pub bits_per_sample: Vec<u16>,
    /// Remaining raw tag values keyed by tag id
    pub tags: HashMap<u16, TagValue>,
    /// Decoded pixel data
    pub pixels: PixelMatrix,
}

impl Directory {
    /// Looks up a tag as a list of doubles, coercing integer tag types
    pub fn doubles_tag(&self, tag: u16) -> Option<Vec<f64>> {
        match self.tags.get(&tag)? {
            TagValue::Doubles(v) => Some(v.clone()),
            TagValue::Shorts(v) => Some(v.iter().map(|&s| s as f64).collect()),
            TagValue::Longs(v) => Some(v.iter().map(|&l| l as f64).collect()),
            TagValue::Ascii(_) => None,
        }
    }

    /// Looks up a tag as a list of 16-bit values
    pub fn shorts_tag(&self, tag: u16) -> Option<&[u16]> {
        match self.tags.get(&tag)? {
            TagValue::Shorts(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up a tag as an ASCII string
    pub fn ascii_tag(&self, tag: u16) -> Option<&str> {
        match self.tags.get(&tag)? {
            TagValue::Ascii(s) => Some(s),
            _ => None,
        }
    }
}

/// External tag/byte-stream reader contract
///
/// Implementations own all byte-level concerns: endianness, strip and tile
/// layouts, compression. terrakit only consumes the decoded result.
pub trait TagDirectoryProvider {
    /// Reads the ordered directory sequence of a file
    fn read_directories(&self, path: &Path) -> Result<Vec<Directory>>;
}
