//! Raster materialization
//!
//! Turns a directory's decoded pixel matrix plus its metadata into an
//! immutable [`Raster`] with a canonical big-endian sample buffer. Elevation
//! directories additionally run through the rectifier collaborator before
//! the buffer is frozen.

use crate::collaborators::ElevationRectifier;
use crate::directory::Directory;
use crate::error::DirectoryError;
use crate::metadata::DirectoryMetadata;
use crate::types::DataType;

/// Mutable typed view over a width*height sample buffer
///
/// Samples are stored big-endian in the buffer's data type; get/set convert
/// through f64 so collaborators do not care about the storage format.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
    data_type: DataType,
}

impl RasterBuffer {
    /// Allocates a zeroed buffer
    pub fn new(width: usize, height: usize, data_type: DataType) -> Self {
        Self {
            data: vec![0; width * height * data_type.size()],
            width,
            height,
            data_type,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Raw big-endian sample bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.data_type.size()
    }

    /// Reads one sample as f64
    pub fn get(&self, x: usize, y: usize) -> f64 {
        let at = self.offset(x, y);
        match self.data_type {
            DataType::Int8 => self.data[at] as i8 as f64,
            DataType::Int16 => {
                i16::from_be_bytes([self.data[at], self.data[at + 1]]) as f64
            }
            DataType::Int32 => i32::from_be_bytes([
                self.data[at],
                self.data[at + 1],
                self.data[at + 2],
                self.data[at + 3],
            ]) as f64,
            DataType::Float32 => f32::from_be_bytes([
                self.data[at],
                self.data[at + 1],
                self.data[at + 2],
                self.data[at + 3],
            ]) as f64,
        }
    }

    /// Writes one sample, converting from f64 to the buffer's data type
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let at = self.offset(x, y);
        match self.data_type {
            DataType::Int8 => {
                self.data[at] = (value as i8) as u8;
            }
            DataType::Int16 => {
                self.data[at..at + 2].copy_from_slice(&(value as i16).to_be_bytes());
            }
            DataType::Int32 => {
                self.data[at..at + 4].copy_from_slice(&(value as i32).to_be_bytes());
            }
            DataType::Float32 => {
                self.data[at..at + 4].copy_from_slice(&(value as f32).to_be_bytes());
            }
        }
    }
}

/// An immutable, georeferenced raster materialized from one directory
#[derive(Debug, Clone)]
pub struct Raster {
    metadata: DirectoryMetadata,
    buffer: RasterBuffer,
}

impl Raster {
    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    pub fn data_type(&self) -> DataType {
        self.buffer.data_type()
    }

    /// Metadata computed for the source directory
    pub fn metadata(&self) -> &DirectoryMetadata {
        &self.metadata
    }

    /// Canonical big-endian sample bytes
    pub fn data(&self) -> &[u8] {
        self.buffer.data()
    }

    /// Reads one sample as f64
    pub fn value_at(&self, x: usize, y: usize) -> f64 {
        self.buffer.get(x, y)
    }
}

/// Materializes one directory into a raster
///
/// Only elevation directories are supported; channel 0 of the pixel matrix
/// is taken and any additional channels are dropped by design. The call is
/// idempotent per directory: nothing is cached and repeating it yields a
/// structurally equal raster.
pub fn materialize(
    directory: &Directory,
    metadata: &DirectoryMetadata,
    rectifier: &dyn ElevationRectifier,
) -> Result<Raster, DirectoryError> {
    if !metadata.pixel_format.is_elevation() {
        return Err(DirectoryError::UnsupportedPixelFormat(format!(
            "image raster materialization is not implemented ({:?})",
            metadata.pixel_format
        )));
    }

    let mut buffer = RasterBuffer::new(metadata.width, metadata.height, metadata.data_type);
    for y in 0..metadata.height {
        for x in 0..metadata.width {
            buffer.set(x, y, directory.pixels.channel0(x, y));
        }
    }

    rectifier.rectify(&mut buffer, metadata);

    Ok(Raster {
        metadata: metadata.clone(),
        buffer,
    })
}
