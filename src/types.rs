//! Core data types for terrakit

use serde::Serialize;

/// Numeric format of a single raster sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataType {
    /// Signed 8-bit integer
    Int8,
    /// Signed 16-bit integer
    Int16,
    /// Signed 32-bit integer
    Int32,
    /// 32-bit IEEE floating point
    Float32,
}

impl DataType {
    /// Returns the size in bytes for this data type
    pub fn size(&self) -> usize {
        match self {
            DataType::Int8 => 1,
            DataType::Int16 => 2,
            DataType::Int32 | DataType::Float32 => 4,
        }
    }

    /// Returns the name of this data type
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int8 => "Int8",
            DataType::Int16 => "Int16",
            DataType::Int32 => "Int32",
            DataType::Float32 => "Float32",
        }
    }
}

/// Color interpretation of an image directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorFormat {
    Grayscale,
    Color,
}

/// What the samples of a directory represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PixelFormat {
    /// Single-channel elevation samples
    Elevation,
    /// Visual image data
    Image(ColorFormat),
}

impl PixelFormat {
    pub fn is_elevation(&self) -> bool {
        matches!(self, PixelFormat::Elevation)
    }

    /// Returns the color format for image directories
    pub fn color_format(&self) -> Option<ColorFormat> {
        match self {
            PixelFormat::Image(cf) => Some(*cf),
            PixelFormat::Elevation => None,
        }
    }
}

/// Byte order (endianness) of binary sample data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ByteOrder {
    /// Little-endian byte order (least significant byte first)
    LittleEndian,
    /// Big-endian byte order (most significant byte first)
    BigEndian,
}

/// UTM hemisphere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn name(&self) -> &'static str {
        match self {
            Hemisphere::North => "North",
            Hemisphere::South => "South",
        }
    }
}

/// Unit of elevation samples, from the VerticalUnits geo-key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElevationUnit {
    Meter,
    Foot,
}

/// Pixel registration convention, from the RasterType geo-key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RasterPixel {
    /// A pixel covers the area between grid lines
    IsArea,
    /// A pixel sits on the grid intersection
    IsPoint,
}

/// A geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sector {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl Sector {
    /// Creates a sector from degree bounds
    pub fn from_degrees(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self { south, north, west, east }
    }

    /// Latitude span in degrees
    pub fn delta_lat(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude span in degrees
    pub fn delta_lon(&self) -> f64 {
        self.east - self.west
    }
}
