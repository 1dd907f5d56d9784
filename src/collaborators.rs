//! External collaborator contracts
//!
//! The UTM bounding-box calculation and the elevation void/edge repair are
//! supplied by the caller; terrakit only defines the data contracts and
//! invokes them at the right points of the pipeline.

use crate::metadata::DirectoryMetadata;
use crate::raster::RasterBuffer;
use crate::types::{Hemisphere, Sector};

/// Everything a UTM bounding-box calculator needs about a projected raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmRegion {
    /// EPSG projection code the region was resolved from
    pub projection_code: u32,
    /// UTM zone
    pub zone: u32,
    /// UTM hemisphere
    pub hemisphere: Hemisphere,
    /// Ground size of one pixel along x, in projection units
    pub pixel_size_x: f64,
    /// Ground size of one pixel along y, negative per the world-file convention
    pub pixel_size_y: f64,
    /// Center-registered easting of the upper-left pixel
    pub origin_x: f64,
    /// Center-registered northing of the upper-left pixel
    pub origin_y: f64,
    /// Raster width in pixels
    pub width: usize,
    /// Raster height in pixels
    pub height: usize,
}

/// Computes the geographic bounding box of a UTM-projected raster
pub trait UtmBoundsCalculator {
    /// Returns the sector covering the region, or a failure message
    fn bounding_box(&self, region: &UtmRegion) -> std::result::Result<Sector, String>;
}

/// Repairs known void and edge artifacts in a finished elevation buffer
pub trait ElevationRectifier {
    /// Mutates the buffer in place before the raster is frozen
    fn rectify(&self, buffer: &mut RasterBuffer, metadata: &DirectoryMetadata);
}

/// Identity rectifier, leaves the buffer untouched
#[derive(Debug, Default)]
pub struct NoopRectifier;

impl ElevationRectifier for NoopRectifier {
    fn rectify(&self, _buffer: &mut RasterBuffer, _metadata: &DirectoryMetadata) {}
}
