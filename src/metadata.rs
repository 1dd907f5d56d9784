//! Per-directory metadata derivation
//!
//! Classification of the pixel format, scalar metadata extraction and the
//! coordinate-system/sector resolution. One metadata record is derived per
//! directory, consuming the shared [`GeoKeyTable`] plus the directory's own
//! tie-point index, and is immutable once built.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{error, warn};
use serde::Serialize;
use serde_json::{json, Value};

use crate::collaborators::{UtmBoundsCalculator, UtmRegion};
use crate::directory::Directory;
use crate::error::DirectoryError;
use crate::geokeys::{geo_keys, geo_values, GeoKeyTable};
use crate::tags;
use crate::tags::{photometric, sample_formats};
use crate::types::{
    ByteOrder, ColorFormat, DataType, ElevationUnit, Hemisphere, PixelFormat, RasterPixel, Sector,
};

/// Key constants for the generic key/value metadata view
pub mod keys {
    pub const FILE_PATH: &str = "FilePath";
    pub const BYTE_ORDER: &str = "ByteOrder";
    pub const WIDTH: &str = "Width";
    pub const HEIGHT: &str = "Height";
    pub const PIXEL_FORMAT: &str = "PixelFormat";
    pub const DATA_TYPE: &str = "DataType";
    pub const IMAGE_COLOR_FORMAT: &str = "ImageColorFormat";
    pub const MISSING_DATA_SIGNAL: &str = "MissingDataSignal";
    pub const ELEVATION_MIN: &str = "ElevationMin";
    pub const ELEVATION_MAX: &str = "ElevationMax";
    pub const ELEVATION_UNIT: &str = "ElevationUnit";
    pub const RASTER_PIXEL: &str = "RasterPixel";
    pub const COORDINATE_SYSTEM: &str = "CoordinateSystem";
    pub const PROJECTION_EPSG_CODE: &str = "ProjectionEpsgCode";
    pub const PROJECTION_HEMISPHERE: &str = "ProjectionHemisphere";
    pub const PROJECTION_ZONE: &str = "ProjectionZone";
    pub const PIXEL_SIZE_X: &str = "PixelSizeX";
    pub const PIXEL_SIZE_Y: &str = "PixelSizeY";
    pub const ORIGIN_X: &str = "OriginX";
    pub const ORIGIN_Y: &str = "OriginY";
    pub const SECTOR: &str = "Sector";
}

/// Resolved geo-referencing of a directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GeoReference {
    /// Geographic latitude/longitude model
    Geographic {
        epsg: Option<u32>,
        /// (west, south) corner in degrees
        origin: (f64, f64),
        sector: Sector,
    },
    /// UTM-projected model
    Projected {
        epsg: Option<u32>,
        hemisphere: Hemisphere,
        zone: u32,
        /// World-file pixel sizes: x positive, y negative
        pixel_size: (f64, f64),
        /// Center-registered model location of the upper-left pixel
        origin: (f64, f64),
        sector: Sector,
    },
    /// Model type undefined or unrecognized; no spatial placement possible
    Unresolved,
}

impl GeoReference {
    /// Returns the sector when resolution succeeded
    pub fn sector(&self) -> Option<Sector> {
        match self {
            GeoReference::Geographic { sector, .. } => Some(*sector),
            GeoReference::Projected { sector, .. } => Some(*sector),
            GeoReference::Unresolved => None,
        }
    }

    /// Returns the EPSG code when one was recorded
    pub fn epsg(&self) -> Option<u32> {
        match self {
            GeoReference::Geographic { epsg, .. } => *epsg,
            GeoReference::Projected { epsg, .. } => *epsg,
            GeoReference::Unresolved => None,
        }
    }

    /// Returns the coordinate-system kind name
    pub fn kind(&self) -> &'static str {
        match self {
            GeoReference::Geographic { .. } => "Geographic",
            GeoReference::Projected { .. } => "Projected",
            GeoReference::Unresolved => "Unresolved",
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, GeoReference::Unresolved)
    }
}

/// Derived metadata of one directory, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryMetadata {
    /// Source file path
    pub file_path: PathBuf,
    /// Canonical byte order of materialized buffers, always big-endian
    pub byte_order: ByteOrder,
    /// Raster width in pixels
    pub width: usize,
    /// Raster height in pixels
    pub height: usize,
    /// Pixel format classification
    pub pixel_format: PixelFormat,
    /// Numeric sample format
    pub data_type: DataType,
    /// GDAL no-data sentinel, when declared
    pub nodata: Option<f64>,
    /// First MinSampleValue entry
    pub elevation_min: Option<f64>,
    /// First MaxSampleValue entry
    pub elevation_max: Option<f64>,
    /// Vertical unit from the VerticalUnits geo-key
    pub elevation_unit: Option<ElevationUnit>,
    /// Pixel registration from the RasterType geo-key
    pub raster_pixel: Option<RasterPixel>,
    /// Coordinate-system resolution result
    pub geo_reference: GeoReference,
}

impl DirectoryMetadata {
    /// Returns the sector when coordinate-system resolution succeeded
    pub fn sector(&self) -> Option<Sector> {
        self.geo_reference.sector()
    }

    /// Renders the metadata as a generic key/value view
    ///
    /// This is the compatibility boundary toward loosely-typed callers; the
    /// typed fields remain the source of truth.
    pub fn to_key_values(&self) -> BTreeMap<&'static str, Value> {
        let mut values = BTreeMap::new();
        values.insert(keys::FILE_PATH, json!(self.file_path.display().to_string()));
        values.insert(
            keys::BYTE_ORDER,
            json!(match self.byte_order {
                ByteOrder::LittleEndian => "LittleEndian",
                ByteOrder::BigEndian => "BigEndian",
            }),
        );
        values.insert(keys::WIDTH, json!(self.width));
        values.insert(keys::HEIGHT, json!(self.height));
        values.insert(
            keys::PIXEL_FORMAT,
            json!(if self.pixel_format.is_elevation() { "Elevation" } else { "Image" }),
        );
        values.insert(keys::DATA_TYPE, json!(self.data_type.name()));

        if let Some(color) = self.pixel_format.color_format() {
            values.insert(
                keys::IMAGE_COLOR_FORMAT,
                json!(match color {
                    ColorFormat::Grayscale => "Grayscale",
                    ColorFormat::Color => "Color",
                }),
            );
        }
        if let Some(nodata) = self.nodata {
            values.insert(keys::MISSING_DATA_SIGNAL, json!(nodata));
        }
        if let Some(min) = self.elevation_min {
            values.insert(keys::ELEVATION_MIN, json!(min));
        }
        if let Some(max) = self.elevation_max {
            values.insert(keys::ELEVATION_MAX, json!(max));
        }
        if let Some(unit) = self.elevation_unit {
            values.insert(
                keys::ELEVATION_UNIT,
                json!(match unit {
                    ElevationUnit::Meter => "Meter",
                    ElevationUnit::Foot => "Foot",
                }),
            );
        }
        if let Some(pixel) = self.raster_pixel {
            values.insert(
                keys::RASTER_PIXEL,
                json!(match pixel {
                    RasterPixel::IsArea => "IsArea",
                    RasterPixel::IsPoint => "IsPoint",
                }),
            );
        }

        values.insert(keys::COORDINATE_SYSTEM, json!(self.geo_reference.kind()));
        if let Some(epsg) = self.geo_reference.epsg() {
            values.insert(keys::PROJECTION_EPSG_CODE, json!(epsg));
        }
        if let Some(sector) = self.geo_reference.sector() {
            values.insert(keys::SECTOR, json!(sector));
        }

        match &self.geo_reference {
            GeoReference::Geographic { origin, .. } => {
                values.insert(keys::ORIGIN_X, json!(origin.0));
                values.insert(keys::ORIGIN_Y, json!(origin.1));
            }
            GeoReference::Projected { hemisphere, zone, pixel_size, origin, .. } => {
                values.insert(keys::PROJECTION_HEMISPHERE, json!(hemisphere.name()));
                values.insert(keys::PROJECTION_ZONE, json!(zone));
                values.insert(keys::PIXEL_SIZE_X, json!(pixel_size.0));
                values.insert(keys::PIXEL_SIZE_Y, json!(pixel_size.1));
                values.insert(keys::ORIGIN_X, json!(origin.0));
                values.insert(keys::ORIGIN_Y, json!(origin.1));
            }
            GeoReference::Unresolved => {}
        }

        values
    }
}

/// Resolves UTM hemisphere and zone from an EPSG projection code
///
/// The code ranges are the only source of truth; anything outside them is
/// unresolved.
pub fn utm_hemisphere_zone(code: u32) -> Option<(Hemisphere, u32)> {
    match code {
        16100..=16199 => Some((Hemisphere::South, code - 16100)),
        16000..=16099 => Some((Hemisphere::North, code - 16000)),
        26900..=26999 => Some((Hemisphere::North, code - 26900)), // NAD83
        32201..=32260 => Some((Hemisphere::North, code - 32200)), // WGS72 N
        32301..=32360 => Some((Hemisphere::South, code - 32300)), // WGS72 S
        32401..=32460 => Some((Hemisphere::North, code - 32400)), // WGS72BE N
        32501..=32560 => Some((Hemisphere::South, code - 32500)), // WGS72BE S
        32601..=32660 => Some((Hemisphere::North, code - 32600)), // WGS84 N
        32701..=32760 => Some((Hemisphere::South, code - 32700)), // WGS84 S
        _ => None,
    }
}

/// Classifies a directory's pixel format and data type
///
/// Rules apply in order, first match wins: color photometric interpretations,
/// then monochrome branching on the first sample-format entry. A directory
/// matching no rule, or matching one that leaves the data type open, is
/// unsupported.
fn classify(directory: &Directory) -> Result<(PixelFormat, DataType), DirectoryError> {
    match directory.photometric {
        photometric::RGB | photometric::CMYK | photometric::PALETTE => {
            return Ok((PixelFormat::Image(ColorFormat::Color), DataType::Int8));
        }
        _ => {}
    }

    if directory.samples_per_pixel == 1 {
        // TIFF defaults the sample format to unsigned when the tag is absent
        let sample_format = directory
            .sample_format
            .first()
            .copied()
            .unwrap_or(sample_formats::UNSIGNED);
        let bits = directory.bits_per_sample.first().copied();

        let integer_type = |bits: Option<u16>| match bits {
            Some(16) => Some(DataType::Int16),
            Some(8) => Some(DataType::Int8),
            Some(32) => Some(DataType::Int32),
            _ => None,
        };

        let classified = match sample_format {
            sample_formats::SIGNED => integer_type(bits).map(|dt| (PixelFormat::Elevation, dt)),
            sample_formats::IEEE_FLOAT => match bits {
                Some(32) => Some((PixelFormat::Elevation, DataType::Float32)),
                _ => None,
            },
            sample_formats::UNSIGNED => {
                integer_type(bits).map(|dt| (PixelFormat::Image(ColorFormat::Grayscale), dt))
            }
            _ => None,
        };

        if let Some(result) = classified {
            return Ok(result);
        }
        return Err(DirectoryError::UnsupportedPixelFormat(format!(
            "samples-per-pixel 1, sample format {}, {:?} bits per sample",
            sample_format, bits
        )));
    }

    Err(DirectoryError::UnsupportedPixelFormat(format!(
        "photometric {} with {} samples per pixel",
        directory.photometric, directory.samples_per_pixel
    )))
}

/// Builds the metadata record for one directory
///
/// Per-directory failures are returned as [`DirectoryError`] and do not
/// affect sibling directories. An undefined model type is non-fatal: the
/// record comes back with [`GeoReference::Unresolved`] and no sector.
pub fn build_directory_metadata(
    file_path: &Path,
    directory: &Directory,
    index: usize,
    geo_keys_table: &GeoKeyTable,
    utm: &dyn UtmBoundsCalculator,
) -> Result<DirectoryMetadata, DirectoryError> {
    let (mut pixel_format, data_type) = classify(directory)?;

    let nodata = directory.ascii_tag(tags::GDAL_NODATA).and_then(|text| {
        let parsed = text.trim().parse::<f64>();
        if parsed.is_err() {
            warn!("unparseable GDAL nodata value {:?} in directory {}", text, index);
        }
        parsed.ok()
    });
    let elevation_min = directory
        .doubles_tag(tags::MIN_SAMPLE_VALUE)
        .and_then(|v| v.first().copied());
    let elevation_max = directory
        .doubles_tag(tags::MAX_SAMPLE_VALUE)
        .and_then(|v| v.first().copied());

    // The geo-spec requires VerticalCSType for elevation products but its
    // value is ignored; presence alone forces the elevation classification.
    if geo_keys_table.has_geo_key(geo_keys::VERTICAL_CS_TYPE) {
        pixel_format = PixelFormat::Elevation;
    }

    let elevation_unit =
        match geo_keys_table.geo_key_int_or(geo_keys::VERTICAL_UNITS, geo_values::UNDEFINED) {
            geo_values::LINEAR_METER => Some(ElevationUnit::Meter),
            geo_values::LINEAR_FOOT => Some(ElevationUnit::Foot),
            _ => None,
        };

    let raster_pixel =
        match geo_keys_table.geo_key_int_or(geo_keys::RASTER_TYPE, geo_values::UNDEFINED) {
            geo_values::RASTER_PIXEL_IS_AREA => Some(RasterPixel::IsArea),
            geo_values::RASTER_PIXEL_IS_POINT => Some(RasterPixel::IsPoint),
            _ => None,
        };

    let model_type = geo_keys_table.geo_key_int_or(geo_keys::MODEL_TYPE, geo_values::UNDEFINED);
    let geo_reference = match model_type {
        geo_values::MODEL_TYPE_GEOGRAPHIC => {
            resolve_geographic(directory, index, geo_keys_table)
        }
        geo_values::MODEL_TYPE_PROJECTED => {
            resolve_projected(directory, index, geo_keys_table, utm)?
        }
        other => {
            error!(
                "unrecognized model type {} in directory {}, no spatial placement",
                other, index
            );
            GeoReference::Unresolved
        }
    };

    Ok(DirectoryMetadata {
        file_path: file_path.to_path_buf(),
        // Decoded samples are rewritten big-endian regardless of the source order
        byte_order: ByteOrder::BigEndian,
        width: directory.width,
        height: directory.height,
        pixel_format,
        data_type,
        nodata,
        elevation_min,
        elevation_max,
        elevation_unit,
        raster_pixel,
        geo_reference,
    })
}

fn resolve_geographic(
    directory: &Directory,
    index: usize,
    geo_keys_table: &GeoKeyTable,
) -> GeoReference {
    let epsg = match geo_keys_table
        .geo_key_int_or(geo_keys::GEOGRAPHIC_TYPE, geo_values::UNDEFINED)
    {
        geo_values::UNDEFINED => None,
        code => Some(code as u32),
    };

    match geo_keys_table.bounding_box(directory.width, directory.height) {
        Some(sector) => GeoReference::Geographic {
            epsg,
            origin: (sector.west, sector.south),
            sector,
        },
        None => {
            error!(
                "geographic directory {} lacks a tie point or pixel scale, no spatial placement",
                index
            );
            GeoReference::Unresolved
        }
    }
}

fn resolve_projected(
    directory: &Directory,
    index: usize,
    geo_keys_table: &GeoKeyTable,
    utm: &dyn UtmBoundsCalculator,
) -> Result<GeoReference, DirectoryError> {
    // ProjectionGeoKey wins over ProjectedCSTypeGeoKey when both are present
    let code = if geo_keys_table.has_geo_key(geo_keys::PROJECTION) {
        geo_keys_table.geo_key_int_or(geo_keys::PROJECTION, geo_values::UNDEFINED)
    } else {
        geo_keys_table.geo_key_int_or(geo_keys::PROJECTED_CS_TYPE, geo_values::UNDEFINED)
    } as u32;

    let (hemisphere, zone) =
        utm_hemisphere_zone(code).ok_or(DirectoryError::UnresolvedProjection { code })?;
    let epsg = if code == geo_values::UNDEFINED as u32 { None } else { Some(code) };

    let (scale_x, scale_y) = match geo_keys_table.pixel_scale() {
        Some((x, y, _)) => (x, y.abs()),
        None => {
            return Err(DirectoryError::SectorComputation(format!(
                "projected directory {} lacks a model pixel scale",
                index
            )))
        }
    };
    let pixel_size = (scale_x, -scale_y);

    // Shift the tie point from corner to center registration
    let origin = geo_keys_table
        .tie_point(index)
        .map(|tp| (tp.geo_x + scale_x / 2.0, tp.geo_y - scale_y / 2.0));

    let origin = origin.ok_or_else(|| {
        DirectoryError::SectorComputation(format!(
            "projected directory {} has no tie point at its index",
            index
        ))
    })?;

    let region = UtmRegion {
        projection_code: code,
        zone,
        hemisphere,
        pixel_size_x: pixel_size.0,
        pixel_size_y: pixel_size.1,
        origin_x: origin.0,
        origin_y: origin.1,
        width: directory.width,
        height: directory.height,
    };
    let sector = utm
        .bounding_box(&region)
        .map_err(DirectoryError::SectorComputation)?;

    Ok(GeoReference::Projected {
        epsg,
        hemisphere,
        zone,
        pixel_size,
        origin,
        sector,
    })
}
