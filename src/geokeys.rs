//! Geo-key table decoding
//!
//! The GeoKeyDirectory tag stores a flat SHORT array: a four-value header
//! followed by one four-value entry per key. Each entry either carries its
//! value inline or points into the GeoDoubleParams / GeoAsciiParams blocks.
//! The table is decoded once per file, from the first directory, and shared
//! read-only by every per-directory metadata build.

use std::collections::HashMap;

use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::tags;
use crate::types::Sector;

/// Geo-key identifiers
pub mod geo_keys {
    /// GTModelTypeGeoKey
    pub const MODEL_TYPE: u16 = 1024;
    /// GTRasterTypeGeoKey
    pub const RASTER_TYPE: u16 = 1025;
    /// GTCitationGeoKey
    pub const CITATION: u16 = 1026;
    /// GeographicTypeGeoKey
    pub const GEOGRAPHIC_TYPE: u16 = 2048;
    /// ProjectedCSTypeGeoKey
    pub const PROJECTED_CS_TYPE: u16 = 3072;
    /// ProjectionGeoKey
    pub const PROJECTION: u16 = 3074;
    /// VerticalCSTypeGeoKey
    pub const VERTICAL_CS_TYPE: u16 = 4096;
    /// VerticalUnitsGeoKey
    pub const VERTICAL_UNITS: u16 = 4099;
}

/// Geo-key value constants
pub mod geo_values {
    /// Undefined sentinel shared by all code spaces
    pub const UNDEFINED: i32 = 0;

    /// Model type: projected coordinate system
    pub const MODEL_TYPE_PROJECTED: i32 = 1;
    /// Model type: geographic latitude/longitude
    pub const MODEL_TYPE_GEOGRAPHIC: i32 = 2;
    /// Model type: geocentric X/Y/Z
    pub const MODEL_TYPE_GEOCENTRIC: i32 = 3;

    /// Raster type: pixel covers an area
    pub const RASTER_PIXEL_IS_AREA: i32 = 1;
    /// Raster type: pixel marks a point
    pub const RASTER_PIXEL_IS_POINT: i32 = 2;

    /// Linear unit: meter
    pub const LINEAR_METER: i32 = 9001;
    /// Linear unit: international foot
    pub const LINEAR_FOOT: i32 = 9002;
}

/// A (raster, model) coordinate pair anchoring pixel space to world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiePoint {
    pub pixel_x: f64,
    pub pixel_y: f64,
    pub pixel_z: f64,
    pub geo_x: f64,
    pub geo_y: f64,
    pub geo_z: f64,
}

/// One decoded geo-key directory entry
#[derive(Debug, Clone, Copy)]
struct GeoKeyEntry {
    tag_location: u16,
    count: u16,
    value_offset: u16,
}

/// Decoded geo-referencing tags of a file
///
/// Built once from directory 0 and never mutated afterwards. Absent keys
/// resolve to `None`, never an error.
#[derive(Debug)]
pub struct GeoKeyTable {
    entries: HashMap<u16, GeoKeyEntry>,
    pixel_scale: Option<(f64, f64, f64)>,
    tie_points: Vec<TiePoint>,
    transform: Option<[f64; 16]>,
    double_params: Vec<f64>,
    ascii_params: Option<String>,
}

impl GeoKeyTable {
    /// Decodes the geo-referencing tags of a directory
    ///
    /// Fails with [`Error::MalformedGeoKeyDirectory`] when the geo-key
    /// directory length is not a multiple of 4; every other tag is optional.
    pub fn from_directory(directory: &Directory) -> Result<Self> {
        let mut table = GeoKeyTable {
            entries: HashMap::new(),
            pixel_scale: None,
            tie_points: Vec::new(),
            transform: None,
            double_params: Vec::new(),
            ascii_params: None,
        };

        if let Some(values) = directory.doubles_tag(tags::MODEL_PIXEL_SCALE) {
            if values.len() >= 3 {
                table.pixel_scale = Some((values[0], values[1], values[2]));
            }
        }

        if let Some(values) = directory.doubles_tag(tags::MODEL_TIEPOINT) {
            for chunk in values.chunks(6) {
                if chunk.len() == 6 {
                    table.tie_points.push(TiePoint {
                        pixel_x: chunk[0],
                        pixel_y: chunk[1],
                        pixel_z: chunk[2],
                        geo_x: chunk[3],
                        geo_y: chunk[4],
                        geo_z: chunk[5],
                    });
                }
            }
        }

        if let Some(values) = directory.doubles_tag(tags::MODEL_TRANSFORMATION) {
            if values.len() == 16 {
                let mut matrix = [0.0; 16];
                matrix.copy_from_slice(&values);
                table.transform = Some(matrix);
            }
        }

        if let Some(keys) = directory.shorts_tag(tags::GEO_KEY_DIRECTORY) {
            if keys.len() % 4 != 0 {
                return Err(Error::MalformedGeoKeyDirectory { length: keys.len() });
            }
            // Header occupies the first 4 shorts, entries follow as 4-tuples
            for entry in keys[4.min(keys.len())..].chunks_exact(4) {
                table.entries.insert(
                    entry[0],
                    GeoKeyEntry {
                        tag_location: entry[1],
                        count: entry[2],
                        value_offset: entry[3],
                    },
                );
            }
        }

        if let Some(values) = directory.doubles_tag(tags::GEO_DOUBLE_PARAMS) {
            table.double_params = values;
        }

        if let Some(text) = directory.ascii_tag(tags::GEO_ASCII_PARAMS) {
            table.ascii_params = Some(text.to_string());
        }

        Ok(table)
    }

    /// Returns whether a geo-key is present
    pub fn has_geo_key(&self, key: u16) -> bool {
        self.entries.contains_key(&key)
    }

    /// Returns a geo-key's values as integers
    ///
    /// Inline values resolve directly; values stored in the double-parameter
    /// block are fetched and truncated. Absent keys, ASCII-valued keys and
    /// out-of-range block references resolve to `None`.
    pub fn geo_key_ints(&self, key: u16) -> Option<Vec<i32>> {
        let entry = self.entries.get(&key)?;
        if entry.tag_location == 0 {
            return Some(vec![entry.value_offset as i32]);
        }
        self.block_doubles(entry)
            .map(|values| values.iter().map(|&v| v as i32).collect())
    }

    /// Returns a geo-key's values as doubles
    pub fn geo_key_doubles(&self, key: u16) -> Option<Vec<f64>> {
        let entry = self.entries.get(&key)?;
        if entry.tag_location == 0 {
            return Some(vec![entry.value_offset as f64]);
        }
        self.block_doubles(entry).map(|values| values.to_vec())
    }

    /// Returns a geo-key's value from the ASCII parameter block
    ///
    /// GeoTIFF terminates ASCII values with '|'; the terminator is stripped.
    pub fn geo_key_ascii(&self, key: u16) -> Option<String> {
        let entry = self.entries.get(&key)?;
        if entry.tag_location != tags::GEO_ASCII_PARAMS {
            return None;
        }
        let params = self.ascii_params.as_deref()?;
        let start = entry.value_offset as usize;
        let end = start + entry.count as usize;
        if end > params.len() {
            return None;
        }
        Some(params[start..end].trim_end_matches('|').to_string())
    }

    /// Returns a geo-key's first integer value, or `default` when undefined
    pub fn geo_key_int_or(&self, key: u16, default: i32) -> i32 {
        self.geo_key_ints(key)
            .and_then(|values| values.first().copied())
            .unwrap_or(default)
    }

    fn block_doubles(&self, entry: &GeoKeyEntry) -> Option<&[f64]> {
        if entry.tag_location != tags::GEO_DOUBLE_PARAMS {
            return None;
        }
        let start = entry.value_offset as usize;
        let end = start + entry.count as usize;
        if end > self.double_params.len() {
            return None;
        }
        Some(&self.double_params[start..end])
    }

    /// Returns the model pixel scale (x, y, z)
    pub fn pixel_scale(&self) -> Option<(f64, f64, f64)> {
        self.pixel_scale
    }

    /// Returns the tie point for a directory index
    pub fn tie_point(&self, index: usize) -> Option<&TiePoint> {
        self.tie_points.get(index)
    }

    /// Returns all tie points
    pub fn tie_points(&self) -> &[TiePoint] {
        &self.tie_points
    }

    /// Returns the 4x4 model transformation matrix
    pub fn transform(&self) -> Option<&[f64; 16]> {
        self.transform.as_ref()
    }

    /// Computes the geographic bounding box of a raster
    ///
    /// Anchors the first tie point at the raster's upper-left corner and
    /// spans the full width and height at the model pixel scale. The tie
    /// point is treated as an area-style corner registration regardless of
    /// the RasterType geo-key. Returns `None` when the tie point or pixel
    /// scale is absent.
    pub fn bounding_box(&self, width: usize, height: usize) -> Option<Sector> {
        let tie_point = self.tie_points.first()?;
        let (scale_x, scale_y, _) = self.pixel_scale?;

        let west = tie_point.geo_x;
        let north = tie_point.geo_y;
        let east = west + scale_x * width as f64;
        let south = north - scale_y * height as f64;

        Some(Sector::from_degrees(south, north, west, east))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{PixelMatrix, TagValue};
    use crate::types::ByteOrder;
    use std::collections::HashMap as TagMap;

    fn directory_with_tags(tag_values: Vec<(u16, TagValue)>) -> Directory {
        Directory {
            width: 10,
            height: 10,
            byte_order: ByteOrder::LittleEndian,
            photometric: 1,
            samples_per_pixel: 1,
            sample_format: vec![2],
            bits_per_sample: vec![16],
            tags: TagMap::from_iter(tag_values),
            pixels: PixelMatrix::new(10, 10, 1, vec![0.0; 100]),
        }
    }

    fn geographic_directory() -> Directory {
        directory_with_tags(vec![
            (
                tags::MODEL_PIXEL_SCALE,
                TagValue::Doubles(vec![0.1, 0.1, 0.0]),
            ),
            (
                tags::MODEL_TIEPOINT,
                TagValue::Doubles(vec![0.0, 0.0, 0.0, 33.0, 36.0, 0.0]),
            ),
            (
                tags::GEO_KEY_DIRECTORY,
                TagValue::Shorts(vec![
                    1, 1, 0, 4, // header
                    geo_keys::MODEL_TYPE, 0, 1, 2,
                    geo_keys::GEOGRAPHIC_TYPE, 0, 1, 4326,
                    geo_keys::CITATION, tags::GEO_ASCII_PARAMS, 7, 0,
                    geo_keys::RASTER_TYPE, tags::GEO_DOUBLE_PARAMS, 1, 1,
                ]),
            ),
            (
                tags::GEO_DOUBLE_PARAMS,
                TagValue::Doubles(vec![99.5, 1.0]),
            ),
            (
                tags::GEO_ASCII_PARAMS,
                TagValue::Ascii("WGS 84|extra".to_string()),
            ),
        ])
    }

    #[test]
    fn test_inline_key() {
        let table = GeoKeyTable::from_directory(&geographic_directory()).unwrap();
        assert!(table.has_geo_key(geo_keys::MODEL_TYPE));
        assert_eq!(table.geo_key_ints(geo_keys::MODEL_TYPE), Some(vec![2]));
        assert_eq!(table.geo_key_ints(geo_keys::GEOGRAPHIC_TYPE), Some(vec![4326]));
    }

    #[test]
    fn test_double_block_indirection() {
        let table = GeoKeyTable::from_directory(&geographic_directory()).unwrap();
        assert_eq!(table.geo_key_doubles(geo_keys::RASTER_TYPE), Some(vec![1.0]));
        assert_eq!(table.geo_key_ints(geo_keys::RASTER_TYPE), Some(vec![1]));
    }

    #[test]
    fn test_ascii_block_indirection() {
        let table = GeoKeyTable::from_directory(&geographic_directory()).unwrap();
        assert_eq!(table.geo_key_ascii(geo_keys::CITATION), Some("WGS 84".to_string()));
        // Inline keys have no ASCII representation
        assert_eq!(table.geo_key_ascii(geo_keys::MODEL_TYPE), None);
    }

    #[test]
    fn test_absent_key_is_undefined() {
        let table = GeoKeyTable::from_directory(&geographic_directory()).unwrap();
        assert!(!table.has_geo_key(geo_keys::VERTICAL_CS_TYPE));
        assert_eq!(table.geo_key_ints(geo_keys::VERTICAL_CS_TYPE), None);
        assert_eq!(
            table.geo_key_int_or(geo_keys::VERTICAL_UNITS, geo_values::UNDEFINED),
            geo_values::UNDEFINED
        );
    }

    #[test]
    fn test_malformed_directory_length() {
        let dir = directory_with_tags(vec![(
            tags::GEO_KEY_DIRECTORY,
            TagValue::Shorts(vec![1, 1, 0, 1, 1024, 0, 1]),
        )]);
        let err = GeoKeyTable::from_directory(&dir).unwrap_err();
        assert!(matches!(err, Error::MalformedGeoKeyDirectory { length: 7 }));
    }

    #[test]
    fn test_bounding_box_area_convention() {
        let table = GeoKeyTable::from_directory(&geographic_directory()).unwrap();
        let sector = table.bounding_box(10, 10).unwrap();
        assert!((sector.west - 33.0).abs() < 1e-9);
        assert!((sector.north - 36.0).abs() < 1e-9);
        assert!((sector.east - 34.0).abs() < 1e-9);
        assert!((sector.south - 35.0).abs() < 1e-9);
        assert!(sector.south <= sector.north);
    }

    #[test]
    fn test_bounding_box_requires_georeference() {
        let dir = directory_with_tags(vec![]);
        let table = GeoKeyTable::from_directory(&dir).unwrap();
        assert!(table.bounding_box(10, 10).is_none());
    }

    #[test]
    fn test_tie_point_by_index() {
        let dir = directory_with_tags(vec![(
            tags::MODEL_TIEPOINT,
            TagValue::Doubles(vec![
                0.0, 0.0, 0.0, 500000.0, 4000000.0, 0.0,
                0.0, 0.0, 0.0, 510000.0, 4010000.0, 0.0,
            ]),
        )]);
        let table = GeoKeyTable::from_directory(&dir).unwrap();
        assert_eq!(table.tie_points().len(), 2);
        assert_eq!(table.tie_point(1).unwrap().geo_x, 510000.0);
        assert!(table.tie_point(2).is_none());
    }
}
