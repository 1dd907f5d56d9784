//! End-to-end tests for the reader facade
//!
//! The tag-directory provider and both collaborators are stubbed in memory;
//! the tests exercise the open / metadata / materialize / dispose lifecycle
//! over the decoded data contracts.

use std::collections::HashMap;
use std::path::Path;

use terrakit::geokeys::geo_keys;
use terrakit::{
    ByteOrder, Collaborators, DataType, Directory, DirectoryError, Error, GeoReference,
    GeoTiffReader, Hemisphere, NoopRectifier, PixelFormat, PixelMatrix, Result, Sector,
    TagDirectoryProvider, TagValue, UtmBoundsCalculator, UtmRegion,
};

struct StubProvider {
    directories: Vec<Directory>,
}

impl TagDirectoryProvider for StubProvider {
    fn read_directories(&self, _path: &Path) -> Result<Vec<Directory>> {
        Ok(self.directories.clone())
    }
}

/// Flat-earth UTM stand-in: linear meters-to-degrees scaling around the
/// zone's false easting. Deterministic, which is all the tests need.
struct FlatUtm;

impl UtmBoundsCalculator for FlatUtm {
    fn bounding_box(&self, region: &UtmRegion) -> std::result::Result<Sector, String> {
        let deg_per_meter = 1e-5;
        let west = (region.origin_x - 500_000.0) * deg_per_meter;
        let north = region.origin_y * deg_per_meter;
        let east = west + region.pixel_size_x * region.width as f64 * deg_per_meter;
        let south = north + region.pixel_size_y * region.height as f64 * deg_per_meter;
        Ok(Sector::from_degrees(south, north, west, east))
    }
}

fn collaborators() -> Collaborators {
    Collaborators::new(Box::new(FlatUtm), Box::new(NoopRectifier))
}

fn elevation_directory(width: usize, height: usize, tags: Vec<(u16, TagValue)>) -> Directory {
    let samples = (0..width * height).map(|v| (v % 97) as f64 * 3.0 - 40.0).collect();
    Directory {
        width,
        height,
        byte_order: ByteOrder::LittleEndian,
        photometric: 1,
        samples_per_pixel: 1,
        sample_format: vec![2],
        bits_per_sample: vec![16],
        tags: HashMap::from_iter(tags),
        pixels: PixelMatrix::new(width, height, 1, samples),
    }
}

fn geographic_tags() -> Vec<(u16, TagValue)> {
    vec![
        (33550, TagValue::Doubles(vec![0.5, 0.5, 0.0])), // ModelPixelScale
        (
            33922, // ModelTiepoint
            TagValue::Doubles(vec![0.0, 0.0, 0.0, 32.0, 35.0, 0.0]),
        ),
        (
            34735, // GeoKeyDirectory
            TagValue::Shorts(vec![
                1, 1, 0, 2,
                geo_keys::MODEL_TYPE, 0, 1, 2,
                geo_keys::GEOGRAPHIC_TYPE, 0, 1, 4326,
            ]),
        ),
    ]
}

fn projected_tags(code: u16) -> Vec<(u16, TagValue)> {
    vec![
        (33550, TagValue::Doubles(vec![30.0, 30.0, 0.0])),
        (
            33922,
            TagValue::Doubles(vec![0.0, 0.0, 0.0, 500_000.0, 4_000_000.0, 0.0]),
        ),
        (
            34735,
            TagValue::Shorts(vec![
                1, 1, 0, 2,
                geo_keys::MODEL_TYPE, 0, 1, 1,
                geo_keys::PROJECTED_CS_TYPE, 0, 1, code,
            ]),
        ),
    ]
}

fn open(directories: Vec<Directory>) -> Result<GeoTiffReader> {
    let provider = StubProvider { directories };
    GeoTiffReader::open(Path::new("/data/test.tif"), &provider, collaborators())
}

#[test]
fn geographic_sector_matches_reference() {
    let reader = open(vec![elevation_directory(8, 6, geographic_tags())]).unwrap();
    let metadata = reader.directory_metadata(0).unwrap();

    // Reference: tie point corner plus full pixel spans at 0.5 deg/pixel
    let sector = metadata.sector().unwrap();
    assert!(sector.south <= sector.north);
    assert!((sector.west - 32.0).abs() < 1e-9);
    assert!((sector.north - 35.0).abs() < 1e-9);
    assert!((sector.east - 36.0).abs() < 1e-9);
    assert!((sector.south - 32.0).abs() < 1e-9);

    assert!(reader.is_geotiff().unwrap());
    assert_eq!(metadata.geo_reference.epsg(), Some(4326));
}

#[test]
fn projected_hemisphere_and_zone_resolution() {
    let reader = open(vec![elevation_directory(4, 4, projected_tags(32601))]).unwrap();
    match &reader.directory_metadata(0).unwrap().geo_reference {
        GeoReference::Projected { hemisphere, zone, .. } => {
            assert_eq!(*hemisphere, Hemisphere::North);
            assert_eq!(*zone, 1);
        }
        other => panic!("expected projected reference, got {:?}", other),
    }

    let reader = open(vec![elevation_directory(4, 4, projected_tags(32760))]).unwrap();
    match &reader.directory_metadata(0).unwrap().geo_reference {
        GeoReference::Projected { hemisphere, zone, .. } => {
            assert_eq!(*hemisphere, Hemisphere::South);
            assert_eq!(*zone, 60);
        }
        other => panic!("expected projected reference, got {:?}", other),
    }
}

#[test]
fn unknown_projection_code_fails_per_directory() {
    let reader = open(vec![
        elevation_directory(4, 4, projected_tags(42999)),
    ])
    .unwrap();
    let err = reader.directory_metadata(0).unwrap_err();
    assert!(matches!(
        err,
        Error::Directory(DirectoryError::UnresolvedProjection { code: 42999 })
    ));
}

#[test]
fn malformed_geo_key_directory_aborts_open() {
    let mut tags = geographic_tags();
    tags[2] = (34735, TagValue::Shorts(vec![1, 1, 0, 1, 1024, 0, 1]));
    let err = open(vec![elevation_directory(4, 4, tags)]).unwrap_err();
    assert!(matches!(err, Error::MalformedGeoKeyDirectory { length: 7 }));
}

#[test]
fn empty_directory_sequence_is_malformed_input() {
    let err = open(vec![]).unwrap_err();
    assert!(matches!(err, Error::MalformedInput(_)));
}

#[test]
fn first_rows_equal_source_channel0() {
    let directory = elevation_directory(16, 5, geographic_tags());
    let reader = open(vec![directory.clone()]).unwrap();
    let raster = reader.materialize(0).unwrap();

    for y in 0..2 {
        for x in 0..16 {
            assert_eq!(raster.value_at(x, y), directory.pixels.channel0(x, y));
        }
    }
}

#[test]
fn materialize_is_idempotent() {
    let reader = open(vec![elevation_directory(6, 6, geographic_tags())]).unwrap();
    let first = reader.materialize(0).unwrap();
    let second = reader.materialize(0).unwrap();
    assert_eq!(first.metadata(), second.metadata());
    assert_eq!(first.data(), second.data());
}

#[test]
fn batch_read_continues_over_failed_directories() {
    let mut unsupported = elevation_directory(4, 4, vec![]);
    unsupported.sample_format = vec![3]; // IEEE float
    unsupported.bits_per_sample = vec![64]; // unsupported width

    let reader = open(vec![
        elevation_directory(4, 4, geographic_tags()),
        unsupported,
        elevation_directory(4, 4, vec![]),
    ])
    .unwrap();

    let rasters = reader.read_rasters().unwrap();
    assert_eq!(rasters.len(), 3);
    assert!(rasters[0].is_ok());
    assert!(matches!(
        rasters[1],
        Err(DirectoryError::UnsupportedPixelFormat(_))
    ));
    // The geo-key table is shared: directory 2 carries no geo tags of its
    // own yet still resolves through the table built from directory 0.
    let third = rasters[2].as_ref().unwrap();
    assert_eq!(third.metadata().pixel_format, PixelFormat::Elevation);
    assert_eq!(third.data_type(), DataType::Int16);
    assert!(third.metadata().sector().is_some());
}

#[test]
fn metadata_is_memoized_per_directory() {
    let reader = open(vec![elevation_directory(4, 4, geographic_tags())]).unwrap();
    let first = reader.directory_metadata(0).unwrap() as *const _;
    let second = reader.directory_metadata(0).unwrap() as *const _;
    assert_eq!(first, second);
}

#[test]
fn key_value_view_exposes_projected_fields() {
    let reader = open(vec![elevation_directory(4, 4, projected_tags(32636))]).unwrap();
    let view = reader.directory_metadata(0).unwrap().to_key_values();

    assert_eq!(view[terrakit::keys::COORDINATE_SYSTEM], "Projected");
    assert_eq!(view[terrakit::keys::PROJECTION_EPSG_CODE], 32636);
    assert_eq!(view[terrakit::keys::PROJECTION_HEMISPHERE], "North");
    assert_eq!(view[terrakit::keys::PROJECTION_ZONE], 36);
    assert_eq!(view[terrakit::keys::PIXEL_SIZE_X], 30.0);
    assert_eq!(view[terrakit::keys::PIXEL_SIZE_Y], -30.0);
    assert_eq!(view[terrakit::keys::ORIGIN_X], 500_015.0);
    assert!(view.contains_key(terrakit::keys::SECTOR));
}

#[test]
fn dispose_invalidates_every_operation() {
    let mut reader = open(vec![elevation_directory(4, 4, geographic_tags())]).unwrap();
    assert!(reader.materialize(0).is_ok());

    reader.dispose();

    assert!(matches!(reader.directory_count(), Err(Error::UseAfterDispose)));
    assert!(matches!(reader.metadata(), Err(Error::UseAfterDispose)));
    assert!(matches!(reader.directory_metadata(0), Err(Error::UseAfterDispose)));
    assert!(matches!(reader.materialize(0), Err(Error::UseAfterDispose)));
    assert!(matches!(reader.read_rasters(), Err(Error::UseAfterDispose)));

    // Dispose is idempotent
    reader.dispose();
    assert!(matches!(reader.is_geotiff(), Err(Error::UseAfterDispose)));
}

#[test]
fn directory_index_out_of_bounds() {
    let reader = open(vec![elevation_directory(4, 4, geographic_tags())]).unwrap();
    assert!(matches!(
        reader.directory_metadata(5),
        Err(Error::DirectoryOutOfBounds { index: 5, count: 1 })
    ));
}

#[test]
fn non_geotiff_file_still_opens() {
    let reader = open(vec![elevation_directory(4, 4, vec![])]).unwrap();
    assert!(!reader.is_geotiff().unwrap());
    let metadata = reader.directory_metadata(0).unwrap();
    assert_eq!(metadata.geo_reference, GeoReference::Unresolved);
    assert_eq!(metadata.sector(), None);
}
