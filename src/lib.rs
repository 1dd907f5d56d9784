//! terrakit - GeoTIFF decoding for mapping and elevation pipelines
//!
//! terrakit turns the directory sequence of a GeoTIFF file into validated,
//! georeferenced, typed in-memory rasters. The TIFF byte stream itself is
//! decoded by an external [`TagDirectoryProvider`]; terrakit interprets the
//! geo-key table, classifies the pixel format, resolves the coordinate
//! system (including UTM hemisphere/zone inference) and materializes
//! canonical big-endian sample buffers.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use terrakit::{Collaborators, GeoTiffReader, NoopRectifier};
//! # use terrakit::{Sector, TagDirectoryProvider, UtmBoundsCalculator, UtmRegion};
//! # struct MyProvider;
//! # impl TagDirectoryProvider for MyProvider {
//! #     fn read_directories(&self, _: &Path) -> terrakit::Result<Vec<terrakit::Directory>> {
//! #         unimplemented!()
//! #     }
//! # }
//! # struct MyUtm;
//! # impl UtmBoundsCalculator for MyUtm {
//! #     fn bounding_box(&self, _: &UtmRegion) -> Result<Sector, String> { unimplemented!() }
//! # }
//!
//! let provider = MyProvider;
//! let collaborators = Collaborators::new(Box::new(MyUtm), Box::new(NoopRectifier));
//! let reader = GeoTiffReader::open(Path::new("dem.tif"), &provider, collaborators)?;
//!
//! for slot in reader.read_rasters()? {
//!     match slot {
//!         Ok(raster) => println!("{}x{} {:?}", raster.width(), raster.height(), raster.data_type()),
//!         Err(e) => eprintln!("directory skipped: {}", e),
//!     }
//! }
//! # Ok::<(), terrakit::Error>(())
//! ```

pub mod collaborators;
pub mod directory;
pub mod error;
pub mod geokeys;
pub mod metadata;
pub mod raster;
pub mod reader;
pub mod tags;
pub mod types;

pub use collaborators::{ElevationRectifier, NoopRectifier, UtmBoundsCalculator, UtmRegion};
pub use directory::{Directory, PixelMatrix, TagDirectoryProvider, TagValue};
pub use error::{DirectoryError, Error, Result};
pub use geokeys::{GeoKeyTable, TiePoint};
pub use metadata::{keys, DirectoryMetadata, GeoReference};
pub use raster::{Raster, RasterBuffer};
pub use reader::{Collaborators, GeoTiffReader};
pub use types::{
    ByteOrder, ColorFormat, DataType, ElevationUnit, Hemisphere, PixelFormat, RasterPixel, Sector,
};
