//! GeoTIFF reader facade
//!
//! Owns the directory sequence and the shared geo-key table, and drives the
//! open / read / dispose lifecycle. Construction parses eagerly and fails
//! fast on malformed input; per-directory failures are kept as failed slots
//! so the remaining directories stay readable.

use std::fmt;
use std::path::Path;

use log::error;

use crate::collaborators::{ElevationRectifier, UtmBoundsCalculator};
use crate::directory::{Directory, TagDirectoryProvider};
use crate::error::{DirectoryError, Error, Result};
use crate::geokeys::GeoKeyTable;
use crate::metadata::{build_directory_metadata, DirectoryMetadata};
use crate::raster::{materialize, Raster};

/// External collaborators consumed by the reader
pub struct Collaborators {
    /// Bounding-box calculator for UTM-projected directories
    pub utm: Box<dyn UtmBoundsCalculator>,
    /// Void/edge repair pass for elevation buffers
    pub rectifier: Box<dyn ElevationRectifier>,
}

impl Collaborators {
    pub fn new(
        utm: Box<dyn UtmBoundsCalculator>,
        rectifier: Box<dyn ElevationRectifier>,
    ) -> Self {
        Self { utm, rectifier }
    }
}

struct ReaderState {
    directories: Vec<Directory>,
    geo_keys: GeoKeyTable,
    metadata: Vec<std::result::Result<DirectoryMetadata, DirectoryError>>,
    rectifier: Box<dyn ElevationRectifier>,
}

/// Decodes a GeoTIFF file into metadata and materialized rasters
///
/// A single reader must not be driven from multiple threads; independent
/// readers over independent files are safe in parallel.
pub struct GeoTiffReader {
    state: Option<ReaderState>,
}

impl fmt::Debug for GeoTiffReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("GeoTiffReader");
        match &self.state {
            Some(state) => debug
                .field("directories", &state.directories.len())
                .field("disposed", &false),
            None => debug.field("disposed", &true),
        }
        .finish()
    }
}

impl GeoTiffReader {
    /// Opens a file through the tag-directory provider and derives all
    /// per-directory metadata eagerly
    ///
    /// Fails with [`Error::MalformedInput`] when the provider yields no
    /// directories and with [`Error::MalformedGeoKeyDirectory`] when the
    /// geo-key directory of the first directory is malformed. Per-directory
    /// metadata failures do not abort the open.
    pub fn open(
        path: &Path,
        provider: &dyn TagDirectoryProvider,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let directories = provider.read_directories(path)?;
        if directories.is_empty() {
            return Err(Error::MalformedInput(format!(
                "no image file directories in {}",
                path.display()
            )));
        }

        // The geo-key table comes from the first directory and is shared by
        // every per-directory metadata build.
        let geo_keys = GeoKeyTable::from_directory(&directories[0])?;

        let metadata = directories
            .iter()
            .enumerate()
            .map(|(index, directory)| {
                let built = build_directory_metadata(
                    path,
                    directory,
                    index,
                    &geo_keys,
                    collaborators.utm.as_ref(),
                );
                if let Err(ref e) = built {
                    error!("directory {} of {} skipped: {}", index, path.display(), e);
                }
                built
            })
            .collect();

        Ok(Self {
            state: Some(ReaderState {
                directories,
                geo_keys,
                metadata,
                rectifier: collaborators.rectifier,
            }),
        })
    }

    fn state(&self) -> Result<&ReaderState> {
        self.state.as_ref().ok_or(Error::UseAfterDispose)
    }

    /// Number of directories in the file
    pub fn directory_count(&self) -> Result<usize> {
        Ok(self.state()?.directories.len())
    }

    /// Whether the first directory carries a resolved coordinate system
    pub fn is_geotiff(&self) -> Result<bool> {
        let state = self.state()?;
        Ok(matches!(
            state.metadata.first(),
            Some(Ok(metadata)) if metadata.geo_reference.is_resolved()
        ))
    }

    /// The shared geo-key table
    pub fn geo_keys(&self) -> Result<&GeoKeyTable> {
        Ok(&self.state()?.geo_keys)
    }

    /// Per-directory metadata results, in file order
    pub fn metadata(
        &self,
    ) -> Result<&[std::result::Result<DirectoryMetadata, DirectoryError>]> {
        Ok(&self.state()?.metadata)
    }

    /// Metadata of one directory
    pub fn directory_metadata(&self, index: usize) -> Result<&DirectoryMetadata> {
        let state = self.state()?;
        let slot = state.metadata.get(index).ok_or(Error::DirectoryOutOfBounds {
            index,
            count: state.metadata.len(),
        })?;
        slot.as_ref().map_err(|e| Error::Directory(e.clone()))
    }

    /// Materializes one directory into a raster
    ///
    /// Callable repeatedly; every call rebuilds the raster from the decoded
    /// pixel matrix and yields a structurally equal result.
    pub fn materialize(&self, index: usize) -> Result<Raster> {
        let state = self.state()?;
        let metadata = self.directory_metadata(index)?;
        let directory = &state.directories[index];
        materialize(directory, metadata, state.rectifier.as_ref()).map_err(Error::Directory)
    }

    /// Materializes every directory, continuing over per-directory failures
    ///
    /// The output preserves directory order; failed slots carry the error
    /// that caused the gap.
    pub fn read_rasters(&self) -> Result<Vec<std::result::Result<Raster, DirectoryError>>> {
        let state = self.state()?;
        let rasters = state
            .directories
            .iter()
            .zip(state.metadata.iter())
            .enumerate()
            .map(|(index, (directory, slot))| match slot {
                Ok(metadata) => {
                    let built = materialize(directory, metadata, state.rectifier.as_ref());
                    if let Err(ref e) = built {
                        error!("directory {} not materialized: {}", index, e);
                    }
                    built
                }
                Err(e) => Err(e.clone()),
            })
            .collect();
        Ok(rasters)
    }

    /// Discards all metadata; every subsequent call fails
    pub fn dispose(&mut self) {
        self.state = None;
    }
}
