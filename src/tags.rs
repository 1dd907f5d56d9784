//! TIFF tag constants used by the decoder contract

/// Image width in pixels
pub const IMAGE_WIDTH: u16 = 256;

/// Image height in pixels
pub const IMAGE_LENGTH: u16 = 257;

/// Bits per sample
pub const BITS_PER_SAMPLE: u16 = 258;

/// Photometric interpretation
pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;

/// Samples per pixel
pub const SAMPLES_PER_PIXEL: u16 = 277;

/// Minimum sample value
pub const MIN_SAMPLE_VALUE: u16 = 280;

/// Maximum sample value
pub const MAX_SAMPLE_VALUE: u16 = 281;

/// Sample format
pub const SAMPLE_FORMAT: u16 = 339;

/// GeoTIFF ModelPixelScaleTag
pub const MODEL_PIXEL_SCALE: u16 = 33550;

/// GeoTIFF ModelTiepointTag
pub const MODEL_TIEPOINT: u16 = 33922;

/// GeoTIFF ModelTransformationTag
pub const MODEL_TRANSFORMATION: u16 = 34264;

/// GeoTIFF GeoKeyDirectoryTag
pub const GEO_KEY_DIRECTORY: u16 = 34735;

/// GeoTIFF GeoDoubleParamsTag
pub const GEO_DOUBLE_PARAMS: u16 = 34736;

/// GeoTIFF GeoAsciiParamsTag
pub const GEO_ASCII_PARAMS: u16 = 34737;

/// GDAL no data value
pub const GDAL_NODATA: u16 = 42113;

/// Returns the name of a TIFF tag
pub fn tag_name(tag: u16) -> &'static str {
    match tag {
        IMAGE_WIDTH => "ImageWidth",
        IMAGE_LENGTH => "ImageLength",
        BITS_PER_SAMPLE => "BitsPerSample",
        PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        SAMPLES_PER_PIXEL => "SamplesPerPixel",
        MIN_SAMPLE_VALUE => "MinSampleValue",
        MAX_SAMPLE_VALUE => "MaxSampleValue",
        SAMPLE_FORMAT => "SampleFormat",
        MODEL_PIXEL_SCALE => "ModelPixelScale",
        MODEL_TIEPOINT => "ModelTiepoint",
        MODEL_TRANSFORMATION => "ModelTransformation",
        GEO_KEY_DIRECTORY => "GeoKeyDirectory",
        GEO_DOUBLE_PARAMS => "GeoDoubleParams",
        GEO_ASCII_PARAMS => "GeoAsciiParams",
        GDAL_NODATA => "GDAL_NODATA",
        _ => "Unknown",
    }
}

/// Photometric interpretation constants
pub mod photometric {
    /// Grayscale, zero is white
    pub const WHITE_IS_ZERO: u16 = 0;

    /// Grayscale, zero is black
    pub const BLACK_IS_ZERO: u16 = 1;

    /// RGB color
    pub const RGB: u16 = 2;

    /// Palette (indexed) color
    pub const PALETTE: u16 = 3;

    /// CMYK separated color
    pub const CMYK: u16 = 5;
}

/// Sample format constants
pub mod sample_formats {
    /// Unsigned integer samples
    pub const UNSIGNED: u16 = 1;

    /// Signed (two's complement) integer samples
    pub const SIGNED: u16 = 2;

    /// IEEE floating point samples
    pub const IEEE_FLOAT: u16 = 3;
}
