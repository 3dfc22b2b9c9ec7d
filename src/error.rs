use thiserror::Error;

/// Errors raised while turning a payload into a [`ModuleInfo`](crate::ModuleInfo).
///
/// Every variant aborts the whole construction; no partial result is ever returned.
#[derive(Error, Debug)]
pub enum Error {
    /// The payload was zero-length.
    #[error("Value cannot be empty.")]
    EmptyValue,

    /// The symbol generator could not produce a raster, or its pixel data was not accessible.
    #[error("Failed to get pixel buffer.")]
    PixelBufferUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The raster could not be cropped to its inner module region.
    #[error("Failed to crop {width}x{height} raster: {reason}")]
    CropFailure {
        width: u32,
        height: u32,
        reason: &'static str,
    },
}

impl Error {
    pub(crate) fn crop(width: u32, height: u32, reason: &'static str) -> Self {
        Error::CropFailure {
            width,
            height,
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
