//! Symbol generation: the seam between the extractor and whatever produces the raster.
//!
//! The extractor only ever sees a [`RawRaster`]: a square RGBA image whose outermost ring of
//! pixels is the 1-module quiet zone and where every other pixel is exactly one module.

use image::{ImageBuffer, RgbaImage};
use thiserror::Error;

use crate::qrcode::{CorrectionLevel, DataTooLong, QrCode, Segment, Version};

/// The raw output of a [`SymbolGenerator`]: one pixel per module plus a 1-pixel quiet zone.
pub type RawRaster = RgbaImage;

/// Width of the quiet zone the extractor expects, in pixels (= modules).
pub const QUIET_ZONE: u32 = 1;

const DARK: [u8; 4] = [0, 0, 0, 255];
const LIGHT: [u8; 4] = [255, 255, 255, 255];

/// Something that can turn a payload into a rendered QR symbol.
///
/// Implementors are expected to be deterministic: the same payload and level must always
/// produce the same raster.
pub trait SymbolGenerator {
    type Error: std::error::Error + Send + Sync + 'static;

    fn generate(&self, payload: &str, level: CorrectionLevel) -> Result<RawRaster, Self::Error>;
}

impl<G: SymbolGenerator + ?Sized> SymbolGenerator for &G {
    type Error = G::Error;

    fn generate(&self, payload: &str, level: CorrectionLevel) -> Result<RawRaster, Self::Error> {
        (**self).generate(payload, level)
    }
}

/// Failures of the built-in generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("payload does not fit in a QR code: {0}")]
    DataTooLong(#[from] DataTooLong),

    #[error("pixel storage for a {width}x{height} raster could not be created")]
    PixelBuffer { width: u32, height: u32 },
}

/// The built-in generator, backed by [`QrCode`].
///
/// # Example
///
/// ```rust
/// use qirust_modules::generator::{QrGenerator, SymbolGenerator};
/// use qirust_modules::CorrectionLevel;
///
/// let raster = QrGenerator::default().generate("HELLO", CorrectionLevel::Medium).unwrap();
/// assert_eq!(raster.dimensions(), (23, 23));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrGenerator {
    boost_level: bool,
    min_version: Version,
    max_version: Version,
}

impl Default for QrGenerator {
    fn default() -> Self {
        Self {
            boost_level: false,
            min_version: Version::MIN,
            max_version: Version::MAX,
        }
    }
}

impl QrGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the correction level whenever that does not grow the symbol.
    pub fn boost_level(mut self, boost: bool) -> Self {
        self.boost_level = boost;
        self
    }

    /// Restrict the versions the encoder may pick. Bounds are swapped if given in reverse.
    pub fn versions(mut self, min: Version, max: Version) -> Self {
        self.min_version = min.min(max);
        self.max_version = min.max(max);
        self
    }
}

impl SymbolGenerator for QrGenerator {
    type Error = GeneratorError;

    fn generate(&self, payload: &str, level: CorrectionLevel) -> Result<RawRaster, Self::Error> {
        let qr = QrCode::encode_segments(
            &Segment::for_text(payload),
            level,
            self.min_version,
            self.max_version,
            None,
            self.boost_level,
        )?;
        let raster = render_raster(&qr)?;
        tracing::debug!(
            payload_len = payload.len(),
            %level,
            version = qr.version().value(),
            mask = qr.mask().value(),
            side = raster.width(),
            "rendered symbol"
        );
        Ok(raster)
    }
}

/// Renders `qr` at one pixel per module with a [`QUIET_ZONE`] light border.
pub fn render_raster(qr: &QrCode) -> Result<RawRaster, GeneratorError> {
    let side = qr.size() as u32 + 2 * QUIET_ZONE;
    let border = QUIET_ZONE as i32;
    let mut pixels = Vec::with_capacity((side * side * 4) as usize);
    for y in 0..side as i32 {
        for x in 0..side as i32 {
            let dark = qr.get_module(x - border, y - border);
            pixels.extend_from_slice(if dark { &DARK } else { &LIGHT });
        }
    }
    ImageBuffer::from_raw(side, side, pixels).ok_or(GeneratorError::PixelBuffer {
        width: side,
        height: side,
    })
}
