//! Raster to module matrix extraction.
//!
//! [`ModuleExtractor`] chains the whole request: reject empty payloads, ask a
//! [`SymbolGenerator`] for a raster, then walk the raster once to build the module matrix and
//! the vector path together and crop away the quiet zone.

use image::imageops;
use image::{GenericImageView, Pixel, Rgba};

use crate::error::{Error, Result};
use crate::generator::{QrGenerator, RawRaster, SymbolGenerator, QUIET_ZONE};
use crate::modules::ModuleInfo;
use crate::path::VectorPath;
use crate::qrcode::CorrectionLevel;

/// Rule deciding whether a raster pixel is a dark module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DarkThreshold {
    /// Red channel is exactly 0. Only safe for strictly monochrome rasters.
    #[default]
    ExactBlack,
    /// Luminance strictly below the cutoff. For anti-aliased or grayscale generators.
    Luma(u8),
}

impl DarkThreshold {
    pub fn is_dark(&self, pixel: &Rgba<u8>) -> bool {
        match *self {
            DarkThreshold::ExactBlack => pixel[0] == 0,
            DarkThreshold::Luma(cutoff) => pixel.to_luma()[0] < cutoff,
        }
    }
}

/// Tunables for [`ModuleExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractorOptions {
    /// How dark pixels are recognised. Defaults to [`DarkThreshold::ExactBlack`].
    pub threshold: DarkThreshold,
    /// Reject rasters whose outer ring contains a dark pixel. Off by default: the 1-pixel quiet
    /// zone is otherwise assumed, not checked.
    pub verify_quiet_zone: bool,
}

/// Fails with [`Error::EmptyValue`] for a zero-length payload.
pub fn validate(payload: &str) -> Result<()> {
    if payload.is_empty() {
        return Err(Error::EmptyValue);
    }
    Ok(())
}

/// Builds a [`ModuleInfo`] for `payload` with the built-in generator and default options.
pub fn construct(payload: &str, level: CorrectionLevel) -> Result<ModuleInfo> {
    ModuleExtractor::new().construct(payload, level)
}

/// Validates payloads, drives a [`SymbolGenerator`] and extracts its rasters into
/// [`ModuleInfo`] values.
///
/// Holds no state between calls; one extractor can serve any number of requests.
#[derive(Debug, Clone, Default)]
pub struct ModuleExtractor<G = QrGenerator> {
    generator: G,
    options: ExtractorOptions,
}

impl ModuleExtractor<QrGenerator> {
    /// An extractor backed by the built-in [`QrGenerator`] with default options.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: SymbolGenerator> ModuleExtractor<G> {
    /// An extractor backed by `generator` with default options.
    pub fn with_generator(generator: G) -> Self {
        Self {
            generator,
            options: ExtractorOptions::default(),
        }
    }

    /// Replaces all options at once.
    pub fn options(mut self, options: ExtractorOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the rule deciding which pixels are dark modules.
    pub fn threshold(mut self, threshold: DarkThreshold) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Enables or disables the quiet-zone check on incoming rasters.
    pub fn verify_quiet_zone(mut self, verify: bool) -> Self {
        self.options.verify_quiet_zone = verify;
        self
    }

    /// The generator this extractor delegates to.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Validates `payload`, generates its raster and extracts it.
    ///
    /// The generator is not called for an empty payload. Any generator failure is reported as
    /// [`Error::PixelBufferUnavailable`] with the original error as its source.
    pub fn construct(&self, payload: &str, level: CorrectionLevel) -> Result<ModuleInfo> {
        validate(payload)?;
        let raster = self.generator.generate(payload, level).map_err(|e| {
            tracing::warn!(error = %e, %level, "symbol generator failed");
            Error::PixelBufferUnavailable(Box::new(e))
        })?;
        self.extract(&raster, level)
    }

    /// Extracts the module matrix, cropped image and vector path from an already generated
    /// raster. `level` is only recorded on the result.
    pub fn extract(&self, raster: &RawRaster, level: CorrectionLevel) -> Result<ModuleInfo> {
        let (width, height) = raster.dimensions();
        let border = 2 * QUIET_ZONE;
        let (columns, rows) = match (width.checked_sub(border), height.checked_sub(border)) {
            (Some(c), Some(r)) if c > 0 && r > 0 => (c, r),
            _ => {
                tracing::warn!(width, height, "raster too small to hold a module");
                return Err(Error::crop(width, height, "no module region inside the quiet zone"));
            }
        };

        if self.options.verify_quiet_zone && !self.quiet_zone_is_light(raster) {
            tracing::warn!(width, height, "dark pixel inside the quiet zone");
            return Err(Error::crop(width, height, "quiet zone contains dark pixels"));
        }

        let mut bits = vec![false; rows as usize * columns as usize].into_boxed_slice();
        let mut path = VectorPath::new(columns, rows);
        let mut index = 0;
        for y in QUIET_ZONE..QUIET_ZONE + rows {
            for x in QUIET_ZONE..QUIET_ZONE + columns {
                if self.options.threshold.is_dark(raster.get_pixel(x, y)) {
                    bits[index] = true;
                    path.add_module(x - QUIET_ZONE, y - QUIET_ZONE);
                }
                index += 1;
            }
        }
        debug_assert_eq!(index, bits.len());

        let image = crop_quiet_zone(raster, columns, rows)?;

        tracing::debug!(rows, columns, dark = path.len(), %level, "extracted module matrix");
        Ok(ModuleInfo::from_parts(
            rows as usize,
            columns as usize,
            level,
            bits,
            image,
            path,
        ))
    }

    fn quiet_zone_is_light(&self, raster: &RawRaster) -> bool {
        let (width, height) = raster.dimensions();
        let threshold = self.options.threshold;
        raster
            .enumerate_pixels()
            .filter(|&(x, y, _)| {
                x < QUIET_ZONE
                    || y < QUIET_ZONE
                    || x >= width - QUIET_ZONE
                    || y >= height - QUIET_ZONE
            })
            .all(|(_, _, px)| !threshold.is_dark(px))
    }
}

fn crop_quiet_zone(raster: &RawRaster, columns: u32, rows: u32) -> Result<RawRaster> {
    let view = imageops::crop_imm(raster, QUIET_ZONE, QUIET_ZONE, columns, rows);
    // crop_imm clamps instead of failing, so check what we actually got
    if view.dimensions() != (columns, rows) {
        let (width, height) = raster.dimensions();
        return Err(Error::crop(width, height, "inner region exceeds raster"));
    }
    Ok(view.to_image())
}
