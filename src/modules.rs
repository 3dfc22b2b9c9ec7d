use std::ops::Index;

use image::RgbaImage;

use crate::error::Result;
use crate::extract::ModuleExtractor;
use crate::path::VectorPath;
use crate::qrcode::CorrectionLevel;

/// The three views of one QR symbol: a boolean module matrix, the raster with its quiet zone
/// cropped off, and a normalized vector path of the dark modules.
///
/// Built in one pass by [`ModuleExtractor`]; never mutated afterwards.
///
/// # Example
///
/// ```rust
/// use qirust_modules::ModuleInfo;
///
/// let info = ModuleInfo::new("HELLO").unwrap();
/// assert_eq!((info.rows(), info.columns()), (21, 21));
/// assert!(info.get(0, 0));
/// assert_eq!(info.path().len(), info.dark_count());
/// ```
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    rows: usize,
    columns: usize,
    level: CorrectionLevel,
    bits: Box<[bool]>,
    image: RgbaImage,
    path: VectorPath,
}

impl ModuleInfo {
    /// Generates a symbol for `value` at [`CorrectionLevel::Medium`] and extracts it.
    pub fn new(value: &str) -> Result<Self> {
        Self::with_correction_level(value, CorrectionLevel::default())
    }

    /// Generates a symbol for `value` at `level` with the built-in generator and extracts it.
    pub fn with_correction_level(value: &str, level: CorrectionLevel) -> Result<Self> {
        ModuleExtractor::new().construct(value, level)
    }

    pub(crate) fn from_parts(
        rows: usize,
        columns: usize,
        level: CorrectionLevel,
        bits: Box<[bool]>,
        image: RgbaImage,
        path: VectorPath,
    ) -> Self {
        debug_assert_eq!(bits.len(), rows * columns);
        Self {
            rows,
            columns,
            level,
            bits,
            image,
            path,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The correction level the symbol was requested with.
    pub fn correction_level(&self) -> CorrectionLevel {
        self.level
    }

    /// Row-major module matrix, `true` = dark.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// The generator's raster with the quiet zone removed: `columns x rows` pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn path(&self) -> &VectorPath {
        &self.path
    }

    /// Whether the module at `(row, column)` is dark.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows` or `column >= columns`.
    pub fn get(&self, row: usize, column: usize) -> bool {
        assert!(
            row < self.rows && column < self.columns,
            "module ({row}, {column}) out of bounds for {}x{} matrix",
            self.rows,
            self.columns
        );
        self.bits[row * self.columns + column]
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

impl Index<(usize, usize)> for ModuleInfo {
    type Output = bool;

    fn index(&self, (row, column): (usize, usize)) -> &bool {
        assert!(
            row < self.rows && column < self.columns,
            "module ({row}, {column}) out of bounds for {}x{} matrix",
            self.rows,
            self.columns
        );
        &self.bits[row * self.columns + column]
    }
}
