use std::cell::Cell;

use image::{Rgba, RgbaImage};
use qirust_modules::{
    construct, generator::QrGenerator, CorrectionLevel, Error, GeneratorError, ModuleExtractor,
    ModuleInfo, RawRaster, SymbolGenerator,
};

/// Delegates to the built-in generator and counts how often it is asked.
#[derive(Default)]
struct CountingGenerator {
    calls: Cell<usize>,
}

impl SymbolGenerator for CountingGenerator {
    type Error = GeneratorError;

    fn generate(&self, payload: &str, level: CorrectionLevel) -> Result<RawRaster, Self::Error> {
        self.calls.set(self.calls.get() + 1);
        QrGenerator::default().generate(payload, level)
    }
}

/// Always fails, like a renderer whose pixel storage cannot be read.
struct BrokenGenerator;

impl SymbolGenerator for BrokenGenerator {
    type Error = GeneratorError;

    fn generate(&self, _: &str, _: CorrectionLevel) -> Result<RawRaster, Self::Error> {
        Err(GeneratorError::PixelBuffer { width: 23, height: 23 })
    }
}

/// Returns a fixed raster regardless of input.
struct FixedGenerator(RgbaImage);

impl SymbolGenerator for FixedGenerator {
    type Error = std::convert::Infallible;

    fn generate(&self, _: &str, _: CorrectionLevel) -> Result<RawRaster, Self::Error> {
        Ok(self.0.clone())
    }
}

#[test]
fn hello_medium_is_a_version_one_symbol() {
    let info = construct("HELLO", CorrectionLevel::Medium).unwrap();
    assert_eq!(info.rows(), info.columns());
    assert_eq!(info.rows(), 21);
    // Finder pattern corner
    assert!(info.get(0, 0));
    assert!(info.get(0, 20));
    assert!(info.get(20, 0));
    assert_eq!(info.correction_level(), CorrectionLevel::Medium);
    assert_eq!(info.image().dimensions(), (21, 21));
}

#[test]
fn default_level_is_medium() {
    let info = ModuleInfo::new("HELLO").unwrap();
    let explicit = ModuleInfo::with_correction_level("HELLO", CorrectionLevel::Medium).unwrap();
    assert_eq!(info.correction_level(), CorrectionLevel::Medium);
    assert_eq!(info.bits(), explicit.bits());
}

#[test]
fn empty_payload_is_rejected_before_generation() {
    let extractor = ModuleExtractor::with_generator(CountingGenerator::default());
    let err = extractor.construct("", CorrectionLevel::High).unwrap_err();
    assert!(matches!(err, Error::EmptyValue));
    assert_eq!(extractor.generator().calls.get(), 0);

    extractor.construct("A", CorrectionLevel::High).unwrap();
    assert_eq!(extractor.generator().calls.get(), 1);
}

#[test]
fn empty_payload_via_free_function() {
    for level in CorrectionLevel::ALL {
        assert!(matches!(construct("", level), Err(Error::EmptyValue)));
    }
}

#[test]
fn same_input_gives_same_matrix() {
    for level in CorrectionLevel::ALL {
        let a = construct("https://example.com/qr?id=42", level).unwrap();
        let b = construct("https://example.com/qr?id=42", level).unwrap();
        assert_eq!(a.bits(), b.bits());
        assert_eq!(a.path(), b.path());
        assert_eq!(a.image(), b.image());
    }
}

#[test]
fn dimension_grows_with_payload() {
    let short = construct("A", CorrectionLevel::High).unwrap();
    let long = construct(&"The quick brown fox jumps over the lazy dog. ".repeat(4), CorrectionLevel::High)
        .unwrap();
    assert_eq!(short.rows(), 21);
    assert!(short.rows() < long.rows());
    assert_eq!((long.rows() - 17) % 4, 0);
}

#[test]
fn higher_level_never_shrinks_symbol() {
    let payload = "Hello, world! 0123456789";
    let sizes: Vec<usize> = CorrectionLevel::ALL
        .iter()
        .map(|&level| construct(payload, level).unwrap().rows())
        .collect();
    assert!(sizes.windows(2).all(|w| w[0] <= w[1]), "{sizes:?}");
}

#[test]
fn generator_failure_becomes_pixel_buffer_error() {
    let extractor = ModuleExtractor::with_generator(BrokenGenerator);
    let err = extractor.construct("HELLO", CorrectionLevel::Low).unwrap_err();
    assert!(matches!(err, Error::PixelBufferUnavailable(_)));
    assert_eq!(err.to_string(), "Failed to get pixel buffer.");
}

#[test]
fn oversized_payload_becomes_pixel_buffer_error() {
    let err = construct(&"x".repeat(4000), CorrectionLevel::Low).unwrap_err();
    match err {
        Error::PixelBufferUnavailable(source) => {
            assert!(source.to_string().contains("does not fit"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn degenerate_raster_is_a_crop_failure() {
    let raster = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
    let extractor = ModuleExtractor::with_generator(FixedGenerator(raster));
    let err = extractor.construct("anything", CorrectionLevel::Medium).unwrap_err();
    assert!(matches!(err, Error::CropFailure { width: 2, height: 2, .. }));
}

#[test]
fn cropped_image_matches_matrix() {
    let info = construct("Cropped image check", CorrectionLevel::Quartile).unwrap();
    let image = info.image();
    assert_eq!(image.dimensions(), (info.columns() as u32, info.rows() as u32));
    for row in 0..info.rows() {
        for column in 0..info.columns() {
            let px = image.get_pixel(column as u32, row as u32);
            assert_eq!(px[0] == 0, info.get(row, column));
        }
    }
}

#[test]
fn built_in_raster_passes_quiet_zone_check() {
    let extractor = ModuleExtractor::new().verify_quiet_zone(true);
    for level in CorrectionLevel::ALL {
        assert!(extractor.construct("quiet zone", level).is_ok());
    }
}

#[test]
fn path_spans_unit_square() {
    let info = construct("HELLO", CorrectionLevel::Medium).unwrap();
    let bounds = info.path().bounds().unwrap();
    // Finder patterns occupy three corners, so the outline touches every edge
    assert!(bounds.x.abs() < 1e-12);
    assert!(bounds.y.abs() < 1e-12);
    assert!((bounds.max_x() - 1.0).abs() < 1e-12);
    assert!((bounds.max_y() - 1.0).abs() < 1e-12);
}

#[test]
fn fully_dark_symbols_stay_inside_unit_square() {
    // Version 19 and 25 sizes, where summing origin and width rounds past 1.0
    for modules in [93u32, 117] {
        let raster = RgbaImage::from_fn(modules + 2, modules + 2, |x, y| {
            if x == 0 || y == 0 || x > modules || y > modules {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        let info = ModuleExtractor::new()
            .extract(&raster, CorrectionLevel::Medium)
            .unwrap();
        assert_eq!(info.path().len(), (modules * modules) as usize);
        for rect in info.path() {
            assert!(rect.max_x() <= 1.0 && rect.max_y() <= 1.0, "{modules}: {rect:?}");
        }
        let bounds = info.path().bounds().unwrap();
        assert_eq!((bounds.max_x(), bounds.max_y()), (1.0, 1.0));
    }
}
