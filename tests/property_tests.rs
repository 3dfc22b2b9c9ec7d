//! Property tests for the raster to module matrix extraction.
//!
//! Random module grids are rendered into rasters with a light 1-pixel border and fed straight
//! to the extractor, so every invariant is checked against a known ground truth.

use image::{Rgba, RgbaImage};
use proptest::prelude::*;
use qirust_modules::{construct, CorrectionLevel, ModuleExtractor};

const EPS: f64 = 1e-9;

// Strategy: a rows x columns grid of modules
fn arb_grid(max_side: usize) -> impl Strategy<Value = (usize, usize, Vec<bool>)> {
    (1..=max_side, 1..=max_side).prop_flat_map(|(rows, columns)| {
        prop::collection::vec(any::<bool>(), rows * columns)
            .prop_map(move |bits| (rows, columns, bits))
    })
}

// Strategy: a square grid, the shape real generators produce
fn arb_square_grid(max_side: usize) -> impl Strategy<Value = (usize, Vec<bool>)> {
    (1..=max_side).prop_flat_map(|side| {
        prop::collection::vec(any::<bool>(), side * side).prop_map(move |bits| (side, bits))
    })
}

fn arb_level() -> impl Strategy<Value = CorrectionLevel> {
    prop_oneof![
        Just(CorrectionLevel::Low),
        Just(CorrectionLevel::Medium),
        Just(CorrectionLevel::Quartile),
        Just(CorrectionLevel::High),
    ]
}

fn render(rows: usize, columns: usize, bits: &[bool]) -> RgbaImage {
    RgbaImage::from_fn(columns as u32 + 2, rows as u32 + 2, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let inside = (1..=columns).contains(&x) && (1..=rows).contains(&y);
        if inside && bits[(y - 1) * columns + (x - 1)] {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}

proptest! {
    /// Property: square rasters give square matrices two smaller than the raster
    #[test]
    fn proptest_matrix_size_tracks_raster((side, bits) in arb_square_grid(40), level in arb_level()) {
        let raster = render(side, side, &bits);
        let info = ModuleExtractor::new().extract(&raster, level).unwrap();

        prop_assert_eq!(info.rows(), info.columns());
        prop_assert_eq!(info.rows(), raster.height() as usize - 2);
        prop_assert_eq!(info.bits().len(), side * side);
        prop_assert_eq!(info.correction_level(), level);
    }

    /// Property: one path rectangle per dark module, none for light ones
    #[test]
    fn proptest_path_count_equals_dark_count((rows, columns, bits) in arb_grid(30)) {
        let info = ModuleExtractor::new()
            .extract(&render(rows, columns, &bits), CorrectionLevel::Medium)
            .unwrap();

        let expected = bits.iter().filter(|&&b| b).count();
        prop_assert_eq!(info.dark_count(), expected);
        prop_assert_eq!(info.path().len(), expected);
    }

    /// Property: get(r, c) reads raster pixel (c + 1, r + 1)
    #[test]
    fn proptest_index_maps_through_border((rows, columns, bits) in arb_grid(30)) {
        let raster = render(rows, columns, &bits);
        let info = ModuleExtractor::new().extract(&raster, CorrectionLevel::Low).unwrap();

        for r in 0..rows {
            for c in 0..columns {
                let dark = raster.get_pixel(c as u32 + 1, r as u32 + 1)[0] == 0;
                prop_assert_eq!(info.get(r, c), dark);
                prop_assert_eq!(info[(r, c)], bits[r * columns + c]);
            }
        }
    }

    /// Property: rectangles sit at (c / columns, r / rows), sized 1 / columns by 1 / rows,
    /// inside the unit square, in row-major order
    #[test]
    fn proptest_rects_are_normalized((rows, columns, bits) in arb_grid(120)) {
        let info = ModuleExtractor::new()
            .extract(&render(rows, columns, &bits), CorrectionLevel::High)
            .unwrap();

        let dark_cells = (0..rows * columns)
            .filter(|&i| bits[i])
            .map(|i| (i / columns, i % columns));
        for ((r, c), rect) in dark_cells.zip(info.path().iter()) {
            prop_assert!((rect.x - c as f64 / columns as f64).abs() < EPS);
            prop_assert!((rect.y - r as f64 / rows as f64).abs() < EPS);
            prop_assert!((rect.width() - 1.0 / columns as f64).abs() < EPS);
            prop_assert!((rect.height() - 1.0 / rows as f64).abs() < EPS);
            prop_assert!(rect.x >= 0.0 && rect.y >= 0.0);
            prop_assert!(rect.max_x() <= 1.0 && rect.max_y() <= 1.0);
        }
    }

    /// Property: the cropped image holds exactly the inner region of the raster
    #[test]
    fn proptest_crop_drops_only_the_border((rows, columns, bits) in arb_grid(20)) {
        let raster = render(rows, columns, &bits);
        let info = ModuleExtractor::new().extract(&raster, CorrectionLevel::Quartile).unwrap();

        prop_assert_eq!(info.image().dimensions(), (columns as u32, rows as u32));
        for (x, y, px) in info.image().enumerate_pixels() {
            prop_assert_eq!(px, raster.get_pixel(x + 1, y + 1));
        }
    }

    /// Property: real symbols satisfy the same invariants as synthetic grids
    #[test]
    fn proptest_generated_symbols(
        payload in prop::string::string_regex("[ -~]{1,60}").unwrap(),
        level in arb_level()
    ) {
        let info = construct(&payload, level).unwrap();

        prop_assert_eq!(info.rows(), info.columns());
        prop_assert_eq!((info.rows() - 17) % 4, 0);
        prop_assert_eq!(info.path().len(), info.dark_count());
        // Top-left finder pattern
        prop_assert!(info.get(0, 0));
        prop_assert!(!info.get(1, 1));
        prop_assert!(info.get(3, 3));
    }
}
