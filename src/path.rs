//! Resolution-independent outline of the dark modules.

use std::slice;

/// An axis-aligned rectangle in the normalized `[0, 1] x [0, 1]` space, stored by its corners.
///
/// `(x, y)` is the near corner and `(right, bottom)` the far one. Width and height are derived,
/// so adjacent cells share their edge coordinate bit for bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRect {
    pub x: f64,
    pub y: f64,
    pub right: f64,
    pub bottom: f64,
}

impl UnitRect {
    pub fn width(&self) -> f64 {
        self.right - self.x
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.y
    }

    pub fn max_x(&self) -> f64 {
        self.right
    }

    pub fn max_y(&self) -> f64 {
        self.bottom
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &UnitRect) -> UnitRect {
        UnitRect {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Maps the rectangle onto a `width x height` target, e.g. a canvas in pixels.
    pub fn scaled(&self, width: f64, height: f64) -> UnitRect {
        UnitRect {
            x: self.x * width,
            y: self.y * height,
            right: self.right * width,
            bottom: self.bottom * height,
        }
    }
}

/// Ordered list of unit rectangles, one per dark module, in row-major module order.
///
/// Each module `(row, column)` becomes the rectangle at `(column, row)` scaled by
/// `(1 / columns, 1 / rows)`, so the whole symbol spans the unit square no matter how many
/// modules it has.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPath {
    columns: u32,
    rows: u32,
    rects: Vec<UnitRect>,
}

impl VectorPath {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            rects: Vec::new(),
        }
    }

    /// Appends the 1x1 module cell at `(column, row)`, normalized into the unit square.
    ///
    /// Both corners come from grid lines, so the last cell ends exactly on 1.0.
    pub(crate) fn add_module(&mut self, column: u32, row: u32) {
        self.rects.push(UnitRect {
            x: grid_line(column, self.columns),
            y: grid_line(row, self.rows),
            right: grid_line(column + 1, self.columns),
            bottom: grid_line(row + 1, self.rows),
        });
    }

    pub fn rects(&self) -> &[UnitRect] {
        &self.rects
    }

    pub fn iter(&self) -> slice::Iter<'_, UnitRect> {
        self.rects.iter()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The `(x, y)` scale applied to module coordinates.
    pub fn scale(&self) -> (f64, f64) {
        (1.0 / f64::from(self.columns), 1.0 / f64::from(self.rows))
    }

    /// Bounding box of all rectangles, `None` for an empty path.
    pub fn bounds(&self) -> Option<UnitRect> {
        let mut iter = self.rects.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(r)))
    }

    /// SVG path data (`d` attribute) with one closed subpath per rectangle.
    pub fn to_svg_data(&self) -> String {
        let mut data = String::new();
        for (i, r) in self.rects.iter().enumerate() {
            if i != 0 {
                data.push(' ');
            }
            data += &format!(
                "M{},{}h{}v{}h{}z",
                r.x,
                r.y,
                r.width(),
                r.height(),
                -r.width()
            );
        }
        data
    }
}

/// Position of grid line `index` out of `count` cells, in `[0, 1]`.
fn grid_line(index: u32, count: u32) -> f64 {
    f64::from(index) / f64::from(count)
}

impl<'a> IntoIterator for &'a VectorPath {
    type Item = &'a UnitRect;
    type IntoIter = slice::Iter<'a, UnitRect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}
