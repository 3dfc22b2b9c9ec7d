/// QR code encoding functionality.
///
/// This module is the built-in symbol generator backend. It encodes text into a QR Code Model 2
/// symbol (versions 1–40, four correction levels, numeric / alphanumeric / byte segments) and
/// exposes the finished module grid. Nothing in the extraction path depends on it directly: it is
/// reached only through [`QrGenerator`](crate::generator::QrGenerator).
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// Instances are immutable after creation.
///
/// # Example
///
/// ```rust
/// use qirust_modules::qrcode::{CorrectionLevel, QrCode};
///
/// let qr = QrCode::encode_text("HELLO", CorrectionLevel::Medium).unwrap();
/// assert_eq!(qr.size(), 21);
/// assert!(qr.get_module(0, 0));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,
    size: i32,
    level: CorrectionLevel,
    mask: Mask,
    /// Row-major, `true` = dark.
    modules: Vec<bool>,
    /// Marks function modules (finders, timing, format...). Emptied once encoding finishes.
    function: Vec<bool>,
}

impl QrCode {
    /// Encodes a text string at the given correction level, choosing the smallest version that
    /// fits and the mask with the lowest penalty.
    pub fn encode_text(text: &str, level: CorrectionLevel) -> Result<Self, DataTooLong> {
        Self::encode_segments(
            &Segment::for_text(text),
            level,
            Version::MIN,
            Version::MAX,
            None,
            false,
        )
    }

    /// Encodes arbitrary bytes in byte mode.
    pub fn encode_binary(data: &[u8], level: CorrectionLevel) -> Result<Self, DataTooLong> {
        Self::encode_segments(
            &[Segment::bytes(data)],
            level,
            Version::MIN,
            Version::MAX,
            None,
            false,
        )
    }

    /// Encodes the given segments.
    ///
    /// The smallest version in `minversion..=maxversion` that holds the data is chosen. If
    /// `boost` is `true`, the correction level is raised as long as the version does not grow.
    /// `mask` can be `None` for automatic selection.
    ///
    /// # Panics
    ///
    /// Panics if `minversion > maxversion`.
    pub fn encode_segments(
        segs: &[Segment],
        mut level: CorrectionLevel,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boost: bool,
    ) -> Result<Self, DataTooLong> {
        assert!(minversion <= maxversion, "Invalid version range");

        let mut version = minversion;
        let used_bits = loop {
            let capacity_bits = num_data_codewords(version, level) * 8;
            let used = Segment::total_bits(segs, version);
            match used {
                Some(n) if n <= capacity_bits => break n,
                _ if version >= maxversion => {
                    return Err(match used {
                        None => DataTooLong::SegmentTooLong,
                        Some(n) => DataTooLong::DataOverCapacity(n, capacity_bits),
                    });
                }
                _ => version = Version::new(version.value() + 1),
            }
        };

        if boost {
            use CorrectionLevel::*;
            for candidate in [Medium, Quartile, High] {
                if used_bits <= num_data_codewords(version, candidate) * 8 {
                    level = candidate;
                }
            }
        }

        let capacity_bits = num_data_codewords(version, level) * 8;
        let mut bb = BitBuffer::default();
        for seg in segs {
            bb.append_bits(seg.mode.mode_bits(), 4);
            bb.append_bits(seg.num_chars as u32, seg.mode.num_char_count_bits(version));
            bb.bits.extend_from_slice(&seg.data);
        }
        debug_assert_eq!(bb.len(), used_bits);

        // Terminator, then zero-pad to a byte boundary
        let terminator = (capacity_bits - bb.len()).min(4);
        bb.append_bits(0, terminator as u8);
        let padding = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, padding as u8);
        debug_assert_eq!(bb.len() % 8, 0);

        for &pad_byte in [0xEC, 0x11].iter().cycle() {
            if bb.len() >= capacity_bits {
                break;
            }
            bb.append_bits(pad_byte, 8);
        }

        Ok(Self::encode_codewords(version, level, &bb.to_bytes(), mask))
    }

    /// Builds a symbol from already-padded data codewords.
    ///
    /// This is a low-level API; `data` must hold exactly the number of data codewords of
    /// `version` at `level`.
    pub fn encode_codewords(
        version: Version,
        level: CorrectionLevel,
        data: &[u8],
        mask: Option<Mask>,
    ) -> Self {
        let side = usize::from(version.size());
        let mut qr = Self {
            version,
            size: i32::from(version.size()),
            level,
            mask: Mask::new(0),
            modules: vec![false; side * side],
            function: vec![false; side * side],
        };
        qr.draw_function_patterns();
        let codewords = qr.add_ecc_and_interleave(data);
        qr.draw_codewords(&codewords);

        let mask = mask.unwrap_or_else(|| qr.select_mask());
        qr.apply_mask(mask);
        qr.draw_format_bits(mask);
        qr.mask = mask;
        qr.function = Vec::new();
        qr
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns the correction level actually used (may be higher than requested when boosting).
    pub fn correction_level(&self) -> CorrectionLevel {
        self.level
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns `true` for a dark module. Coordinates outside the symbol are light.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size;
        range.contains(&x) && range.contains(&y) && self.modules[self.index(x, y)]
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.size + x) as usize
    }

    fn set_function(&mut self, x: i32, y: i32, dark: bool) {
        let idx = self.index(x, y);
        self.modules[idx] = dark;
        self.function[idx] = true;
    }

    fn draw_function_patterns(&mut self) {
        let size = self.size;
        for i in 0..size {
            self.set_function(6, i, i % 2 == 0);
            self.set_function(i, 6, i % 2 == 0);
        }

        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        let positions = self.version.alignment_pattern_positions();
        let last = positions.len().saturating_sub(1);
        for (i, &px) in positions.iter().enumerate() {
            for (j, &py) in positions.iter().enumerate() {
                // The three corners are occupied by finder patterns
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                self.draw_alignment_pattern(px, py);
            }
        }

        // Reserve the format area; real bits are drawn after masking
        self.draw_format_bits(Mask::new(0));
        self.draw_version();
    }

    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let (xx, yy) = (x + dx, y + dy);
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist = dx.abs().max(dy.abs());
                    self.set_function(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    fn draw_format_bits(&mut self, mask: Mask) {
        let bits: u32 = {
            let data = (self.level.format_bits() << 3) | u32::from(mask.value());
            let mut rem = data;
            for _ in 0..10 {
                rem = (rem << 1) ^ ((rem >> 9) * 0x537);
            }
            ((data << 10) | rem) ^ 0x5412
        };

        // Copy next to the top-left finder
        for i in 0..6 {
            self.set_function(8, i, get_bit(bits, i));
        }
        self.set_function(8, 7, get_bit(bits, 6));
        self.set_function(8, 8, get_bit(bits, 7));
        self.set_function(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function(14 - i, 8, get_bit(bits, i));
        }

        // Split copy along the other two finders
        let size = self.size;
        for i in 0..8 {
            self.set_function(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function(8, size - 8, true);
    }

    fn draw_version(&mut self) {
        let ver = u32::from(self.version.value());
        if ver < 7 {
            return;
        }
        let bits: u32 = {
            let mut rem = ver;
            for _ in 0..12 {
                rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
            }
            (ver << 12) | rem
        };
        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.set_function(a, b, bit);
            self.set_function(b, a, bit);
        }
    }

    fn add_ecc_and_interleave(&self, data: &[u8]) -> Vec<u8> {
        let (ver, level) = (self.version, self.level);
        assert_eq!(data.len(), num_data_codewords(ver, level), "Illegal argument");

        let num_blocks = table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, level);
        let ecc_len = table_get(&ECC_CODEWORDS_PER_BLOCK, ver, level);
        let raw_codewords = num_raw_data_modules(ver) / 8;
        let num_short = num_blocks - raw_codewords % num_blocks;
        let short_len = raw_codewords / num_blocks;

        let rs = ReedSolomon::new(ecc_len);
        let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(num_blocks);
        let mut offset = 0;
        for i in 0..num_blocks {
            let data_len = short_len - ecc_len + usize::from(i >= num_short);
            let mut block = data[offset..offset + data_len].to_vec();
            offset += data_len;
            let ecc = rs.remainder(&block);
            if i < num_short {
                // Placeholder so every block has the same length; skipped below
                block.push(0);
            }
            block.extend_from_slice(&ecc);
            blocks.push(block);
        }

        let mut result = Vec::with_capacity(raw_codewords);
        for i in 0..=short_len {
            for (j, block) in blocks.iter().enumerate() {
                if i != short_len - ecc_len || j >= num_short {
                    result.push(block[i]);
                }
            }
        }
        debug_assert_eq!(result.len(), raw_codewords);
        result
    }

    fn draw_codewords(&mut self, data: &[u8]) {
        let size = self.size;
        let total_bits = data.len() * 8;
        let mut i: usize = 0;
        let mut right = size - 1;
        while right >= 1 {
            // Skip the vertical timing column
            if right == 6 {
                right = 5;
            }
            for vert in 0..size {
                for j in 0..2 {
                    let x = right - j;
                    let upward = ((right + 1) & 2) == 0;
                    let y = if upward { size - 1 - vert } else { vert };
                    let idx = self.index(x, y);
                    if !self.function[idx] && i < total_bits {
                        self.modules[idx] = get_bit(u32::from(data[i >> 3]), 7 - (i & 7) as i32);
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, total_bits);
    }

    /// XORs the mask into every non-function module; applying it twice undoes it.
    fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let idx = self.index(x, y);
                if self.function[idx] {
                    continue;
                }
                let invert = match mask.value() {
                    0 => (x + y) % 2 == 0,
                    1 => y % 2 == 0,
                    2 => x % 3 == 0,
                    3 => (x + y) % 3 == 0,
                    4 => (x / 3 + y / 2) % 2 == 0,
                    5 => (x * y) % 2 + (x * y) % 3 == 0,
                    6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
                    _ => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
                };
                self.modules[idx] ^= invert;
            }
        }
    }

    fn select_mask(&mut self) -> Mask {
        let mut best = Mask::new(0);
        let mut min_penalty = i32::MAX;
        for value in 0u8..8 {
            let mask = Mask::new(value);
            self.apply_mask(mask);
            self.draw_format_bits(mask);
            let penalty = self.penalty_score();
            if penalty < min_penalty {
                best = mask;
                min_penalty = penalty;
            }
            self.apply_mask(mask);
        }
        best
    }

    fn penalty_score(&self) -> i32 {
        let size = self.size;
        let mut result: i32 = 0;

        // Runs and finder-like patterns, rows then columns
        for horizontal in [true, false] {
            for a in 0..size {
                let mut run_color = false;
                let mut run_len: i32 = 0;
                let mut history = FinderPenalty::new(size);
                for b in 0..size {
                    let color = if horizontal {
                        self.get_module(b, a)
                    } else {
                        self.get_module(a, b)
                    };
                    if color == run_color {
                        run_len += 1;
                        if run_len == 5 {
                            result += PENALTY_N1;
                        } else if run_len > 5 {
                            result += 1;
                        }
                    } else {
                        history.add_history(run_len);
                        if !run_color {
                            result += history.count_patterns() * PENALTY_N3;
                        }
                        run_color = color;
                        run_len = 1;
                    }
                }
                result += history.terminate_and_count(run_color, run_len) * PENALTY_N3;
            }
        }

        // 2x2 blocks of one color
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color = self.get_module(x, y);
                if color == self.get_module(x + 1, y)
                    && color == self.get_module(x, y + 1)
                    && color == self.get_module(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        // Dark/light balance
        let dark = self.modules.iter().filter(|&&m| m).count() as i32;
        let total = size * size;
        let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result + k * PENALTY_N4
    }
}

fn num_raw_data_modules(ver: Version) -> usize {
    let ver = usize::from(ver.value());
    let mut result = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let num_align = ver / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    result
}

fn num_data_codewords(ver: Version, level: CorrectionLevel) -> usize {
    num_raw_data_modules(ver) / 8
        - table_get(&ECC_CODEWORDS_PER_BLOCK, ver, level)
            * table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, level)
}

fn table_get(table: &'static [[i8; 41]; 4], ver: Version, level: CorrectionLevel) -> usize {
    table[level.ordinal()][usize::from(ver.value())] as usize
}

fn get_bit(x: u32, i: i32) -> bool {
    ((x >> i) & 1) != 0
}

/// Reed-Solomon ECC generator over GF(2^8/0x11D).
struct ReedSolomon {
    divisor: Vec<u8>,
}

impl ReedSolomon {
    fn new(degree: usize) -> Self {
        assert!((1..=255).contains(&degree), "Degree out of range");
        let mut divisor = vec![0u8; degree - 1];
        divisor.push(1);
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = Self::multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = Self::multiply(root, 0x02);
        }
        Self { divisor }
    }

    fn remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for &b in data {
            let factor = b ^ result.remove(0);
            result.push(0);
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= Self::multiply(y, factor);
            }
        }
        result
    }

    fn multiply(x: u8, y: u8) -> u8 {
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1D);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }
}

struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut run_length: i32) {
        // Light border before the first run
        if self.run_history[0] == 0 {
            run_length += self.qr_size;
        }
        self.run_history.copy_within(0..6, 1);
        self.run_history[0] = run_length;
    }

    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, run_color: bool, mut run_length: i32) -> i32 {
        if run_color {
            self.add_history(run_length);
            run_length = 0;
        }
        run_length += self.qr_size;
        self.add_history(run_length);
        self.count_patterns()
    }
}

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Error correction level for a QR code.
///
/// Passed opaquely to the symbol generator; the extractor attaches no meaning to it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum CorrectionLevel {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    #[default]
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl CorrectionLevel {
    pub const ALL: [CorrectionLevel; 4] = [
        CorrectionLevel::Low,
        CorrectionLevel::Medium,
        CorrectionLevel::Quartile,
        CorrectionLevel::High,
    ];

    /// The conventional one-letter code: `L`, `M`, `Q` or `H`.
    pub fn as_str(self) -> &'static str {
        use CorrectionLevel::*;
        match self {
            Low => "L",
            Medium => "M",
            Quartile => "Q",
            High => "H",
        }
    }

    fn ordinal(self) -> usize {
        use CorrectionLevel::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    fn format_bits(self) -> u32 {
        use CorrectionLevel::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

impl fmt::Display for CorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no correction level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown correction level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for CorrectionLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use CorrectionLevel::*;
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Low),
            "m" | "medium" => Ok(Medium),
            "q" | "quartile" => Ok(Quartile),
            "h" | "high" => Ok(High),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// A segment of data in a QR code: numeric, alphanumeric or byte mode.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Segment {
    mode: SegmentMode,
    num_chars: usize,
    data: Vec<bool>,
}

impl Segment {
    /// Picks the densest single-segment encoding for `text`. Empty text yields no segments.
    pub fn for_text(text: &str) -> Vec<Segment> {
        if text.is_empty() {
            return Vec::new();
        }
        let seg = Segment::numeric(text)
            .or_else(|| Segment::alphanumeric(text))
            .unwrap_or_else(|| Segment::bytes(text.as_bytes()));
        vec![seg]
    }

    /// Byte mode segment.
    pub fn bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer::default();
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        Segment {
            mode: SegmentMode::Byte,
            num_chars: data.len(),
            data: bb.bits,
        }
    }

    /// Numeric mode segment, or `None` if `text` contains anything but `0`–`9`.
    pub fn numeric(text: &str) -> Option<Self> {
        let mut bb = BitBuffer::default();
        for chunk in text.as_bytes().chunks(3) {
            let mut value: u32 = 0;
            for &b in chunk {
                if !b.is_ascii_digit() {
                    return None;
                }
                value = value * 10 + u32::from(b - b'0');
            }
            bb.append_bits(value, chunk.len() as u8 * 3 + 1);
        }
        Some(Segment {
            mode: SegmentMode::Numeric,
            num_chars: text.len(),
            data: bb.bits,
        })
    }

    /// Alphanumeric mode segment, or `None` if `text` leaves the 45-character set.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    pub fn alphanumeric(text: &str) -> Option<Self> {
        let values = text
            .chars()
            .map(|c| ALPHANUMERIC_CHARSET.find(c).map(|i| i as u32))
            .collect::<Option<Vec<u32>>>()?;
        let mut bb = BitBuffer::default();
        for pair in values.chunks(2) {
            match *pair {
                [a, b] => bb.append_bits(a * 45 + b, 11),
                [a] => bb.append_bits(a, 6),
                _ => unreachable!(),
            }
        }
        Some(Segment {
            mode: SegmentMode::Alphanumeric,
            num_chars: values.len(),
            data: bb.bits,
        })
    }

    pub fn mode(&self) -> SegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.num_chars
    }

    /// Bits needed for all segments at `version`, or `None` if a character count overflows
    /// its length field.
    fn total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits = seg.mode.num_char_count_bits(version);
            if seg.num_chars >= 1usize << ccbits {
                return None;
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.data.len())?;
        }
        Some(result)
    }
}

static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl SegmentMode {
    fn mode_bits(self) -> u32 {
        use SegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
        }
    }

    fn num_char_count_bits(self, ver: Version) -> u8 {
        use SegmentMode::*;
        let widths = match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
        };
        widths[usize::from((ver.value() + 7) / 17)]
    }
}

#[derive(Default)]
struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    fn len(&self) -> usize {
        self.bits.len()
    }

    fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0, "Value out of range");
        self.bits.extend((0..len).rev().map(|i| ((val >> i) & 1) != 0));
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.bits.len().div_ceil(8)];
        for (i, &bit) in self.bits.iter().enumerate() {
            bytes[i >> 3] |= u8::from(bit) << (7 - (i & 7));
        }
        bytes
    }
}

/// Error type for when data exceeds QR code capacity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataTooLong {
    /// A segment is too long for its character count field.
    #[error("Segment too long")]
    SegmentTooLong,
    /// Data length exceeds capacity.
    #[error("Data length = {0} bits, Max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length in modules, `version * 4 + 17`.
    pub const fn size(self) -> u8 {
        self.0 * 4 + 17
    }

    fn alignment_pattern_positions(self) -> Vec<i32> {
        let ver = i32::from(self.0);
        if ver == 1 {
            return Vec::new();
        }
        let num_align = ver / 7 + 2;
        let step = if ver == 32 {
            26
        } else {
            (ver * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
        };
        let size = i32::from(self.size());
        let mut result: Vec<i32> = (0..num_align - 1).map(|i| size - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }
}
