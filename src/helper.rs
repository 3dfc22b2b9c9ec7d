use crate::modules::ModuleInfo;
use crate::path::VectorPath;

/*---- Utilities ----*/

// Returns a string of SVG code for an image depicting the given module
// matrix, with the given number of border modules, one unit per module.
// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(info: &ModuleInfo, border: usize) -> String {
    let width = info.columns() + border * 2;
    let height = info.rows() + border * 2;
    let mut result = svg_header(&format!("0 0 {width} {height}"));
    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..info.rows() {
        for x in 0..info.columns() {
            if info.get(y, x) {
                if !first {
                    result += " ";
                }
                first = false;
                result += &format!("M{},{}h1v1h-1z", x + border, y + border);
            }
        }
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    result
}

/// Returns an SVG document drawing the normalized vector path inside a `0 0 1 1` viewBox.
///
/// The document has no intrinsic size, so it scales to whatever box the consumer gives it.
///
/// # Example
///
/// ```rust
/// use qirust_modules::{helper::path_to_svg_string, ModuleInfo};
///
/// let info = ModuleInfo::new("HELLO").unwrap();
/// let svg = path_to_svg_string(info.path());
/// assert!(svg.contains("viewBox=\"0 0 1 1\""));
/// ```
pub fn path_to_svg_string(path: &VectorPath) -> String {
    let mut result = svg_header("0 0 1 1");
    result += &format!("\t<path d=\"{}\" fill=\"#000000\"/>\n", path.to_svg_data());
    result += "</svg>\n";
    result
}

fn svg_header(view_box: &str) -> String {
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"{view_box}\" stroke=\"none\">\n"
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result
}

/// Renders the module matrix as text, two characters per module, with `border` light
/// modules around it. Handy in test failures and debug logs.
pub fn to_text(info: &ModuleInfo, border: usize) -> String {
    let width = info.columns() + border * 2;
    let blank_row = format!("{}\n", " ".repeat(width * 2));
    let mut result = blank_row.repeat(border);
    for row in 0..info.rows() {
        result += &"  ".repeat(border);
        for column in 0..info.columns() {
            result += if info.get(row, column) { "██" } else { "  " };
        }
        result += &"  ".repeat(border);
        result.push('\n');
    }
    result += &blank_row.repeat(border);
    result
}
