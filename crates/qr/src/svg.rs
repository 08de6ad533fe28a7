//! SVG markup for a module matrix.

use std::fmt::Write;

/// Standalone SVG: dark modules as one path on a white square.
///
/// `modules` is row-major, `width` modules per side. The viewBox is in module
/// units including the quiet zone; `size` sets the pixel width and height.
pub(crate) fn render(modules: &[bool], width: usize, quiet_zone: usize, size: u32) -> String {
    let side = width + 2 * quiet_zone;
    let mut path = String::new();

    for (i, _) in modules.iter().enumerate().filter(|(_, dark)| **dark) {
        let x = i % width + quiet_zone;
        let y = i / width + quiet_zone;
        // Writing into a String cannot fail
        let _ = write!(path, "M{x} {y}h1v1h-1z");
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "\n",
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{size}" height="{size}" viewBox="0 0 {side} {side}" shape-rendering="crispEdges">"#,
            r##"<rect width="{side}" height="{side}" fill="#FFFFFF"/>"##,
            r##"<path fill="#000000" d="{path}"/>"##,
            "</svg>\n"
        ),
        size = size,
        side = side,
        path = path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_module() {
        let svg = render(&[true, false, false, false], 2, 4, 220);
        assert!(svg.contains(r#"width="220" height="220""#));
        assert!(svg.contains(r#"viewBox="0 0 10 10""#));
        assert!(svg.contains(r#"d="M4 4h1v1h-1z""#));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_row_major_positions() {
        let svg = render(&[false, false, false, true], 2, 0, 10);
        assert!(svg.contains(r#"d="M1 1h1v1h-1z""#));
    }
}
