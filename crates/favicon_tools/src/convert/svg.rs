//! Raster-in-SVG embedding

use base64::{engine::general_purpose, Engine as _};
use tracing::debug;

/// Wrap a PNG in a square SVG document.
///
/// The canvas edge is `max(width, height)`; the image keeps its own size and
/// is centered with truncating offsets.
pub fn embed_png_in_svg(png: &[u8], width: u32, height: u32) -> String {
    debug!(width, height, bytes = png.len(), "svg.embed_png");

    let size = width.max(height);
    let x = (size - width) / 2;
    let y = (size - height) / 2;
    let data_uri = format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png)
    );

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
            r#"width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
            "\n",
            r#"  <image x="{x}" y="{y}" width="{width}" height="{height}" href="{uri}" xlink:href="{uri}"/>"#,
            "\n</svg>\n"
        ),
        size = size,
        x = x,
        y = y,
        width = width,
        height = height,
        uri = data_uri,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use resvg::usvg::{Options, Tree};

    #[test]
    fn test_embed_square() {
        let png = png_rgba_16x16();
        let svg = embed_png_in_svg(&png, 16, 16);

        assert!(svg.contains(r#"width="16" height="16" viewBox="0 0 16 16""#));
        assert!(svg.contains(r#"x="0" y="0""#));
        let encoded = general_purpose::STANDARD.encode(&png);
        assert!(svg.contains(&format!(r#"xlink:href="data:image/png;base64,{}""#, encoded)));
    }

    #[test]
    fn test_embed_centers_non_square() {
        let svg = embed_png_in_svg(&png_rgba_800x400(), 800, 401);
        assert!(svg.contains(r#"viewBox="0 0 800 800""#));
        assert!(svg.contains(r#"x="0" y="199" width="800" height="401""#));
    }

    #[test]
    fn test_embedded_svg_parses() {
        let svg = embed_png_in_svg(&png_rgba_64x64(), 64, 64);
        let tree = Tree::from_str(&svg, &Options::default()).unwrap();
        assert_eq!(tree.size.width(), 64.0);
    }
}
