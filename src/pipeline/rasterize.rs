use std::cell::RefCell;

use crate::error::RasterError;
use crate::types::chart::OutputConfig;

const FONT_FILES: [&str; 3] = [
    "./assets/fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

thread_local! {
    static FONTS: RefCell<Option<usvg::fontdb::Database>> = const { RefCell::new(None) };
}

/// Rasterises a chart SVG to PNG bytes at the output size.
pub fn rasterize(svg: &str, output: &OutputConfig) -> Result<Vec<u8>, RasterError> {
    FONTS.with(|cell| {
        let mut fonts = cell.borrow_mut();
        let fontdb = fonts.get_or_insert_with(chart_fonts);

        let tree = usvg::Tree::from_str(svg, &usvg::Options::default(), fontdb)
            .map_err(|e| RasterError::RenderFailed(format!("Failed to parse chart SVG: {}", e)))?;

        let mut pixmap = tiny_skia::Pixmap::new(output.width, output.height).ok_or_else(|| {
            RasterError::RenderFailed(format!(
                "Cannot allocate a {}x{} canvas",
                output.width, output.height
            ))
        })?;
        if let Some((r, g, b, a)) = output.background {
            pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        }

        let size = tree.size();
        let scale = tiny_skia::Transform::from_scale(
            output.width as f32 / size.width(),
            output.height as f32 / size.height(),
        );
        resvg::render(&tree, scale, &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| RasterError::RenderFailed(format!("Failed to encode PNG: {}", e)))
    })
}

fn chart_fonts() -> usvg::fontdb::Database {
    let mut fontdb = usvg::fontdb::Database::new();
    for path in FONT_FILES {
        if fontdb.load_font_file(path).is_ok() {
            tracing::debug!("Loaded chart font {}", path);
        }
    }
    fontdb.load_system_fonts();
    fontdb
}
