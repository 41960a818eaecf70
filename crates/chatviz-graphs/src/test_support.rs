//! Helpers shared by the render tests

use plotters::prelude::*;

/// Whether a system font can be resolved for text measurement.
///
/// Render tests return early without one, since headless CI images often
/// ship no fonts at all.
pub fn font_available() -> bool {
    let mut buffer = vec![0u8; 10 * 10 * 3];
    let root = BitMapBackend::with_buffer(&mut buffer, (10, 10)).into_drawing_area();
    let style = TextStyle::from(("sans-serif", 12).into_font());
    root.estimate_text_size("a", &style).is_ok()
}
