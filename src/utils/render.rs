use crate::core::{GridError, RenderFrame, Result};
use crate::solver::{PolicyTable, ValueTable};

/// Map every policy label to its display glyph.
pub fn arrows_from_policy(policy: &PolicyTable) -> Vec<Vec<char>> {
    policy.iter_rows().map(|row| row.iter().map(|l| l.glyph()).collect()).collect()
}

/// Policy glyphs, space separated, one grid row per line.
pub fn format_policy(policy: &PolicyTable) -> String {
    arrows_from_policy(policy)
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Values rounded to `decimals`, right-aligned in columns; walls shown as `##`.
pub fn format_values(values: &ValueTable, decimals: usize) -> String {
    let cells: Vec<Vec<String>> = values
        .iter_rows()
        .map(|row| {
            row.iter()
                .map(|v| match v {
                    Some(v) => format!("{:.*}", decimals, v),
                    None => "##".to_string(),
                })
                .collect()
        })
        .collect();
    let width = cells.iter().flatten().map(|s| s.chars().count()).max().unwrap_or(0);
    cells
        .iter()
        .map(|row| row.iter().map(|s| format!("{:>width$}", s, width = width)).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Encode a RenderFrame::Pixels to a PNG byte vector.
/// Requires the `image` feature; otherwise returns GridError::NotSupported.
pub fn encode_png(frame: &RenderFrame) -> Result<Vec<u8>> {
    match frame {
        RenderFrame::Pixels { width, height, data } => encode_pixels_png(*width, *height, data),
        RenderFrame::Text(_) => Err(GridError::NotSupported("Text frames cannot be encoded to PNG".into())),
    }
}

#[cfg(feature = "image")]
fn encode_pixels_png(width: u32, height: u32, data: &[u8]) -> Result<Vec<u8>> {
    use image::codecs::png::PngEncoder;
    use image::{ColorType, ImageEncoder};
    use std::io::Cursor;

    let count = (width as usize) * (height as usize);
    let color = if data.len() == count * 3 {
        ColorType::Rgb8
    } else if data.len() == count * 4 {
        ColorType::Rgba8
    } else {
        return Err(GridError::Other(format!(
            "Pixel data length {} does not match width*height*3 or *4 ({}x{})",
            data.len(), width, height
        )));
    };

    let mut buf = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buf);
        let encoder = PngEncoder::new(&mut cursor);
        encoder
            .write_image(data, width, height, color.into())
            .map_err(|e| GridError::Other(format!("PNG encode error: {}", e)))?;
    }
    Ok(buf)
}

#[cfg(not(feature = "image"))]
fn encode_pixels_png(_width: u32, _height: u32, _data: &[u8]) -> Result<Vec<u8>> {
    Err(GridError::NotSupported("PNG encoding requires the `image` feature".into()))
}

/// Save a RenderFrame::Pixels as a PNG file at the given path.
pub fn save_png<P: AsRef<std::path::Path>>(path: P, frame: &RenderFrame) -> Result<()> {
    let bytes = encode_png(frame)?;
    std::fs::write(path, bytes).map_err(|e| GridError::Other(format!("Failed to write PNG: {}", e)))
}
