//! Small top-down PNG thumbnails for snapshot listings.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use crate::persistence::SnapshotError;
use crate::render::compositor::{LayerVisibility, NEUTRAL_GRAY, compose_state};
use crate::world::grid::Grid;
use crate::world::tile::TileCoord;

pub const PREVIEW_PREFIX: &str = "data:image/png;base64,";

/// Render one `scale`×`scale` pixel block per tile. Column = grid x, row =
/// grid y, so the image matches the top-down camera.
///
/// Fails when the image size for `scale` does not fit in memory addressing.
pub fn render_image(
    grid: &Grid,
    visibility: LayerVisibility,
    scale: u32,
) -> Result<RgbImage, SnapshotError> {
    let config = grid.config();
    let scale = scale.max(1);
    let (hw, hh) = (config.half_width(), config.half_height());
    let too_large = || SnapshotError::Preview(format!("image too large at scale {}", scale));
    let width = scaled_extent(config.columns(), scale).ok_or_else(too_large)?;
    let height = scaled_extent(config.rows(), scale).ok_or_else(too_large)?;
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(too_large)?;

    Ok(ImageBuffer::from_fn(width, height, |px, py| {
        let x = (px / scale) as i32 - hw;
        let y = (py / scale) as i32 - hh;
        let color = grid
            .index_of(TileCoord::new(x, y))
            .map(|index| compose_state(grid.state(index), visibility))
            .unwrap_or(NEUTRAL_GRAY);
        Rgb(color.to_rgb8())
    }))
}

fn scaled_extent(tiles: usize, scale: u32) -> Option<u32> {
    u32::try_from(tiles).ok()?.checked_mul(scale)
}

/// PNG preview encoded as a `data:` URL, ready for the snapshot `preview`
/// field.
pub fn render_preview(
    grid: &Grid,
    visibility: LayerVisibility,
    scale: u32,
) -> Result<String, SnapshotError> {
    let img = render_image(grid, visibility, scale)?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| SnapshotError::Preview(e.to_string()))?;
    Ok(format!("{}{}", PREVIEW_PREFIX, STANDARD.encode(&bytes)))
}

/// Decode a `data:` URL produced by [`render_preview`] back to PNG bytes.
pub fn decode_preview(data_url: &str) -> Result<Vec<u8>, SnapshotError> {
    let encoded = data_url
        .strip_prefix(PREVIEW_PREFIX)
        .ok_or_else(|| SnapshotError::Preview("not a PNG data URL".to_string()))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| SnapshotError::Preview(e.to_string()))
}
