pub mod batch;
pub mod compositor;

use glam::Mat4;

pub use batch::TileBatch;
pub use compositor::{Color, LayerVisibility, compose, compose_state};

/// The display pipeline the editor drives. Implementations own whatever GPU
/// resources back the tile batch.
///
/// The editor guarantees `release_batch` is called before a replacement
/// batch is allocated, and that colors and the outline are only uploaded
/// from `tick`, except that a shown outline is hidden before release.
pub trait RenderBackend {
    /// Create instance storage for `instance_count` tiles. `translations` is
    /// tightly packed `[f32; 3]` per instance.
    fn allocate_batch(&mut self, instance_count: usize, translations: &[u8]);

    fn release_batch(&mut self);

    /// Replace the per-instance color buffer (`[f32; 3]` per instance).
    fn upload_colors(&mut self, colors: &[u8]);

    /// Show the selection outline around the tile centered at `center`, or
    /// hide it.
    fn set_outline(&mut self, center: Option<[f32; 3]>);

    /// Physical pixel size of the drawing surface changed.
    fn resize(&mut self, width: u32, height: u32);

    fn draw(&mut self, view_projection: Mat4);
}

/// Backend that discards everything. Used when running headless.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl RenderBackend for NullBackend {
    fn allocate_batch(&mut self, _instance_count: usize, _translations: &[u8]) {}
    fn release_batch(&mut self) {}
    fn upload_colors(&mut self, _colors: &[u8]) {}
    fn set_outline(&mut self, _center: Option<[f32; 3]>) {}
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn draw(&mut self, _view_projection: Mat4) {}
}
