use glam::Vec3;

use crate::interaction::ray::{HexPrism, Hit, Ray, Raycast};
use crate::render::compositor::{Color, LayerVisibility, compose_state};
use crate::world::grid::Grid;

/// One instanced drawable standing in for every tile of a grid.
///
/// Holds per-instance translations and the displayed color buffer. Colors
/// are derived from the grid through the compositor; `dirty` is raised by
/// every write and consumed by the render tick when it uploads. The
/// selection outline is tracked the same way with its own flag.
#[derive(Debug, Clone)]
pub struct TileBatch {
    translations: Vec<[f32; 3]>,
    composed: Vec<Color>,
    display: Vec<[f32; 3]>,
    highlight: Option<usize>,
    outline: Option<usize>,
    prism: HexPrism,
    dirty: bool,
    outline_dirty: bool,
}

impl TileBatch {
    /// Allocate a batch for `grid` with every color composed and the buffer
    /// marked dirty for the first upload.
    pub fn new(grid: &Grid, visibility: LayerVisibility) -> Self {
        let config = grid.config();
        let translations: Vec<[f32; 3]> = grid.positions().iter().map(|p| p.to_array()).collect();
        let count = translations.len();

        let mut batch = TileBatch {
            translations,
            composed: vec![Color::rgb(0.0, 0.0, 0.0); count],
            display: vec![[0.0; 3]; count],
            highlight: None,
            outline: None,
            prism: HexPrism::new(config.cell_radius, config.elevation),
            dirty: true,
            outline_dirty: false,
        };
        batch.recompute_all(grid, visibility);
        batch
    }

    pub fn instance_count(&self) -> usize {
        self.translations.len()
    }

    pub fn translations(&self) -> &[[f32; 3]] {
        &self.translations
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Composed (model-derived) color, ignoring any hover highlight.
    pub fn composed(&self, index: usize) -> Option<Color> {
        self.composed.get(index).copied()
    }

    /// Color currently in the display buffer.
    pub fn displayed(&self, index: usize) -> Option<Color> {
        self.display.get(index).map(|[r, g, b]| Color::rgb(*r, *g, *b))
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlight
    }

    pub fn recompute(&mut self, grid: &Grid, index: usize, visibility: LayerVisibility) {
        if index >= self.composed.len() {
            return;
        }
        let color = compose_state(grid.state(index), visibility);
        self.composed[index] = color;
        if self.highlight != Some(index) {
            self.display[index] = color.to_array();
        }
        self.dirty = true;
    }

    pub fn recompute_many(&mut self, grid: &Grid, indices: &[usize], visibility: LayerVisibility) {
        for &index in indices {
            self.recompute(grid, index, visibility);
        }
    }

    pub fn recompute_all(&mut self, grid: &Grid, visibility: LayerVisibility) {
        for index in 0..self.composed.len() {
            self.recompute(grid, index, visibility);
        }
    }

    /// Show `color` on one tile without touching its composed color. Any
    /// previous highlight is restored first.
    pub fn set_highlight(&mut self, index: usize, color: Color) {
        if index >= self.display.len() {
            return;
        }
        self.clear_highlight();
        self.highlight = Some(index);
        self.display[index] = color.to_array();
        self.dirty = true;
    }

    pub fn clear_highlight(&mut self) {
        if let Some(prev) = self.highlight.take() {
            self.display[prev] = self.composed[prev].to_array();
            self.dirty = true;
        }
    }

    pub fn outlined(&self) -> Option<usize> {
        self.outline
    }

    /// Outline one tile, or none. Out-of-range indices clear the outline.
    pub fn set_outline(&mut self, index: Option<usize>) {
        let index = index.filter(|&i| i < self.translations.len());
        if index != self.outline {
            self.outline = index;
            self.outline_dirty = true;
        }
    }

    /// Center of the outlined tile if the outline changed since the last
    /// call. The inner `None` means the outline was removed.
    pub fn take_outline(&mut self) -> Option<Option<[f32; 3]>> {
        if !self.outline_dirty {
            return None;
        }
        self.outline_dirty = false;
        Some(self.outline.map(|i| self.translations[i]))
    }

    /// Color buffer bytes if anything changed since the last call.
    pub fn take_upload(&mut self) -> Option<&[u8]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(bytemuck::cast_slice(&self.display))
    }

    pub fn translation_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.translations)
    }
}

impl Raycast for TileBatch {
    /// Every instance the ray passes through, nearest first.
    fn raycast(&self, ray: &Ray) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self
            .translations
            .iter()
            .enumerate()
            .filter_map(|(index, t)| {
                let center = Vec3::from_array(*t);
                self.prism.intersect(ray, center).map(|distance| Hit {
                    distance,
                    point: ray.at(distance),
                    instance: Some(index),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
