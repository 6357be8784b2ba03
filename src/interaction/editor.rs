use glam::{Vec2, Vec3};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::editor::EditorConfig;
use crate::config::grid::GridConfig;
use crate::interaction::camera::OrthoCamera;
use crate::interaction::events::{
    ContextMenuRequest, EditorEvent, EventBus, HostEvent, Mode, PointerButton, TileInfo,
};
use crate::interaction::input::{InputState, Viewport};
use crate::interaction::ray::{DrawableId, Raycast, intersect_objects};
use crate::persistence::snapshot::{self, RestoreReport, Snapshot, SnapshotDraft};
use crate::render::compositor::{HOVER_HIGHLIGHT, LayerVisibility};
use crate::render::{NullBackend, RenderBackend, TileBatch};
use crate::world::brush::{Brush, ResourceTool};
use crate::world::generation::{self, Seed};
use crate::world::grid::Grid;
use crate::world::tile::{Biome, Layer, Terrain};

/// Drawable id the tile batch is registered under for hit-testing.
pub const GRID_DRAWABLE: DrawableId = DrawableId(1);

/// Live grid plus the instanced batch that displays it.
struct Scene {
    grid: Grid,
    batch: TileBatch,
}

/// The editing session: owns the grid, its display batch, the camera and all
/// per-session UI parameters, and turns host events into mutations and
/// published [`EditorEvent`]s.
///
/// Every operation is a no-op until [`Editor::build_grid`] or
/// [`Editor::restore`] has produced a grid.
pub struct Editor {
    config: EditorConfig,
    backend: Box<dyn RenderBackend>,
    scene: Option<Scene>,
    camera: OrthoCamera,
    input: InputState,
    viewport: Viewport,
    mode: Mode,
    brush: Brush,
    visibility: LayerVisibility,
    seed: Option<Seed>,
    world_name: Option<String>,
    bus: EventBus,
    hovered: Option<usize>,
    selected: Option<usize>,
    context_menu_open: bool,
    painting: bool,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_backend(config, Box::new(NullBackend))
    }

    pub fn with_backend(config: EditorConfig, backend: Box<dyn RenderBackend>) -> Self {
        let camera = OrthoCamera::new(
            config.view_height,
            config.camera_height,
            config.initial_zoom,
            config.min_zoom,
            config.max_zoom,
        );
        let bus = EventBus::new(config.event_capacity);
        Editor {
            config,
            backend,
            scene: None,
            camera,
            input: InputState::new(),
            viewport: Viewport::default(),
            mode: Mode::default(),
            brush: Brush::default(),
            visibility: LayerVisibility::default(),
            seed: None,
            world_name: None,
            bus,
            hovered: None,
            selected: None,
            context_menu_open: false,
            painting: false,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.bus.subscribe()
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.scene.as_ref().map(|s| &s.grid)
    }

    pub fn batch(&self) -> Option<&TileBatch> {
        self.scene.as_ref().map(|s| &s.batch)
    }

    pub fn camera(&self) -> &OrthoCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn visibility(&self) -> LayerVisibility {
        self.visibility
    }

    pub fn seed(&self) -> Option<&Seed> {
        self.seed.as_ref()
    }

    pub fn world_name(&self) -> Option<&str> {
        self.world_name.as_deref()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub fn is_context_menu_open(&self) -> bool {
        self.context_menu_open
    }

    // -- Grid lifecycle ---------------------------------------------------

    /// Replace the grid wholesale. The previous batch is released on the
    /// backend before the new one is allocated.
    pub fn build_grid(&mut self, config: GridConfig) {
        let seed = self.seed.as_ref().map(Seed::state);
        let grid = Grid::build(config, seed);
        self.install(grid);
        info!(
            tiles = self.grid().map_or(0, Grid::tile_count),
            seeded = seed.is_some(),
            "Built grid"
        );
    }

    /// Release render resources and drop the grid. Safe to call repeatedly.
    /// Any hover, selection or open context menu is cleared and announced.
    pub fn dispose(&mut self) {
        if let Some(scene) = self.scene.take() {
            if scene.batch.outlined().is_some() {
                self.backend.set_outline(None);
            }
            self.backend.release_batch();
            debug!("Disposed grid");
        }
        if self.hovered.take().is_some() {
            self.bus.publish(EditorEvent::HoverCleared);
        }
        if self.selected.take().is_some() {
            self.bus.publish(EditorEvent::SelectionCleared);
        }
        self.painting = false;
        self.close_context_menu();
    }

    fn install(&mut self, grid: Grid) {
        self.dispose();
        let batch = TileBatch::new(&grid, self.visibility);
        self.backend
            .allocate_batch(batch.instance_count(), batch.translation_bytes());
        let tile_count = grid.tile_count();
        self.scene = Some(Scene { grid, batch });
        self.bus.publish(EditorEvent::GridBuilt { tile_count });
    }

    // -- Generation -------------------------------------------------------

    /// Set or clear the seed. The live grid's generator is reseeded so the
    /// next [`Editor::randomize`] starts from the new stream.
    pub fn set_seed(&mut self, seed: Option<Seed>) {
        let state = seed.as_ref().map(Seed::state);
        self.seed = seed;
        if let Some(scene) = self.scene.as_mut() {
            scene.grid.reseed(state);
        }
        debug!(seed = ?state, "Seed changed");
    }

    /// Seed from raw user input. Blank input clears the seed.
    pub fn set_seed_input(&mut self, input: &str) {
        self.set_seed(Seed::parse(input));
    }

    pub fn randomize(&mut self) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        generation::randomize(&mut scene.grid);
        scene.batch.recompute_all(&scene.grid, self.visibility);
    }

    // -- Painting ---------------------------------------------------------

    /// Paint the brush around `center` and recompute touched tiles. Returns
    /// the touched indices.
    pub fn apply_paint(&mut self, center: usize) -> Vec<usize> {
        let Some(scene) = self.scene.as_mut() else {
            return Vec::new();
        };
        let touched = self.brush.apply(&mut scene.grid, center);
        scene.batch.recompute_many(&scene.grid, &touched, self.visibility);
        touched
    }

    pub fn set_brush_radius(&mut self, radius: u32) {
        self.brush.radius = radius;
    }

    pub fn set_active_layer(&mut self, layer: Layer) {
        self.brush.active_layer = layer;
    }

    pub fn set_terrain_tool(&mut self, tool: Terrain) {
        self.brush.terrain_tool = tool;
    }

    pub fn set_biome_tool(&mut self, tool: Biome) {
        self.brush.biome_tool = tool;
    }

    pub fn set_resource_tool(&mut self, tool: ResourceTool) {
        self.brush.resource_tool = tool;
    }

    pub fn set_visibility(&mut self, visibility: LayerVisibility) {
        self.visibility = visibility;
        if let Some(scene) = self.scene.as_mut() {
            scene.batch.recompute_all(&scene.grid, visibility);
        }
    }

    // -- Mode -------------------------------------------------------------

    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.painting = false;
        if mode == Mode::Edit {
            self.close_context_menu();
        }
        self.bus.publish(EditorEvent::ModeChanged { mode });
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    pub fn close_context_menu(&mut self) {
        if self.context_menu_open {
            self.context_menu_open = false;
            self.bus.publish(EditorEvent::ContextMenuClosed);
        }
    }

    // -- Snapshots --------------------------------------------------------

    pub fn snapshot(&self, name: &str) -> Option<SnapshotDraft> {
        self.grid().map(|grid| snapshot::capture(grid, name))
    }

    /// Rebuild the grid from a stored snapshot and apply its tile data.
    pub fn restore(&mut self, name: &str, payload: &Snapshot) -> RestoreReport {
        let seed = self.seed.as_ref().map(Seed::state);
        let (grid, report) = snapshot::restore_grid(payload, seed);
        self.install(grid);
        self.world_name = Some(name.to_string());
        info!(
            name,
            format = ?report.format,
            applied = report.applied,
            skipped = report.skipped,
            "Restored snapshot"
        );
        report
    }

    // -- Hit testing ------------------------------------------------------

    /// Tile under a pointer position in CSS pixels.
    pub fn pick(&self, position: Vec2) -> Option<usize> {
        let scene = self.scene.as_ref()?;
        let ray = self.camera.ray_from_ndc(self.viewport.to_ndc(position));
        let objects: [(DrawableId, &dyn Raycast); 1] = [(GRID_DRAWABLE, &scene.batch)];
        intersect_objects(&ray, &objects)
            .into_iter()
            .find(|(id, _)| *id == GRID_DRAWABLE)
            .and_then(|(_, hit)| hit.instance)
    }

    /// CSS-pixel position of a world point, the inverse of picking.
    pub fn world_to_screen(&self, point: Vec3) -> Vec2 {
        let ndc = self.camera.view_projection().project_point3(point);
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.width,
            (1.0 - ndc.y) * 0.5 * self.viewport.height,
        )
    }

    pub fn tile_info(&self, index: usize) -> Option<TileInfo> {
        let grid = self.grid()?;
        let coord = grid.coord_of(index)?;
        Some(TileInfo {
            index,
            coord,
            state: grid.state(index),
        })
    }

    // -- Event dispatch ---------------------------------------------------

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::PointerMove { position } => self.on_pointer_move(position),
            HostEvent::PointerDown {
                button: PointerButton::Primary,
                position,
            } => self.on_primary_down(position),
            HostEvent::PointerUp {
                button: PointerButton::Primary,
                ..
            } => self.painting = false,
            HostEvent::PointerDown { .. } | HostEvent::PointerUp { .. } => {}
            HostEvent::ContextMenu { position } => self.on_context_menu(position),
            HostEvent::Wheel { delta_y } => self.on_wheel(delta_y),
            HostEvent::KeyDown(key) => self.input.press(key),
            HostEvent::KeyUp(key) => self.input.release(&key),
            HostEvent::Resize {
                width,
                height,
                device_pixel_ratio,
            } => self.resize(width, height, device_pixel_ratio),
            HostEvent::Focus => self.input.set_focused(true),
            HostEvent::Blur => {
                self.input.set_focused(false);
                self.painting = false;
            }
            HostEvent::PointerEnter => self.input.set_pointer_over(true),
            HostEvent::PointerLeave => {
                self.input.set_pointer_over(false);
                self.painting = false;
                self.clear_hover();
            }
        }
    }

    fn on_pointer_move(&mut self, position: Vec2) {
        self.input.set_pointer_over(true);
        let hit = self.pick(position);
        if self.painting {
            if let Some(index) = hit {
                self.apply_paint(index);
            }
        }
        match hit {
            Some(index) => self.hover(index),
            None => self.clear_hover(),
        }
    }

    fn hover(&mut self, index: usize) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if self.hovered != Some(index) {
            scene.batch.set_highlight(index, HOVER_HIGHLIGHT);
            self.hovered = Some(index);
        }
        if let Some(info) = self.tile_info(index) {
            self.bus.publish(EditorEvent::Hover(info));
        }
    }

    fn clear_hover(&mut self) {
        if self.hovered.take().is_none() {
            return;
        }
        if let Some(scene) = self.scene.as_mut() {
            scene.batch.clear_highlight();
        }
        self.bus.publish(EditorEvent::HoverCleared);
    }

    fn on_primary_down(&mut self, position: Vec2) {
        if self.scene.is_none() {
            return;
        }
        let hit = self.pick(position);
        match self.mode {
            Mode::Edit => {
                self.painting = true;
                if let Some(index) = hit {
                    let touched = self.apply_paint(index);
                    debug!(index, touched = touched.len(), "Paint stroke started");
                }
            }
            Mode::View => match hit.and_then(|index| self.tile_info(index)) {
                Some(info) => self.select(info),
                None => self.clear_selection(),
            },
        }
    }

    fn select(&mut self, info: TileInfo) {
        if let Some(scene) = self.scene.as_mut() {
            scene.batch.set_outline(Some(info.index));
        }
        self.selected = Some(info.index);
        self.bus.publish(EditorEvent::Selection(info));
    }

    fn clear_selection(&mut self) {
        if self.selected.take().is_none() {
            return;
        }
        if let Some(scene) = self.scene.as_mut() {
            scene.batch.set_outline(None);
        }
        self.bus.publish(EditorEvent::SelectionCleared);
    }

    fn on_context_menu(&mut self, position: Vec2) {
        if self.mode != Mode::View {
            return;
        }
        let Some(info) = self.pick(position).and_then(|index| self.tile_info(index)) else {
            return;
        };
        self.context_menu_open = true;
        self.bus
            .publish(EditorEvent::ContextMenuRequested(ContextMenuRequest {
                index: info.index,
                coord: info.coord,
                screen: position.to_array(),
            }));
    }

    fn on_wheel(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.camera.zoom_by(1.0 / self.config.zoom_step);
        } else if delta_y < 0.0 {
            self.camera.zoom_by(self.config.zoom_step);
        }
    }

    fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let dpr = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        self.viewport = Viewport {
            width,
            height,
            device_pixel_ratio: dpr,
        };
        self.camera.set_aspect(width, height);
        let (w, h) = self.viewport.physical_size();
        self.backend.resize(w, h);
    }

    // -- Frame ------------------------------------------------------------

    /// Per-frame update: continuous panning, then upload colors and the
    /// selection outline if they changed, then draw.
    pub fn tick(&mut self) {
        if self.input.is_active() {
            let movement = self.input.movement();
            if movement != Vec2::ZERO {
                let step = self.config.pan_speed / self.camera.zoom();
                self.camera.pan(movement * step);
            }
        }

        let view_projection = self.camera.view_projection();
        if let Some(scene) = self.scene.as_mut() {
            if let Some(colors) = scene.batch.take_upload() {
                self.backend.upload_colors(colors);
            }
            if let Some(center) = scene.batch.take_outline() {
                self.backend.set_outline(center);
            }
            self.backend.draw(view_projection);
        }
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::events::drain;
    use crate::world::tile::TileCoord;
    use glam::Mat4;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Allocate(usize),
        Release,
        Upload(usize),
        Outline(Option<[f32; 3]>),
        Resize(u32, u32),
        Draw,
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Call>>>);

    impl Recorder {
        fn calls(&self) -> Vec<Call> {
            self.0.lock().unwrap().clone()
        }

        fn clear(&self) {
            self.0.lock().unwrap().clear();
        }
    }

    impl RenderBackend for Recorder {
        fn allocate_batch(&mut self, instance_count: usize, _translations: &[u8]) {
            self.0.lock().unwrap().push(Call::Allocate(instance_count));
        }
        fn release_batch(&mut self) {
            self.0.lock().unwrap().push(Call::Release);
        }
        fn upload_colors(&mut self, colors: &[u8]) {
            self.0.lock().unwrap().push(Call::Upload(colors.len()));
        }
        fn set_outline(&mut self, center: Option<[f32; 3]>) {
            self.0.lock().unwrap().push(Call::Outline(center));
        }
        fn resize(&mut self, width: u32, height: u32) {
            self.0.lock().unwrap().push(Call::Resize(width, height));
        }
        fn draw(&mut self, _view_projection: Mat4) {
            self.0.lock().unwrap().push(Call::Draw);
        }
    }

    fn recorded_editor() -> (Editor, Recorder) {
        let recorder = Recorder::default();
        let editor = Editor::with_backend(EditorConfig::default(), Box::new(recorder.clone()));
        (editor, recorder)
    }

    #[test]
    fn operations_before_build_are_noops() {
        let (mut editor, recorder) = recorded_editor();
        editor.randomize();
        assert!(editor.apply_paint(0).is_empty());
        assert!(editor.snapshot("nothing").is_none());
        editor.dispose();
        editor.tick();
        editor.handle_event(HostEvent::PointerDown {
            button: PointerButton::Primary,
            position: Vec2::new(10.0, 10.0),
        });
        assert!(editor.grid().is_none());
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn rebuild_releases_before_allocating() {
        let (mut editor, recorder) = recorded_editor();
        editor.build_grid(GridConfig::new(1.0, 2, 2, 0.2));
        editor.build_grid(GridConfig::new(1.0, 4, 4, 0.2));
        assert_eq!(
            recorder.calls(),
            vec![Call::Allocate(9), Call::Release, Call::Allocate(25)]
        );
    }

    #[test]
    fn tick_uploads_only_when_dirty() {
        let (mut editor, recorder) = recorded_editor();
        editor.build_grid(GridConfig::new(1.0, 2, 2, 0.2));
        recorder.clear();

        editor.tick();
        editor.tick();
        assert_eq!(recorder.calls(), vec![Call::Upload(9 * 12), Call::Draw, Call::Draw]);

        recorder.clear();
        editor.apply_paint(4);
        editor.tick();
        assert_eq!(recorder.calls(), vec![Call::Upload(9 * 12), Call::Draw]);
    }

    fn view_editor() -> (Editor, Recorder) {
        let (mut editor, recorder) = recorded_editor();
        editor.handle_event(HostEvent::Resize {
            width: 400.0,
            height: 400.0,
            device_pixel_ratio: 1.0,
        });
        editor.build_grid(GridConfig::new(1.0, 4, 4, 0.2));
        editor.set_mode(Mode::View);
        editor.tick();
        recorder.clear();
        (editor, recorder)
    }

    fn click(editor: &mut Editor, position: Vec2) {
        editor.handle_event(HostEvent::PointerDown {
            button: PointerButton::Primary,
            position,
        });
    }

    #[test]
    fn selection_outline_reaches_backend_on_tick() {
        let (mut editor, recorder) = view_editor();
        let origin = editor.grid().unwrap().index_of(TileCoord::new(0, 0)).unwrap();
        let center = editor.grid().unwrap().world_position(origin).unwrap();

        click(&mut editor, Vec2::new(200.0, 200.0));
        assert_eq!(editor.selected(), Some(origin));
        assert_eq!(editor.batch().unwrap().outlined(), Some(origin));
        assert!(recorder.calls().is_empty());

        editor.tick();
        editor.tick();
        assert_eq!(
            recorder.calls(),
            vec![Call::Outline(Some(center.to_array())), Call::Draw, Call::Draw]
        );

        recorder.clear();
        click(&mut editor, Vec2::new(1.0, 1.0));
        editor.tick();
        assert_eq!(editor.batch().unwrap().outlined(), None);
        assert_eq!(recorder.calls(), vec![Call::Outline(None), Call::Draw]);
    }

    #[test]
    fn rebuild_hides_outline_and_announces_clears() {
        let (mut editor, recorder) = view_editor();
        let mut rx = editor.subscribe();
        let position = Vec2::new(200.0, 200.0);
        editor.handle_event(HostEvent::PointerMove { position });
        click(&mut editor, position);
        editor.handle_event(HostEvent::ContextMenu { position });
        editor.tick();
        drain(&mut rx);
        recorder.clear();

        editor.build_grid(GridConfig::new(1.0, 2, 2, 0.2));
        assert_eq!(
            recorder.calls(),
            vec![Call::Outline(None), Call::Release, Call::Allocate(9)]
        );
        assert_eq!(
            drain(&mut rx),
            vec![
                EditorEvent::HoverCleared,
                EditorEvent::SelectionCleared,
                EditorEvent::ContextMenuClosed,
                EditorEvent::GridBuilt { tile_count: 9 },
            ]
        );
        assert_eq!(editor.hovered(), None);
        assert_eq!(editor.selected(), None);
        assert!(!editor.is_context_menu_open());

        recorder.clear();
        editor.dispose();
        editor.dispose();
        assert_eq!(recorder.calls(), vec![Call::Release]);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn resize_reports_physical_pixels() {
        let (mut editor, recorder) = recorded_editor();
        editor.handle_event(HostEvent::Resize {
            width: 300.0,
            height: 150.0,
            device_pixel_ratio: 2.0,
        });
        assert_eq!(recorder.calls(), vec![Call::Resize(600, 300)]);
        assert_eq!(editor.camera().aspect, 2.0);

        editor.handle_event(HostEvent::Resize {
            width: 0.0,
            height: 150.0,
            device_pixel_ratio: 2.0,
        });
        assert_eq!(recorder.calls().len(), 1);
    }

    #[test]
    fn center_of_screen_picks_origin_tile() {
        let mut editor = Editor::new(EditorConfig::default());
        editor.handle_event(HostEvent::Resize {
            width: 800.0,
            height: 600.0,
            device_pixel_ratio: 1.0,
        });
        editor.build_grid(GridConfig::new(1.0, 6, 6, 0.2));
        let grid = editor.grid().unwrap();
        let origin = grid.index_of(TileCoord::new(0, 0)).unwrap();
        let east = grid.index_of(TileCoord::new(1, 0)).unwrap();
        let east_pos = grid.world_position(east).unwrap();

        assert_eq!(editor.pick(Vec2::new(400.0, 300.0)), Some(origin));
        let screen = editor.world_to_screen(east_pos + Vec3::Y * 0.2);
        assert_eq!(editor.pick(screen), Some(east));
    }

    #[test]
    fn wheel_zooms_within_limits() {
        let mut editor = Editor::new(EditorConfig::default());
        editor.handle_event(HostEvent::Wheel { delta_y: -1.0 });
        assert!((editor.camera().zoom() - 1.1).abs() < 1e-6);
        for _ in 0..200 {
            editor.handle_event(HostEvent::Wheel { delta_y: 1.0 });
        }
        assert_eq!(editor.camera().zoom(), 0.25);
    }

    #[test]
    fn switching_to_edit_closes_context_menu() {
        let mut editor = Editor::new(EditorConfig::default());
        editor.handle_event(HostEvent::Resize {
            width: 400.0,
            height: 400.0,
            device_pixel_ratio: 1.0,
        });
        editor.build_grid(GridConfig::new(1.0, 4, 4, 0.2));
        let mut rx = editor.subscribe();

        editor.set_mode(Mode::View);
        editor.handle_event(HostEvent::ContextMenu {
            position: Vec2::new(200.0, 200.0),
        });
        assert!(editor.is_context_menu_open());

        editor.toggle_mode();
        assert!(!editor.is_context_menu_open());
        let events = drain(&mut rx);
        assert!(matches!(events[0], EditorEvent::ModeChanged { mode: Mode::View }));
        assert!(matches!(events[1], EditorEvent::ContextMenuRequested(_)));
        assert_eq!(events[2], EditorEvent::ContextMenuClosed);
        assert_eq!(events[3], EditorEvent::ModeChanged { mode: Mode::Edit });
    }

    #[test]
    fn set_seed_reseeds_live_grid() {
        let config = GridConfig::new(1.0, 6, 6, 0.2);
        let mut a = Editor::new(EditorConfig::default());
        a.build_grid(config);
        a.set_seed(Some(Seed::Number(42)));
        a.randomize();

        let mut b = Editor::new(EditorConfig::default());
        b.set_seed_input("42");
        b.build_grid(config);
        b.randomize();

        let grid_a = a.grid().unwrap();
        let grid_b = b.grid().unwrap();
        for i in 0..grid_a.tile_count() {
            assert_eq!(grid_a.state(i), grid_b.state(i));
        }
    }
}
