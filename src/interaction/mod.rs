pub mod camera;
pub mod editor;
pub mod events;
pub mod input;
pub mod ray;

pub use camera::OrthoCamera;
pub use editor::{Editor, GRID_DRAWABLE};
pub use events::{
    ContextMenuRequest, EditorEvent, EventBus, HostEvent, Mode, PointerButton, TileInfo, drain,
};
pub use input::{InputState, Key, Viewport};
pub use ray::{DrawableId, HexPrism, Hit, Ray, Raycast, intersect_objects};
