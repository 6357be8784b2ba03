use glam::Vec2;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::interaction::input::Key;
use crate::world::tile::{TileCoord, TileState};

/// Pointer buttons the host reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Raw input delivered by the hosting canvas. Pointer positions are CSS
/// pixels relative to the canvas' top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    PointerMove { position: Vec2 },
    PointerDown { button: PointerButton, position: Vec2 },
    PointerUp { button: PointerButton, position: Vec2 },
    PointerEnter,
    PointerLeave,
    ContextMenu { position: Vec2 },
    /// Positive `delta_y` scrolls away from the user (zoom out).
    Wheel { delta_y: f32 },
    KeyDown(Key),
    KeyUp(Key),
    Resize { width: f32, height: f32, device_pixel_ratio: f32 },
    Focus,
    Blur,
}

/// Editing vs. inspecting. Painting only happens in `Edit`; selection and
/// context menus only in `View`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    View,
    #[default]
    Edit,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::View => Mode::Edit,
            Mode::Edit => Mode::View,
        }
    }
}

/// Tile data attached to hover and selection events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileInfo {
    pub index: usize,
    pub coord: TileCoord,
    pub state: TileState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuRequest {
    pub index: usize,
    pub coord: TileCoord,
    /// Pointer position in CSS pixels.
    pub screen: [f32; 2],
}

/// Everything the editor publishes to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    Hover(TileInfo),
    HoverCleared,
    Selection(TileInfo),
    SelectionCleared,
    ContextMenuRequested(ContextMenuRequest),
    ContextMenuClosed,
    ModeChanged { mode: Mode },
    GridBuilt { tile_count: usize },
}

/// Fan-out of editor events. Every subscriber sees every event published
/// after it subscribed; publishing with no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn publish(&self, event: EditorEvent) {
        // No receivers is fine.
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        EventBus::new(256)
    }
}

/// Drain everything currently queued on a receiver. Lagged receivers skip
/// the overwritten events and keep going.
pub fn drain(receiver: &mut broadcast::Receiver<EditorEvent>) -> Vec<EditorEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    events
}
