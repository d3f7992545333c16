//! Pointer input as the document model sees it.
//!
//! Raw device events are translated by the host into `PointerEvent`s. The
//! model only looks at the button, the modifier flags and the position; the
//! host's canvas converts screen positions into document space.

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };
}

/// A point in screen or document space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }
}

/// Which pointer button an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Selects and drags.
    Primary,
    /// Opens the context menu.
    Secondary,
    Other(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Drag,
    Release,
}

/// A pointer event on empty canvas, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub button: PointerButton,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, button: PointerButton, position: Point) -> Self {
        Self {
            phase,
            button,
            position,
        }
    }

    pub fn press(position: Point) -> Self {
        Self::new(PointerPhase::Press, PointerButton::Primary, position)
    }

    pub fn drag(position: Point) -> Self {
        Self::new(PointerPhase::Drag, PointerButton::Primary, position)
    }

    pub fn release(position: Point) -> Self {
        Self::new(PointerPhase::Release, PointerButton::Primary, position)
    }
}

/// What the host should do after the model handled an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerResponse {
    /// The event was not for the model.
    Ignored,
    /// The model used the event; the host should not pass it on.
    Consumed,
    /// Open the graph context menu at this screen position.
    ContextMenu(Point),
}

/// Screen-to-document conversion provided by the host canvas.
pub trait Canvas {
    fn screen_to_document(&self, point: Point) -> Point;
}

/// A canvas whose screen and document spaces coincide.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCanvas;

impl Canvas for IdentityCanvas {
    fn screen_to_document(&self, point: Point) -> Point {
        point
    }
}

/// A panned and zoomed canvas: `document = (screen - pan) / zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub pan: Point,
    pub zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: Point::default(),
            zoom: 1.0,
        }
    }
}

impl Canvas for ViewTransform {
    fn screen_to_document(&self, point: Point) -> Point {
        let zoom = if self.zoom == 0.0 { 1.0 } else { self.zoom };
        Point::new((point.x - self.pan.x) / zoom, (point.y - self.pan.y) / zoom)
    }
}
