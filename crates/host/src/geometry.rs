//! Viewport geometry for the floating tone menu.

pub const MENU_WIDTH: f64 = 160.0;
pub const DEFAULT_MENU_HEIGHT: f64 = 160.0;
pub const MENU_GAP: f64 = 8.0;
pub const MIN_LEFT: f64 = 8.0;

/// An element's bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuPosition {
    pub top: f64,
    pub left: f64,
}

/// Places the menu below the anchor with its right edge aligned to the
/// anchor's. Flips above when the bottom would overflow and clamps the left
/// edge to a small margin.
pub fn place_menu(anchor: Rect, menu_height: f64, viewport: Viewport) -> MenuPosition {
    let height = if menu_height > 0.0 {
        menu_height
    } else {
        DEFAULT_MENU_HEIGHT
    };

    let mut top = anchor.bottom() + MENU_GAP;
    let mut left = anchor.right() - MENU_WIDTH;

    if top + height > viewport.height {
        top = anchor.top - height - MENU_GAP;
    }

    if left < 0.0 {
        left = MIN_LEFT;
    }

    MenuPosition { top, left }
}
