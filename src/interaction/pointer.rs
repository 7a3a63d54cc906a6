use crate::core::CanvasPoint;

/// Outcome of releasing the mouse button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseRelease {
    /// No press was recorded (e.g. the press happened outside the canvas).
    None,
    Click { point: CanvasPoint },
    DragEnd { velocity_x: f64, velocity_y: f64 },
}

/// Mouse press/drag/click tracking.
///
/// Mouse drags start at half the touch swipe threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseTracker {
    press: Option<CanvasPoint>,
    dragging: bool,
    velocity: (f64, f64),
    drag_threshold_px: f64,
}

impl MouseTracker {
    #[must_use]
    pub fn new(swipe_threshold_px: f64) -> Self {
        Self {
            press: None,
            dragging: false,
            velocity: (0.0, 0.0),
            drag_threshold_px: swipe_threshold_px / 2.0,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn mouse_down(&mut self, point: CanvasPoint) {
        self.press = Some(point);
        self.dragging = false;
        self.velocity = (0.0, 0.0);
    }

    /// Returns the pan delta once the press has turned into a drag.
    pub fn mouse_move(&mut self, point: CanvasPoint) -> Option<(f64, f64)> {
        let press = self.press?;
        let dx = point.x - press.x;
        let dy = point.y - press.y;
        if !self.dragging && (dx.abs() > self.drag_threshold_px || dy.abs() > self.drag_threshold_px)
        {
            self.dragging = true;
        }
        if !self.dragging {
            return None;
        }
        self.press = Some(point);
        self.velocity = (dx, dy);
        Some((dx, dy))
    }

    pub fn mouse_up(&mut self, point: CanvasPoint) -> MouseRelease {
        let release = match (self.press, self.dragging) {
            (None, _) => MouseRelease::None,
            (Some(_), true) => MouseRelease::DragEnd {
                velocity_x: self.velocity.0,
                velocity_y: self.velocity.1,
            },
            (Some(_), false) => MouseRelease::Click { point },
        };
        self.press = None;
        self.dragging = false;
        release
    }
}

/// Wheel deltas below this magnitude mark the end of a scroll burst.
pub const WHEEL_SETTLED_DELTA: f64 = 2.0;

// Large trackpad deltas would otherwise produce a non-positive factor.
const MIN_WHEEL_ZOOM_FACTOR: f64 = 0.01;

/// Interpretation of one wheel event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelAction {
    /// Trackpad pinch (ctrl held): zoom about the pointer.
    Zoom { factor: f64, settled: bool },
    /// Plain scroll: screen-space pan delta.
    Pan { dx: f64, dy: f64, settled: bool },
}

impl WheelAction {
    #[must_use]
    pub fn settled(self) -> bool {
        match self {
            Self::Zoom { settled, .. } | Self::Pan { settled, .. } => settled,
        }
    }
}

#[must_use]
pub fn classify_wheel(delta_x: f64, delta_y: f64, ctrl_key: bool, sensitivity: f64) -> WheelAction {
    if ctrl_key {
        WheelAction::Zoom {
            factor: (1.0 - delta_y * sensitivity).max(MIN_WHEEL_ZOOM_FACTOR),
            settled: delta_y.abs() < WHEEL_SETTLED_DELTA,
        }
    } else {
        // Scrolling moves the content the opposite way of a drag.
        WheelAction::Pan {
            dx: -delta_x,
            dy: -delta_y,
            settled: delta_x.abs() < WHEEL_SETTLED_DELTA && delta_y.abs() < WHEEL_SETTLED_DELTA,
        }
    }
}
