use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::CanvasPoint;

/// How a two-finger touch stream has been classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureClass {
    Unclassified,
    Pinch,
    Pan,
}

/// Externally visible phase of the touch state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GesturePhase {
    Idle,
    SingleTouch { dragging: bool },
    TwoTouch { class: GestureClass },
}

/// Camera-facing outcome of one touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    None,
    /// Screen-space pan delta.
    Pan { dx: f64, dy: f64 },
    /// Zoom about `center` by `distance_ratio` (current / previous distance).
    Pinch {
        center: CanvasPoint,
        distance_ratio: f64,
    },
    /// A released single touch that never dragged.
    Tap { point: CanvasPoint },
    /// A released drag, with the last per-move velocity for inertia.
    DragEnd { velocity_x: f64, velocity_y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TouchState {
    Idle,
    Single {
        anchor: CanvasPoint,
        last: CanvasPoint,
        dragging: bool,
        velocity: (f64, f64),
    },
    Double {
        initial_distance: f64,
        initial_center: CanvasPoint,
        last_distance: f64,
        last_center: CanvasPoint,
        class: GestureClass,
    },
}

/// Tells taps, drags, two-finger pans and pinches apart.
///
/// Two-finger streams are classified once, by comparing the accumulated
/// change in finger distance with the accumulated center movement, and keep
/// that class until every finger has lifted. Single-touch releases that land
/// inside the post-pinch cooldown are swallowed instead of reported as taps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDisambiguator {
    state: TouchState,
    swipe_threshold_px: f64,
    pinch_cooldown_ms: f64,
    last_pinch_end_ms: Option<f64>,
}

impl GestureDisambiguator {
    #[must_use]
    pub fn new(swipe_threshold_px: f64, pinch_cooldown_ms: f64) -> Self {
        Self {
            state: TouchState::Idle,
            swipe_threshold_px,
            pinch_cooldown_ms,
            last_pinch_end_ms: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match self.state {
            TouchState::Idle => GesturePhase::Idle,
            TouchState::Single { dragging, .. } => GesturePhase::SingleTouch { dragging },
            TouchState::Double { class, .. } => GesturePhase::TwoTouch { class },
        }
    }

    #[must_use]
    pub fn in_pinch_cooldown(&self, now_ms: f64) -> bool {
        self.last_pinch_end_ms
            .is_some_and(|ended| now_ms - ended < self.pinch_cooldown_ms)
    }

    /// Handles a touch-start with the full list of active touches.
    pub fn touch_start(&mut self, touches: &[CanvasPoint]) {
        match touches {
            [] => {}
            [first, second, ..] => {
                if matches!(self.state, TouchState::Double { .. }) {
                    return;
                }
                let distance = distance(*first, *second);
                let center = midpoint(*first, *second);
                trace!(distance, "two-touch gesture started");
                self.state = TouchState::Double {
                    initial_distance: distance,
                    initial_center: center,
                    last_distance: distance,
                    last_center: center,
                    class: GestureClass::Unclassified,
                };
            }
            [only] => {
                if matches!(self.state, TouchState::Double { .. }) {
                    return;
                }
                self.state = TouchState::Single {
                    anchor: *only,
                    last: *only,
                    dragging: false,
                    velocity: (0.0, 0.0),
                };
            }
        }
    }

    /// Handles a touch-move with the full list of active touches.
    pub fn touch_move(&mut self, touches: &[CanvasPoint]) -> GestureAction {
        match (&mut self.state, touches) {
            (
                TouchState::Double {
                    initial_distance,
                    initial_center,
                    last_distance,
                    last_center,
                    class,
                },
                [first, second, ..],
            ) => {
                let current_distance = distance(*first, *second);
                let current_center = midpoint(*first, *second);

                if *class == GestureClass::Unclassified {
                    *class = classify(
                        (current_distance - *initial_distance).abs(),
                        (current_center.x - initial_center.x).abs(),
                        (current_center.y - initial_center.y).abs(),
                    );
                    if *class != GestureClass::Unclassified {
                        debug!(class = ?*class, "two-touch gesture classified");
                    }
                }

                let action = match *class {
                    GestureClass::Unclassified => GestureAction::None,
                    GestureClass::Pinch if *last_distance > 0.0 => GestureAction::Pinch {
                        center: current_center,
                        distance_ratio: current_distance / *last_distance,
                    },
                    GestureClass::Pinch => GestureAction::None,
                    GestureClass::Pan => GestureAction::Pan {
                        dx: current_center.x - last_center.x,
                        dy: current_center.y - last_center.y,
                    },
                };
                *last_distance = current_distance;
                *last_center = current_center;
                action
            }
            (
                TouchState::Single {
                    anchor,
                    last,
                    dragging,
                    velocity,
                },
                [only],
            ) => {
                if !*dragging
                    && ((only.x - anchor.x).abs() > self.swipe_threshold_px
                        || (only.y - anchor.y).abs() > self.swipe_threshold_px)
                {
                    *dragging = true;
                }
                if !*dragging {
                    return GestureAction::None;
                }
                let dx = only.x - last.x;
                let dy = only.y - last.y;
                *last = *only;
                *velocity = (dx, dy);
                GestureAction::Pan { dx, dy }
            }
            _ => GestureAction::None,
        }
    }

    /// Handles a touch-end.
    ///
    /// `remaining` lists touches still down; `released` is where the lifted
    /// finger left the screen.
    pub fn touch_end(
        &mut self,
        remaining: &[CanvasPoint],
        released: CanvasPoint,
        now_ms: f64,
    ) -> GestureAction {
        match self.state {
            TouchState::Idle => GestureAction::None,
            TouchState::Double { class, .. } => {
                if !remaining.is_empty() {
                    return GestureAction::None;
                }
                if class == GestureClass::Pinch {
                    self.last_pinch_end_ms = Some(now_ms);
                }
                self.state = TouchState::Idle;
                GestureAction::None
            }
            TouchState::Single {
                dragging, velocity, ..
            } => {
                self.state = TouchState::Idle;
                if dragging {
                    return GestureAction::DragEnd {
                        velocity_x: velocity.0,
                        velocity_y: velocity.1,
                    };
                }
                if self.in_pinch_cooldown(now_ms) {
                    debug!(now_ms, "tap suppressed during pinch cooldown");
                    return GestureAction::None;
                }
                GestureAction::Tap { point: released }
            }
        }
    }

    /// Drops any in-progress gesture, e.g. on touch-cancel.
    pub fn cancel(&mut self) {
        self.state = TouchState::Idle;
    }
}

fn classify(pinch_delta: f64, move_delta_x: f64, move_delta_y: f64) -> GestureClass {
    if pinch_delta == 0.0 && move_delta_x == 0.0 && move_delta_y == 0.0 {
        return GestureClass::Unclassified;
    }
    if pinch_delta > move_delta_x && pinch_delta > move_delta_y {
        GestureClass::Pinch
    } else {
        GestureClass::Pan
    }
}

fn distance(a: CanvasPoint, b: CanvasPoint) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn midpoint(a: CanvasPoint, b: CanvasPoint) -> CanvasPoint {
    CanvasPoint::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stationary_fingers_stay_unclassified() {
        assert_eq!(classify(0.0, 0.0, 0.0), GestureClass::Unclassified);
    }

    #[test]
    fn distance_change_must_beat_both_axes() {
        assert_eq!(classify(10.0, 9.0, 11.0), GestureClass::Pan);
        assert_eq!(classify(10.0, 9.0, 9.0), GestureClass::Pinch);
    }
}
