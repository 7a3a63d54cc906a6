mod animation;
mod camera;
mod gesture;
mod kinetic;
mod pointer;

use serde::{Deserialize, Serialize};

pub use animation::{JumpAnimation, JumpFrame, ease_out_cubic};
pub use camera::CameraLimits;
pub use gesture::{GestureAction, GestureClass, GestureDisambiguator, GesturePhase};
pub use kinetic::{InertiaConfig, InertiaState};
pub use pointer::{MouseRelease, MouseTracker, WHEEL_SETTLED_DELTA, WheelAction, classify_wheel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
    Pinching,
    Inertia,
    Jumping,
}
