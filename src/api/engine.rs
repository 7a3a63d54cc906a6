use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{FetchRequest, FetchScheduler, PixelCache, SubscriptionSlot};
use crate::core::{CameraState, CanvasSize, Cell, ClientRect, Color, PixelRange, compute_visible_range};
use crate::error::CanvasResult;
use crate::extensions::CanvasListener;
use crate::interaction::{
    CameraLimits, GestureDisambiguator, InertiaState, InteractionMode, JumpAnimation, MouseTracker,
};
use crate::render::RenderDriver;
use crate::write::{PaintRequest, WriteCoordinator};

use super::{CameraPersistence, CanvasEngineConfig};

/// Remote work the host must carry out and report back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteCommand {
    /// Run `queryRange`; report with [`CanvasEngine::complete_fetch`].
    Fetch(FetchRequest),
    /// Run `submitPaint`; report with [`CanvasEngine::complete_paint`].
    Paint(PaintRequest),
}

/// Main orchestration facade consumed by host applications.
///
/// `CanvasEngine` is the explicitly constructed application state: it owns
/// the camera, input state machines, pixel cache, fetch scheduler, write
/// coordinator, push subscription and render driver. The host feeds it input
/// events and timestamps, drains [`RemoteCommand`]s, and reports remote
/// completions back.
pub struct CanvasEngine<R: RenderDriver> {
    pub(super) renderer: R,
    pub(super) config: CanvasEngineConfig,
    pub(super) canvas_size: CanvasSize,
    pub(super) client_rect: Option<ClientRect>,
    pub(super) limits: CameraLimits,
    pub(super) camera: CameraState,
    pub(super) mode: InteractionMode,
    pub(super) gesture: GestureDisambiguator,
    pub(super) mouse: MouseTracker,
    pub(super) inertia: InertiaState,
    pub(super) jump: Option<JumpAnimation>,
    pub(super) hover_cell: Option<Cell>,
    pub(super) cache: PixelCache,
    pub(super) fetch: FetchScheduler,
    pub(super) fetch_dirty: bool,
    pub(super) writes: WriteCoordinator,
    pub(super) subscription: SubscriptionSlot,
    pub(super) account: Option<String>,
    pub(super) paint_color: Color,
    pub(super) persistence: Option<Box<dyn CameraPersistence>>,
    pub(super) persist_pending: bool,
    pub(super) persist_due_ms: Option<f64>,
    pub(super) listeners: Vec<Box<dyn CanvasListener>>,
    pub(super) commands: Vec<RemoteCommand>,
}

impl<R: RenderDriver> CanvasEngine<R> {
    /// Creates an engine from a validated config.
    pub fn new(renderer: R, config: CanvasEngineConfig) -> CanvasResult<Self> {
        let config = config.validate()?;
        let limits = config.camera_limits;
        let camera = limits.clamp(config.initial_camera, config.canvas_size);
        debug!(?camera, canvas = ?config.canvas_size, "canvas engine created");

        Ok(Self {
            renderer,
            config,
            canvas_size: config.canvas_size,
            client_rect: None,
            limits,
            camera,
            mode: InteractionMode::Idle,
            gesture: GestureDisambiguator::new(
                config.swipe_threshold_px,
                config.pinch_cooldown_ms,
            ),
            mouse: MouseTracker::new(config.swipe_threshold_px),
            inertia: InertiaState::default(),
            jump: None,
            hover_cell: None,
            cache: PixelCache::new(),
            fetch: FetchScheduler::new(config.fetch),
            fetch_dirty: true,
            writes: WriteCoordinator::new(config.write),
            subscription: SubscriptionSlot::new(),
            account: None,
            paint_color: Color::BLACK,
            persistence: None,
            persist_pending: false,
            persist_due_ms: None,
            listeners: Vec::new(),
            commands: Vec::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> CanvasEngineConfig {
        self.config
    }

    #[must_use]
    pub fn camera(&self) -> CameraState {
        self.camera
    }

    #[must_use]
    pub fn camera_limits(&self) -> CameraLimits {
        self.limits
    }

    #[must_use]
    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.config.cell_size
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn visible_range(&self) -> PixelRange {
        compute_visible_range(self.canvas_size, self.camera, self.config.cell_size)
    }

    /// Query limit for the current zoom level.
    #[must_use]
    pub fn result_budget(&self) -> u32 {
        self.config.fetch.budget.for_scale(
            self.camera.scale,
            self.limits.min_scale,
            self.limits.max_scale,
        )
    }

    #[must_use]
    pub fn hover_cell(&self) -> Option<Cell> {
        self.hover_cell
    }

    #[must_use]
    pub fn cache(&self) -> &PixelCache {
        &self.cache
    }

    #[must_use]
    pub fn pixel(&self, cell: Cell) -> Option<Color> {
        self.cache.get(cell)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Drains remote work queued since the previous call.
    pub fn take_commands(&mut self) -> Vec<RemoteCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Tears the engine down: cancels animation tasks and the push
    /// subscription, and flushes a pending camera save.
    pub fn shutdown(&mut self) {
        self.cancel_camera_tasks();
        self.subscription.cancel();
        self.fetch.abandon_in_flight();
        self.flush_camera_save();
        self.commands.clear();
        debug!(pending_writes = self.writes.pending_count(), "canvas engine shut down");
    }

    #[must_use]
    pub fn into_renderer(mut self) -> R {
        self.shutdown();
        let Self { renderer, .. } = self;
        renderer
    }
}
