use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{Pixel, PixelRange, ResultBudget};
use crate::error::{CanvasError, CanvasResult, RemoteError};

/// Tuning for viewport-driven range queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base pre-fetch margin, in cells, around the visible range.
    pub buffer_range: u32,
    /// Minimum interval between throttled fetch attempts.
    pub throttle_ms: f64,
    #[serde(default)]
    pub budget: ResultBudget,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            buffer_range: 100,
            throttle_ms: 100.0,
            budget: ResultBudget::default(),
        }
    }
}

impl FetchConfig {
    pub fn validate(self) -> CanvasResult<Self> {
        if !self.throttle_ms.is_finite() || self.throttle_ms < 0.0 {
            return Err(CanvasError::InvalidData(
                "fetch throttle_ms must be finite and >= 0".to_owned(),
            ));
        }
        if self.budget.base_limit == 0 || self.budget.base_limit > self.budget.max_limit {
            return Err(CanvasError::InvalidData(
                "fetch budget must satisfy 0 < base_limit <= max_limit".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// `true` when any edge of `current` moved more than a quarter buffer
/// away from `last`.
#[must_use]
pub fn should_fetch(current: PixelRange, last: PixelRange, buffer_range: u32) -> bool {
    current.max_edge_shift(last) as f64 > f64::from(buffer_range) / 4.0
}

/// Grows `visible` by the buffer, 1.5x on the edge the view is moving
/// towards and 0.5x on the trailing edge, then clamps to store bounds.
#[must_use]
pub fn expand_range(
    visible: PixelRange,
    last: Option<PixelRange>,
    buffer_range: u32,
) -> PixelRange {
    let buffer = f64::from(buffer_range);
    let (direction_x, direction_y) = match last {
        Some(last) => (
            visible.upper_left_x.saturating_sub(last.upper_left_x),
            visible.upper_left_y.saturating_sub(last.upper_left_y),
        ),
        None => (0, 0),
    };
    let (before_x, after_x) = directional_margins(direction_x, buffer);
    let (before_y, after_y) = directional_margins(direction_y, buffer);

    PixelRange {
        upper_left_x: visible.upper_left_x.saturating_sub(before_x),
        upper_left_y: visible.upper_left_y.saturating_sub(before_y),
        lower_right_x: visible.lower_right_x.saturating_add(after_x),
        lower_right_y: visible.lower_right_y.saturating_add(after_y),
    }
    .clamp_to_store_bounds()
}

fn directional_margins(direction: i64, buffer: f64) -> (i64, i64) {
    let leading = (buffer * 1.5).round() as i64;
    let trailing = (buffer * 0.5).round() as i64;
    let even = buffer.round() as i64;
    match direction.signum() {
        1 => (trailing, leading),
        -1 => (leading, trailing),
        _ => (even, even),
    }
}

/// Range query the host must run against the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub generation: u64,
    /// Visible range that triggered the fetch.
    pub visible: PixelRange,
    /// Buffered range to query.
    pub query: PixelRange,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDecision {
    Issue(FetchRequest),
    SkippedInFlight,
    SkippedThrottled,
    SkippedNoChange,
}

impl FetchDecision {
    #[must_use]
    pub fn request(self) -> Option<FetchRequest> {
        match self {
            Self::Issue(request) => Some(request),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCompletion {
    /// Pixels to merge; `last_fetched` has advanced to the request's range.
    Merge(Vec<Pixel>),
    /// The query failed; the next qualifying viewport change retries.
    Failed,
    /// The ticket is no longer the one in flight.
    Stale,
}

/// Single-flight, throttled scheduler of viewport range queries.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchScheduler {
    config: FetchConfig,
    last_fetched: Option<PixelRange>,
    last_permitted_ms: Option<f64>,
    in_flight: Option<FetchRequest>,
    generation: u64,
}

impl FetchScheduler {
    #[must_use]
    pub fn new(config: FetchConfig) -> Self {
        Self {
            config,
            last_fetched: None,
            last_permitted_ms: None,
            in_flight: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> FetchConfig {
        self.config
    }

    #[must_use]
    pub fn last_fetched(&self) -> Option<PixelRange> {
        self.last_fetched
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<FetchRequest> {
        self.in_flight
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// `true` when `visible` warrants a query. Always true before the first
    /// successful fetch.
    #[must_use]
    pub fn should_fetch(&self, visible: PixelRange) -> bool {
        self.last_fetched
            .is_none_or(|last| should_fetch(visible, last, self.config.buffer_range))
    }

    /// Starts a fetch if none is in flight and the view moved enough.
    pub fn begin(&mut self, visible: PixelRange, limit: u32) -> FetchDecision {
        if self.is_fetching() {
            trace!("skipping fetch: request in flight");
            return FetchDecision::SkippedInFlight;
        }
        if !self.should_fetch(visible) {
            trace!("skipping fetch: not enough change");
            return FetchDecision::SkippedNoChange;
        }
        let query = expand_range(visible, self.last_fetched, self.config.buffer_range);
        FetchDecision::Issue(self.start(visible, query, limit))
    }

    /// [`FetchScheduler::begin`] behind a leading-edge throttle gate.
    pub fn begin_throttled(&mut self, visible: PixelRange, limit: u32, now_ms: f64) -> FetchDecision {
        if let Some(last) = self.last_permitted_ms {
            if now_ms - last < self.config.throttle_ms {
                trace!(now_ms, "skipping fetch: throttled");
                return FetchDecision::SkippedThrottled;
            }
        }
        self.last_permitted_ms = Some(now_ms);
        self.begin(visible, limit)
    }

    /// Queries exactly `visible`, skipping the movement check.
    pub fn begin_refresh(&mut self, visible: PixelRange, limit: u32) -> FetchDecision {
        if self.is_fetching() {
            trace!("skipping refresh: request in flight");
            return FetchDecision::SkippedInFlight;
        }
        FetchDecision::Issue(self.start(visible, visible.clamp_to_store_bounds(), limit))
    }

    /// Forgets the in-flight request so its completion is treated as stale.
    pub fn abandon_in_flight(&mut self) -> Option<FetchRequest> {
        let abandoned = self.in_flight.take();
        if let Some(request) = abandoned {
            debug!(generation = request.generation, "abandoned in-flight fetch");
        }
        abandoned
    }

    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<Vec<Pixel>, RemoteError>,
    ) -> FetchCompletion {
        let Some(request) = self.in_flight.filter(|request| request.generation == generation) else {
            debug!(generation, "dropping stale fetch completion");
            return FetchCompletion::Stale;
        };
        self.in_flight = None;

        match result {
            Ok(pixels) => {
                debug!(
                    generation,
                    count = pixels.len(),
                    limit = request.limit,
                    "fetched pixels"
                );
                self.last_fetched = Some(request.visible);
                FetchCompletion::Merge(pixels)
            }
            Err(err) => {
                warn!(generation, error = %err, "error fetching pixels");
                FetchCompletion::Failed
            }
        }
    }

    fn start(&mut self, visible: PixelRange, query: PixelRange, limit: u32) -> FetchRequest {
        self.generation += 1;
        let request = FetchRequest {
            generation: self.generation,
            visible,
            query,
            limit,
        };
        debug!(
            generation = request.generation,
            query = ?request.query,
            limit,
            "issuing pixel range query"
        );
        self.in_flight = Some(request);
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins_follow_scroll_direction() {
        assert_eq!(directional_margins(3, 100.0), (50, 150));
        assert_eq!(directional_margins(-3, 100.0), (150, 50));
        assert_eq!(directional_margins(0, 100.0), (100, 100));
    }
}
