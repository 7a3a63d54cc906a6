use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::cache::{
    FetchCompletion, FetchDecision, FetchRequest, MergeOutcome, MergeStats, PixelSubscription,
    SubscriptionId,
};
use crate::core::{Cell, Pixel, PixelRange};
use crate::error::RemoteError;
use crate::render::RenderDriver;
use crate::write::TransactionId;

use super::{CanvasEngine, CanvasEvent, RemoteCommand};

impl<R: RenderDriver> CanvasEngine<R> {
    #[must_use]
    pub fn fetch_in_flight(&self) -> Option<FetchRequest> {
        self.fetch.in_flight()
    }

    #[must_use]
    pub fn last_fetched_range(&self) -> Option<PixelRange> {
        self.fetch.last_fetched()
    }

    /// Throttled, single-flight fetch of the buffered visible range.
    ///
    /// An issued request is queued as [`RemoteCommand::Fetch`]. A request
    /// dropped by the throttle is retried from [`CanvasEngine::tick`]; one
    /// dropped because a fetch is in flight is discarded until the camera
    /// moves again.
    pub fn request_fetch(&mut self, now_ms: f64) -> FetchDecision {
        let visible = self.visible_range();
        let limit = self.result_budget();
        let decision = self.fetch.begin_throttled(visible, limit, now_ms);
        match decision {
            FetchDecision::Issue(request) => {
                self.fetch_dirty = false;
                self.commands.push(RemoteCommand::Fetch(request));
            }
            FetchDecision::SkippedNoChange | FetchDecision::SkippedInFlight => {
                self.fetch_dirty = false;
            }
            FetchDecision::SkippedThrottled => self.fetch_dirty = true,
        }
        decision
    }

    /// Fetches exactly the visible range, bypassing the movement check and
    /// the throttle. Still single-flight.
    pub fn request_refresh(&mut self) -> FetchDecision {
        let visible = self.visible_range();
        let limit = self.result_budget();
        let decision = self.fetch.begin_refresh(visible, limit);
        if let FetchDecision::Issue(request) = decision {
            self.commands.push(RemoteCommand::Fetch(request));
        }
        decision
    }

    /// Reports the result of a [`RemoteCommand::Fetch`].
    ///
    /// Returns merge counters, or `None` when the result was stale or failed.
    pub fn complete_fetch(
        &mut self,
        generation: u64,
        result: Result<Vec<Pixel>, RemoteError>,
    ) -> Option<MergeStats> {
        match self.fetch.complete(generation, result) {
            FetchCompletion::Merge(pixels) => Some(self.merge_pixels(pixels)),
            FetchCompletion::Failed | FetchCompletion::Stale => None,
        }
    }

    /// Opens the push-update channel, cancelling the previous one.
    pub fn attach_subscription(&mut self, subscription: Box<dyn PixelSubscription>) -> SubscriptionId {
        let id = self.subscription.attach(subscription);
        debug!(subscription = %id, "pixel subscription attached");
        id
    }

    pub fn cancel_subscription(&mut self) -> bool {
        self.subscription.cancel()
    }

    #[must_use]
    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        self.subscription.current_id()
    }

    /// Merges a pushed pixel, bypassing the fetch gates.
    ///
    /// Returns `false` when `subscription` is no longer the open channel.
    pub fn push_pixel(&mut self, subscription: SubscriptionId, pixel: Pixel) -> bool {
        if !self.subscription.is_current(subscription) {
            trace!(subscription = %subscription, "dropping push from closed subscription");
            return false;
        }
        self.merge_pixels(std::iter::once(pixel));
        true
    }

    fn merge_pixels<I>(&mut self, pixels: I) -> MergeStats
    where
        I: IntoIterator<Item = Pixel>,
    {
        let mut stats = MergeStats::default();
        let mut confirmed: SmallVec<[(TransactionId, Cell); 4]> = SmallVec::new();
        for pixel in pixels {
            if let Some(transaction_id) = self.writes.observe_remote(&mut self.cache, pixel) {
                confirmed.push((transaction_id, pixel.cell));
            }
            match self.cache.merge_remote(pixel) {
                MergeOutcome::Applied => stats.applied += 1,
                MergeOutcome::Deferred => stats.deferred += 1,
                MergeOutcome::Unchanged => stats.unchanged += 1,
            }
        }

        for (transaction_id, cell) in confirmed {
            self.emit_event(CanvasEvent::PaintConfirmed {
                transaction_id,
                cell,
            });
        }
        if stats.applied > 0 || stats.deferred > 0 {
            self.emit_event(CanvasEvent::PixelsMerged {
                applied: stats.applied,
                deferred: stats.deferred,
            });
        }
        stats
    }
}
