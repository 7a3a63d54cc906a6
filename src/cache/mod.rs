mod fetch_scheduler;
mod pixel_cache;
mod subscription;

pub use fetch_scheduler::{
    FetchCompletion, FetchConfig, FetchDecision, FetchRequest, FetchScheduler, expand_range,
    should_fetch,
};
pub use pixel_cache::{MergeOutcome, MergeStats, PixelCache};
pub use subscription::{PixelSubscription, SubscriptionId, SubscriptionSlot};
