use std::fmt;

use tracing::debug;

/// Handle to an open push-update channel owned by the host.
pub trait PixelSubscription {
    /// Stops delivery. Called exactly once per attached subscription.
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Holds at most one open subscription.
///
/// Attaching a new subscription cancels the previous one first; dropping the
/// slot cancels whatever is still open.
#[derive(Default)]
pub struct SubscriptionSlot {
    current: Option<(SubscriptionId, Box<dyn PixelSubscription>)>,
    next_id: u64,
}

impl SubscriptionSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, subscription: Box<dyn PixelSubscription>) -> SubscriptionId {
        if let Some(previous) = self.current_id() {
            debug!(previous = %previous, "replacing pixel subscription");
        }
        self.cancel();
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.current = Some((id, subscription));
        id
    }

    #[must_use]
    pub fn current_id(&self) -> Option<SubscriptionId> {
        self.current.as_ref().map(|(id, _)| *id)
    }

    #[must_use]
    pub fn is_current(&self, id: SubscriptionId) -> bool {
        self.current_id() == Some(id)
    }

    /// Cancels the open subscription. Returns `true` when one was open.
    pub fn cancel(&mut self) -> bool {
        match self.current.take() {
            Some((id, mut subscription)) => {
                subscription.cancel();
                debug!(subscription = %id, "pixel subscription cancelled");
                true
            }
            None => false,
        }
    }
}

impl Drop for SubscriptionSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for SubscriptionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionSlot")
            .field("current", &self.current_id())
            .finish()
    }
}
