//! Scroll position tracking for the public header.
//!
//! The header listens to the page's scroll position while it is active.
//! Listening is a scoped resource: activating the header takes a
//! [`ScrollSubscription`], and dropping it (on any exit path) releases the
//! listener.

use tokio::sync::watch;

use super::profile::PublicHeaderView;

/// Publishes the page's vertical scroll offset in pixels.
#[derive(Debug)]
pub struct ScrollSignal {
    sender: watch::Sender<f64>,
}

impl Default for ScrollSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSignal {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0.0);
        Self { sender }
    }

    /// Record a new scroll offset. Works with or without listeners.
    pub fn publish(&self, scroll_y: f64) {
        self.sender.send_replace(scroll_y);
    }

    pub fn current(&self) -> f64 {
        *self.sender.borrow()
    }

    /// Attach a listener.
    pub fn subscribe(&self) -> ScrollSubscription {
        ScrollSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A live scroll listener; released when dropped.
#[derive(Debug)]
pub struct ScrollSubscription {
    receiver: watch::Receiver<f64>,
}

impl ScrollSubscription {
    pub fn scroll_y(&self) -> f64 {
        *self.receiver.borrow()
    }

    /// Wait for the next offset. `None` once the signal is gone.
    pub async fn changed(&mut self) -> Option<f64> {
        self.receiver.changed().await.ok()?;
        Some(*self.receiver.borrow_and_update())
    }
}

/// The public header while it is mounted on a page.
#[derive(Debug)]
pub struct PublicHeaderController {
    subscription: ScrollSubscription,
}

impl PublicHeaderController {
    /// Mount the header: start listening to `signal`.
    pub fn activate(signal: &ScrollSignal) -> Self {
        Self {
            subscription: signal.subscribe(),
        }
    }

    /// Header for the current scroll offset.
    pub fn view(&self) -> PublicHeaderView {
        PublicHeaderView::at_scroll(self.subscription.scroll_y())
    }

    /// Header after the next scroll event. `None` once the page is gone.
    pub async fn next_view(&mut self) -> Option<PublicHeaderView> {
        let scroll_y = self.subscription.changed().await?;
        Some(PublicHeaderView::at_scroll(scroll_y))
    }
}
