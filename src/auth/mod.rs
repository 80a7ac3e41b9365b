//! Auth-status stream consumed by the toolbar.
//!
//! Publishers push [`AuthSignal`]s into a `watch` channel; consumers hold a
//! [`Subscription`] and drain it from the UI thread. Only the latest value is
//! kept, so several emissions between two polls collapse into one.

mod session;

use tokio::sync::watch;

pub use session::{Session, SessionManager};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSignal {
    /// Login state as reported by the service. `None` means "unknown" and is
    /// read as logged out.
    Status(Option<bool>),
    /// The stream terminated with an error.
    Failed(String),
}

/// Read-only source of login state.
pub trait AuthService: Send + Sync {
    fn is_logged_in(&self) -> Subscription;
}

/// Live link to an auth-status stream. Released exactly once, either through
/// [`Subscription::unsubscribe`] or by dropping it.
#[derive(Debug)]
pub struct Subscription {
    receiver: watch::Receiver<AuthSignal>,
    terminated: bool,
}

impl Subscription {
    pub fn new(receiver: watch::Receiver<AuthSignal>) -> Self {
        Self {
            receiver,
            terminated: false,
        }
    }

    /// Returns the newest unseen signal, if any.
    ///
    /// Once the stream fails or its publisher goes away the subscription is
    /// marked terminated and every later call returns `None`.
    pub fn poll(&mut self) -> Option<AuthSignal> {
        if self.terminated {
            return None;
        }

        let closed = self.receiver.has_changed().is_err();
        let fresh = {
            let value = self.receiver.borrow_and_update();
            value.has_changed().then(|| value.clone())
        };

        match fresh {
            Some(AuthSignal::Failed(reason)) => {
                self.terminated = true;
                Some(AuthSignal::Failed(reason))
            }
            Some(signal) => Some(signal),
            None => {
                if closed {
                    log::debug!("Auth-status stream completed");
                    self.terminated = true;
                }
                None
            }
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn unsubscribe(self) {
        log::debug!("Releasing auth-status subscription");
        drop(self.receiver);
    }
}

/// In-process publisher of auth status. New subscribers receive the current
/// value on their first poll.
#[derive(Debug, Clone)]
pub struct AuthStatusChannel {
    sender: watch::Sender<AuthSignal>,
}

impl Default for AuthStatusChannel {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AuthStatusChannel {
    pub fn new(initial: Option<bool>) -> Self {
        let (sender, _) = watch::channel(AuthSignal::Status(initial));
        Self { sender }
    }

    pub fn emit(&self, logged_in: Option<bool>) {
        self.sender.send_replace(AuthSignal::Status(logged_in));
    }

    pub fn fail(&self, reason: impl Into<String>) {
        self.sender.send_replace(AuthSignal::Failed(reason.into()));
    }

    pub fn subscribe(&self) -> Subscription {
        let mut receiver = self.sender.subscribe();
        receiver.mark_changed();
        Subscription::new(receiver)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl AuthService for AuthStatusChannel {
    fn is_logged_in(&self) -> Subscription {
        self.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_sees_current_value_first() {
        let channel = AuthStatusChannel::new(Some(true));
        let mut sub = channel.subscribe();
        assert_eq!(sub.poll(), Some(AuthSignal::Status(Some(true))));
        assert_eq!(sub.poll(), None);
    }

    #[test]
    fn test_only_latest_value_is_delivered() {
        let channel = AuthStatusChannel::default();
        let mut sub = channel.subscribe();
        let _ = sub.poll();

        channel.emit(Some(true));
        channel.emit(Some(false));
        channel.emit(Some(true));

        assert_eq!(sub.poll(), Some(AuthSignal::Status(Some(true))));
        assert_eq!(sub.poll(), None);
    }

    #[test]
    fn test_failure_terminates_subscription() {
        let channel = AuthStatusChannel::default();
        let mut sub = channel.subscribe();
        let _ = sub.poll();

        channel.fail("token endpoint unreachable");
        assert_eq!(
            sub.poll(),
            Some(AuthSignal::Failed("token endpoint unreachable".to_string()))
        );
        assert!(sub.is_terminated());

        channel.emit(Some(true));
        assert_eq!(sub.poll(), None);
    }

    #[test]
    fn test_last_value_survives_publisher_drop() {
        let channel = AuthStatusChannel::default();
        let mut sub = channel.subscribe();
        let _ = sub.poll();

        channel.emit(Some(true));
        drop(channel);

        assert_eq!(sub.poll(), Some(AuthSignal::Status(Some(true))));
        assert_eq!(sub.poll(), None);
        assert!(sub.is_terminated());
    }

    #[test]
    fn test_unsubscribe_releases_receiver() {
        let channel = AuthStatusChannel::default();
        let sub = channel.subscribe();
        assert_eq!(channel.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(channel.subscriber_count(), 0);
    }
}
