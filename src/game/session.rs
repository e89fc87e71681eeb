//! Session lifecycle and the player-facing notification channel.
//!
//! The session is either running or finished. Finishing is a one-way latch
//! backed by a `tokio::sync::watch` channel: the controller's read loop and
//! every effect timer subscribe to it, so flipping it stops further ticks and
//! unblocks the input wait in the same instant.

use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::{mpsc, watch};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Health dropped below zero.
    Died,
    /// The player walked into an ending room.
    ReachedExit,
}

impl FinishReason {
    pub fn message(&self) -> &'static str {
        match self {
            FinishReason::Died => "You died",
            FinishReason::ReachedExit => {
                "You have reached the exit, You can leave the manor now"
            }
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Finished(FinishReason),
}

impl SessionStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionStatus::Finished(_))
    }
}

/// Cheap cloneable sender for text shown to the player.
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<String>,
}

impl Notifier {
    pub fn channel() -> (Notifier, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Notifier { tx }, rx)
    }

    pub fn notify(&self, msg: impl Into<String>) {
        if self.tx.send(msg.into()).is_err() {
            debug!("notification dropped: output channel closed");
        }
    }
}

/// Shared handle to the session's running/finished latch.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    status: Arc<watch::Sender<SessionStatus>>,
    notifier: Notifier,
}

impl SessionHandle {
    pub fn new(notifier: Notifier) -> Self {
        let (tx, _rx) = watch::channel(SessionStatus::Running);
        Self {
            status: Arc::new(tx),
            notifier,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn is_active(&self) -> bool {
        !self.status.borrow().is_finished()
    }

    pub fn reason(&self) -> Option<FinishReason> {
        match *self.status.borrow() {
            SessionStatus::Finished(reason) => Some(reason),
            SessionStatus::Running => None,
        }
    }

    /// End the session. Only the first call has any effect; it tells the
    /// player why and returns `true`. Later calls return `false`.
    pub fn finish(&self, reason: FinishReason) -> bool {
        let changed = self.status.send_if_modified(|status| {
            if status.is_finished() {
                return false;
            }
            *status = SessionStatus::Finished(reason);
            true
        });
        if changed {
            info!("session finished: {:?}", reason);
            self.notifier.notify(reason.message());
        }
        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }
}

/// Resolve once the session behind `rx` has finished (or its handle is gone).
pub async fn wait_finished(rx: &mut watch::Receiver<SessionStatus>) {
    let _ = rx.wait_for(|status| status.is_finished()).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_latches_first_reason() {
        let (notifier, mut rx) = Notifier::channel();
        let session = SessionHandle::new(notifier);
        assert!(session.is_active());
        assert!(session.finish(FinishReason::Died));
        assert!(!session.finish(FinishReason::ReachedExit));
        assert!(!session.is_active());
        assert_eq!(session.reason(), Some(FinishReason::Died));
        assert_eq!(rx.try_recv().unwrap(), "You died");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn subscribers_wake_on_finish() {
        let (notifier, _rx) = Notifier::channel();
        let session = SessionHandle::new(notifier);
        let mut rx = session.subscribe();
        let waiter = tokio::spawn(async move { wait_finished(&mut rx).await });
        session.finish(FinishReason::ReachedExit);
        waiter.await.unwrap();
    }
}
