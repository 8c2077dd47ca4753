// Operation Stop Token

use tokio::sync::watch;

/// Stop request observed by a running operation between links
#[derive(Clone)]
pub struct StopToken {
    rx: watch::Receiver<bool>,
}

impl StopToken {
    /// Check if a stop was requested
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Token that never fires (sender dropped up front)
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }
}

/// Stop sender
#[derive(Clone)]
pub struct StopSender {
    tx: watch::Sender<bool>,
}

impl StopSender {
    /// Ask the operation to stop after the link in flight
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create a stop channel
pub fn stop_channel() -> (StopSender, StopToken) {
    let (tx, rx) = watch::channel(false);
    (StopSender { tx }, StopToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_observed_by_clones() {
        let (sender, token) = stop_channel();
        let observer = token.clone();
        assert!(!token.is_stopped());

        sender.clone().stop();

        assert!(token.is_stopped());
        assert!(observer.is_stopped());
    }

    #[test]
    fn test_never_token_stays_clear() {
        assert!(!StopToken::never().is_stopped());
    }
}
