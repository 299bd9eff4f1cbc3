//! Replay-one state broadcaster
//!
//! Stores the latest [`WalletState`] and forwards every published state to
//! all live subscribers. A new subscriber first receives the stored state,
//! then each later transition in publish order. Nothing is coalesced: every
//! subscriber owns an unbounded channel.

use crate::domain::WalletState;
use futures::Stream;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

struct Inner {
    current: WalletState,
    subscribers: Vec<UnboundedSender<WalletState>>,
}

/// Latest-value broadcaster for wallet states
pub struct StateBroadcaster {
    inner: Mutex<Inner>,
}

impl StateBroadcaster {
    pub fn new(initial: WalletState) -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: initial,
                subscribers: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // `Inner` is only changed by whole-value writes, so a poisoned lock is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the stored state
    pub fn current(&self) -> WalletState {
        self.lock().current.clone()
    }

    /// Store `state` and deliver it to every subscriber.
    ///
    /// Subscribers whose receiving side was dropped are pruned here.
    pub fn publish(&self, state: WalletState) {
        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(state.clone()).is_ok());
        inner.current = state;
    }

    /// Register a subscriber; its first item is the stored state
    pub fn subscribe(&self) -> StateSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        // Cannot fail: the receiver is still in scope.
        let _ = sender.send(inner.current.clone());
        inner.subscribers.push(sender);
        StateSubscription { receiver }
    }

    /// Number of live subscribers
    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        let mut inner = self.lock();
        inner.subscribers.retain(|subscriber| !subscriber.is_closed());
        inner.subscribers.len()
    }
}

impl Default for StateBroadcaster {
    fn default() -> Self {
        Self::new(WalletState::Loading)
    }
}

/// Receiving end of a [`StateBroadcaster`] subscription.
///
/// Dropping it unsubscribes. The sequence ends only once the broadcaster
/// itself is gone.
pub struct StateSubscription {
    receiver: UnboundedReceiver<WalletState>,
}

impl StateSubscription {
    /// Wait for the next state
    pub async fn recv(&mut self) -> Option<WalletState> {
        self.receiver.recv().await
    }

    /// Next already-delivered state, without waiting
    pub fn try_recv(&mut self) -> Option<WalletState> {
        match self.receiver.try_recv() {
            Ok(state) => Some(state),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain every state delivered so far
    pub fn drain(&mut self) -> Vec<WalletState> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Wait until a state matching `predicate` arrives, skipping the rest
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Option<WalletState>
    where
        F: FnMut(&WalletState) -> bool,
    {
        while let Some(state) = self.recv().await {
            if predicate(&state) {
                return Some(state);
            }
        }
        None
    }
}

impl Stream for StateSubscription {
    type Item = WalletState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::Balances;
    use futures::StreamExt;

    fn valid(gold: i64) -> WalletState {
        WalletState::valid(Balances::from([("gold".to_string(), gold)]))
    }

    #[test]
    fn test_new_subscriber_receives_current_state_first() {
        let broadcaster = StateBroadcaster::default();
        broadcaster.publish(valid(1));
        broadcaster.publish(valid(2));

        let mut subscription = broadcaster.subscribe();
        assert_eq!(subscription.drain(), vec![valid(2)]);

        broadcaster.publish(WalletState::Loading);
        assert_eq!(subscription.drain(), vec![WalletState::Loading]);
    }

    #[test]
    fn test_every_transition_is_delivered_in_order() {
        let broadcaster = StateBroadcaster::default();
        let mut subscription = broadcaster.subscribe();

        broadcaster.publish(valid(5));
        broadcaster.publish(WalletState::Loading);
        broadcaster.publish(WalletState::error("gone"));

        assert_eq!(
            subscription.drain(),
            vec![
                WalletState::Loading,
                valid(5),
                WalletState::Loading,
                WalletState::error("gone"),
            ]
        );
        assert_eq!(broadcaster.current(), WalletState::error("gone"));
    }

    #[test]
    fn test_multicast_to_all_subscribers() {
        let broadcaster = StateBroadcaster::default();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        broadcaster.publish(valid(9));

        assert_eq!(first.drain(), vec![WalletState::Loading, valid(9)]);
        assert_eq!(second.drain(), vec![WalletState::Loading, valid(9)]);
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let broadcaster = StateBroadcaster::default();
        let kept = broadcaster.subscribe();
        let dropped = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 2);

        drop(dropped);
        broadcaster.publish(valid(3));
        assert_eq!(broadcaster.subscriber_count(), 1);
        drop(kept);
        assert_eq!(broadcaster.subscriber_count(), 0);
        assert_eq!(broadcaster.current(), valid(3));
    }

    #[test]
    fn test_recv_wakes_on_publish() {
        let broadcaster = StateBroadcaster::default();
        let mut subscription = broadcaster.subscribe();
        subscription.drain();

        let mut next = tokio_test::task::spawn(subscription.recv());
        tokio_test::assert_pending!(next.poll());

        broadcaster.publish(valid(7));
        assert!(next.is_woken());
        tokio_test::assert_ready_eq!(next.poll(), Some(valid(7)));
    }

    #[tokio::test]
    async fn test_subscription_as_stream() {
        let broadcaster = StateBroadcaster::default();
        let subscription = broadcaster.subscribe();
        broadcaster.publish(valid(1));
        drop(broadcaster);

        let states: Vec<WalletState> = subscription.collect().await;
        assert_eq!(states, vec![WalletState::Loading, valid(1)]);
    }

    #[tokio::test]
    async fn test_wait_for_skips_intermediate_states() {
        let broadcaster = StateBroadcaster::default();
        let mut subscription = broadcaster.subscribe();
        broadcaster.publish(WalletState::Loading);
        broadcaster.publish(valid(4));

        let state = subscription.wait_for(WalletState::is_valid).await;
        assert_eq!(state, Some(valid(4)));
    }
}
