//! Turn-token barrier for ordered emission.
//!
//! Workers finish their computation in any order, but each one must wait
//! until a shared counter reaches its own index before performing its
//! externally visible effect. The counter is the single source of truth
//! for whose turn it is; every worker advances it exactly once after its
//! effect.
//!
//! Built on [`tokio::sync::watch`]: `advance` publishes the new counter
//! value and wakes every waiter, each of which re-checks its own turn.
//! That is the monitor (mutex + condvar) shape of the barrier, expressed
//! with tokio primitives.

use tokio::sync::watch;

/// Shared ordering gate. Clone-free: share via `Arc`.
#[derive(Debug)]
pub struct OrderedGate {
    turn: watch::Sender<usize>,
}

impl OrderedGate {
    /// Create a gate whose counter starts at slot 0.
    pub fn new() -> Self {
        let (turn, _) = watch::channel(0);
        Self { turn }
    }

    /// Current value of the turn counter.
    pub fn current(&self) -> usize {
        *self.turn.borrow()
    }

    /// Suspend until the counter equals `index`.
    ///
    /// # Panics
    ///
    /// Panics if the counter has already moved past `index`. A slot can
    /// only be passed by a worker that advanced without owning the turn,
    /// which breaks the ordering guarantee for every later job — a defect,
    /// not a recoverable runtime condition.
    pub async fn wait_for_turn(&self, index: usize) {
        let mut rx = self.turn.subscribe();
        let turn = *rx
            .wait_for(|turn| *turn >= index)
            .await
            .expect("ordering gate dropped while a worker was waiting");
        if turn != index {
            panic!("ordering barrier violated: slot {index} already passed (counter at {turn})");
        }
    }

    /// Release the next slot and wake all waiters.
    pub fn advance(&self) {
        self.turn.send_modify(|turn| *turn += 1);
    }
}

impl Default for OrderedGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[tokio::test]
    async fn waiters_released_in_index_order() {
        let gate = Arc::new(OrderedGate::new());
        let emitted = Arc::new(Mutex::new(Vec::new()));

        // Workers with reversed latencies: the last index finishes its
        // "computation" first and must still emit last.
        let mut handles = Vec::new();
        for index in 0..5usize {
            let gate = Arc::clone(&gate);
            let emitted = Arc::clone(&emitted);
            handles.push(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10 * (5 - index) as u64)).await;
                gate.wait_for_turn(index).await;
                emitted.lock().unwrap().push(index);
                gate.advance();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*emitted.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(gate.current(), 5);
    }

    #[tokio::test]
    async fn immediate_turn_does_not_block() {
        let gate = OrderedGate::new();
        gate.wait_for_turn(0).await;
        gate.advance();
        gate.wait_for_turn(1).await;
    }

    #[tokio::test]
    #[should_panic(expected = "ordering barrier violated")]
    async fn stale_index_panics() {
        let gate = OrderedGate::new();
        gate.advance();
        gate.advance();
        // Slot 1 was already passed; waiting for it is a defect.
        gate.wait_for_turn(1).await;
    }
}
