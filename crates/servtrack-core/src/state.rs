//! Observable state container.
//!
//! `StateCell` is the mechanism by which stores publish state to consuming
//! views: a thin wrapper over `tokio::sync::watch` giving subscribe/notify
//! semantics with atomic transitions (an observer never sees a half-applied
//! update).

use tokio::sync::watch;

/// A single observable state value.
///
/// Cloning the cell is cheap and shares the underlying channel, so a store
/// and its observers all see the same state.
#[derive(Debug, Clone)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    /// Creates a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Returns a clone of the current state.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replaces the state, notifying subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutates the state in place, notifying subscribers once.
    ///
    /// The closure runs to completion before any observer can read, which is
    /// what makes each store transition atomic.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Subscribes to state changes.
    ///
    /// The receiver yields the current value immediately and every published
    /// value thereafter (coalescing intermediate ones it did not observe).
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        value: u32,
        label: String,
    }

    #[test]
    fn test_get_and_set() {
        let cell = StateCell::new(Counter::default());
        cell.set(Counter {
            value: 3,
            label: "three".into(),
        });
        assert_eq!(cell.get().value, 3);
    }

    #[test]
    fn test_update_is_atomic_to_observers() {
        let cell = StateCell::new(Counter::default());
        let rx = cell.subscribe();
        cell.update(|c| {
            c.value = 7;
            c.label = "seven".into();
        });
        // Both fields land together.
        let seen = rx.borrow().clone();
        assert_eq!(
            seen,
            Counter {
                value: 7,
                label: "seven".into()
            }
        );
    }

    #[tokio::test]
    async fn test_subscriber_sees_change_notification() {
        let cell = StateCell::new(Counter::default());
        let mut rx = cell.subscribe();
        cell.update(|c| c.value = 1);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().value, 1);
    }

    #[test]
    fn test_clones_share_state() {
        let cell = StateCell::new(Counter::default());
        let other = cell.clone();
        other.update(|c| c.value = 9);
        assert_eq!(cell.get().value, 9);
    }
}
