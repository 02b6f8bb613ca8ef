// Record store: the single owner of dataset + view state.
// Mutations go through `dispatch`, which runs the pure reducer and then
// notifies subscribers with the new state.

pub mod actions;
pub mod state;

pub use actions::{reduce, Action};
pub use state::{MarketingState, Records};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&MarketingState, &Action)>;

pub struct Store {
    state: MarketingState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(MarketingState::default())
    }
}

impl Store {
    pub fn new(initial: MarketingState) -> Self {
        Self {
            state: initial,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub const fn state(&self) -> &MarketingState {
        &self.state
    }

    /// Applies `action` as one indivisible write, then notifies listeners
    /// in subscription order.
    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!(action = action.name(), "dispatch");
        self.state = reduce(&self.state, &action);
        for (_, listener) in &mut self.listeners {
            listener(&self.state, &action);
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&MarketingState, &Action) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}
