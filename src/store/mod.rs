//! Process-wide client state container.
//!
//! The store holds two independent slices, `auth` and `property`, each with
//! a pure reducer. All mutation goes through `Store::dispatch`, which applies
//! the reducer under a lock and then notifies subscribers with the committed
//! snapshot, so updates are atomic and serialized even with concurrent
//! coordinators running.
//!
//! The store itself persists nothing: it is rebuilt empty at process start
//! and rehydrated from durable storage by `sync::hydrate_store`.

pub mod auth;
pub mod property;

use std::sync::Mutex;

use tracing::debug;

pub use auth::{AuthAction, AuthState};
pub use property::{PropertyAction, PropertyState};

/// Full store snapshot handed to subscribers after each commit.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub auth: AuthState,
    pub property: PropertyState,
}

/// An action targets exactly one slice.
#[derive(Debug, Clone)]
pub enum Action {
    Auth(AuthAction),
    Property(PropertyAction),
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<PropertyAction> for Action {
    fn from(action: PropertyAction) -> Self {
        Action::Property(action)
    }
}

type Subscriber = Box<dyn Fn(&StoreState) + Send + Sync>;

pub struct Store {
    state: Mutex<StoreState>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Apply an action atomically and notify subscribers with the new state.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        debug!(?action, "dispatch");

        let snapshot = {
            let mut state = self.state.lock().unwrap();
            match &action {
                Action::Auth(a) => state.auth = auth::reduce(&state.auth, a),
                Action::Property(a) => state.property = property::reduce(&state.property, a),
            }
            state.clone()
        };

        // Notify outside the state lock so a subscriber reading the store
        // cannot deadlock.
        for subscriber in self.subscribers.lock().unwrap().iter() {
            subscriber(&snapshot);
        }
    }

    /// Clone the current full state.
    pub fn state(&self) -> StoreState {
        self.state.lock().unwrap().clone()
    }

    pub fn auth(&self) -> AuthState {
        self.state.lock().unwrap().auth.clone()
    }

    pub fn property(&self) -> PropertyState {
        self.state.lock().unwrap().property.clone()
    }

    /// Register a callback invoked after every committed update.
    pub fn subscribe(&self, f: impl Fn(&StoreState) + Send + Sync + 'static) {
        self.subscribers.lock().unwrap().push(Box::new(f));
    }
}
