// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, warn};
use smallvec::SmallVec;

use crate::action::{Action, Dispatch, GetState, Message, ACTION_TYPE};
use crate::error::StoreError;
use crate::middleware::{Middleware, MiddlewareApi};

pub type Reducer<S, A> = Box<dyn Fn(&S, &A) -> S>;

/// Called with a snapshot of the state after every reduced action.
pub type Listener<S> = Rc<dyn Fn(&S)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct StoreCore<S, A, C> {
    state: Rc<RefCell<S>>,
    reducer: Reducer<S, A>,
    listeners: RefCell<SmallVec<[(SubscriptionId, Listener<S>); 4]>>,
    next_subscription: Cell<u64>,
    is_reducing: Cell<bool>,
    chain: OnceCell<Dispatch<S, A, C>>,
}

/// Resets the reducing flag even if the reducer panics.
struct ReducingGuard<'a>(&'a Cell<bool>);

impl<'a> ReducingGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for ReducingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<S, A, C> StoreCore<S, A, C>
where
    S: Clone + 'static,
    A: Action,
    C: 'static,
{
    fn check(&self, message: &Message<S, A, C>) -> Result<(), StoreError> {
        if self.chain.get().is_none() {
            return Err(StoreError::DispatchDuringConstruction);
        }
        if self.is_reducing.get() {
            return Err(StoreError::DispatchFromReducer);
        }
        if let Message::Action(action) = message {
            if action.action_type() == ACTION_TYPE {
                return Err(StoreError::ReservedActionType(ACTION_TYPE.to_string()));
            }
        }
        Ok(())
    }

    fn dispatch(&self, message: Message<S, A, C>) -> Message<S, A, C> {
        if let Err(e) = self.check(&message) {
            warn!("Ignoring {}: {e}", message.kind());
            return message;
        }
        match self.chain.get().cloned() {
            Some(chain) => chain(message),
            None => message,
        }
    }

    /// Last stage of the chain.
    fn reduce(&self, message: Message<S, A, C>) -> Message<S, A, C> {
        let action = match &message {
            Message::Thunk(thunk) => {
                debug!(
                    "Thunk {:?} reached the reducer without being run",
                    thunk.thunk_type()
                );
                return message;
            }
            Message::Action(action) => action,
        };
        if action.action_type() == ACTION_TYPE {
            warn!("Refusing to reduce an action typed {ACTION_TYPE}");
            return message;
        }

        let next_state = {
            let _reducing = ReducingGuard::enter(&self.is_reducing);
            let state = self.state.borrow();
            (self.reducer)(&state, action)
        };
        *self.state.borrow_mut() = next_state;
        self.notify();
        message
    }

    fn notify(&self) {
        let listeners: SmallVec<[Listener<S>; 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.state.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

fn dispatch_capability<S, A, C>(core: &Rc<StoreCore<S, A, C>>) -> Dispatch<S, A, C>
where
    S: Clone + 'static,
    A: Action,
    C: 'static,
{
    let core: Weak<StoreCore<S, A, C>> = Rc::downgrade(core);
    Rc::new(move |message: Message<S, A, C>| match core.upgrade() {
        Some(core) => core.dispatch(message),
        None => {
            warn!("Ignoring {}: {}", message.kind(), StoreError::StoreDropped);
            message
        }
    })
}

fn reducer_stage<S, A, C>(core: &Rc<StoreCore<S, A, C>>) -> Dispatch<S, A, C>
where
    S: Clone + 'static,
    A: Action,
    C: 'static,
{
    let core: Weak<StoreCore<S, A, C>> = Rc::downgrade(core);
    Rc::new(move |message: Message<S, A, C>| match core.upgrade() {
        Some(core) => core.reduce(message),
        None => message,
    })
}

fn state_reader<S: Clone + 'static>(state: &Rc<RefCell<S>>) -> GetState<S> {
    let state = Rc::clone(state);
    Rc::new(move || state.borrow().clone())
}

/// State container with a middleware chain in front of its reducer.
pub struct Store<S, A, C = ()> {
    core: Rc<StoreCore<S, A, C>>,
}

impl<S, A, C> Store<S, A, C>
where
    S: Clone + 'static,
    A: Action,
    C: 'static,
{
    pub fn new<F>(reducer: F, initial_state: S) -> Self
    where
        F: Fn(&S, &A) -> S + 'static,
    {
        Self::with_middleware(reducer, initial_state, Vec::new())
    }

    /// Builds the store and installs `middlewares`; the first one is the outermost stage.
    pub fn with_middleware<F>(
        reducer: F,
        initial_state: S,
        middlewares: Vec<Box<dyn Middleware<S, A, C>>>,
    ) -> Self
    where
        F: Fn(&S, &A) -> S + 'static,
    {
        let core = Rc::new(StoreCore {
            state: Rc::new(RefCell::new(initial_state)),
            reducer: Box::new(reducer),
            listeners: RefCell::new(SmallVec::new()),
            next_subscription: Cell::new(0),
            is_reducing: Cell::new(false),
            chain: OnceCell::new(),
        });

        let api = MiddlewareApi {
            dispatch: dispatch_capability(&core),
            get_state: state_reader(&core.state),
        };
        let chain = middlewares
            .iter()
            .rev()
            .fold(reducer_stage(&core), |next, middleware| {
                middleware.install(api.clone(), next)
            });
        let _ = core.chain.set(chain);
        debug!("Store created with {} middleware", middlewares.len());

        Self { core }
    }

    /// Sends `message` through the middleware chain and returns what the chain returned.
    ///
    /// Messages the store refuses (see [`StoreError`]) are logged and returned unchanged.
    pub fn dispatch(&self, message: Message<S, A, C>) -> Message<S, A, C> {
        self.core.dispatch(message)
    }

    /// Like [`Store::dispatch`], but reports a refused message instead of logging it.
    pub fn try_dispatch(&self, message: Message<S, A, C>) -> Result<Message<S, A, C>, StoreError> {
        self.core.check(&message)?;
        Ok(self.core.dispatch(message))
    }

    pub fn get_state(&self) -> S {
        self.core.state.borrow().clone()
    }

    /// A dispatch capability that does not keep the store alive.
    pub fn dispatcher(&self) -> Dispatch<S, A, C> {
        dispatch_capability(&self.core)
    }

    pub fn state_reader(&self) -> GetState<S> {
        state_reader(&self.core.state)
    }

    pub fn subscribe<L>(&self, listener: L) -> SubscriptionId
    where
        L: Fn(&S) + 'static,
    {
        let id = SubscriptionId(self.core.next_subscription.get());
        self.core.next_subscription.set(id.0 + 1);
        let listener: Listener<S> = Rc::new(listener);
        self.core.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.core.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

impl<S: fmt::Debug, A, C> fmt::Debug for Store<S, A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.core.state.borrow())
            .field("listeners", &self.core.listeners.borrow().len())
            .finish()
    }
}
