// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use futures::task::LocalSpawn;

use crate::thunk::thunk_action::ThunkAction;

/// Type identifier carried by every thunk action. Plain actions must never use it.
pub const ACTION_TYPE: &str = "@@redux-dutiful-thunk/THUNK";

/// A plain, reducible action.
pub trait Action: 'static {
    /// Type name used for logging and filtering, like `type` on a Redux action.
    fn action_type(&self) -> &str;
}

/// Submits a message back into the store and returns whatever the chain returned.
pub type Dispatch<S, A, C> = Rc<dyn Fn(Message<S, A, C>) -> Message<S, A, C>>;

/// Reads a snapshot of the current state.
pub type GetState<S> = Rc<dyn Fn() -> S>;

/// A thunk action with its result type erased, so thunks of different result types
/// travel through the same dispatch pipeline.
pub trait AnyThunkAction<S, A, C> {
    fn kind(&self) -> &'static str;

    fn thunk_type(&self) -> Option<&str>;

    /// Starts the work function. The outcome only ever goes to the thunk's completion.
    fn run_erased(
        &self,
        dispatch: Dispatch<S, A, C>,
        get_state: GetState<S>,
        context: C,
        spawner: &dyn LocalSpawn,
    );

    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

/// Everything that can be dispatched to a store.
pub enum Message<S, A, C> {
    Action(A),
    Thunk(Rc<dyn AnyThunkAction<S, A, C>>),
}

impl<S, A, C> Message<S, A, C> {
    pub fn action(action: A) -> Self {
        Message::Action(action)
    }

    pub fn is_thunk(&self) -> bool {
        is_thunk_action(Some(self))
    }

    pub fn as_action(&self) -> Option<&A> {
        match self {
            Message::Action(action) => Some(action),
            Message::Thunk(_) => None,
        }
    }

    pub fn into_action(self) -> Option<A> {
        match self {
            Message::Action(action) => Some(action),
            Message::Thunk(_) => None,
        }
    }

    pub fn as_thunk(&self) -> Option<&Rc<dyn AnyThunkAction<S, A, C>>> {
        match self {
            Message::Action(_) => None,
            Message::Thunk(thunk) => Some(thunk),
        }
    }

    pub fn thunk_type(&self) -> Option<&str> {
        self.as_thunk().and_then(|thunk| thunk.thunk_type())
    }
}

impl<S: 'static, A: 'static, C: 'static> Message<S, A, C> {
    /// Recovers the typed thunk action, the same allocation that was dispatched.
    ///
    /// Returns `None` for plain actions and for thunks whose result type is not `R`.
    pub fn into_thunk<R: 'static>(self) -> Option<Rc<ThunkAction<S, A, C, R>>> {
        match self {
            Message::Action(_) => None,
            Message::Thunk(thunk) => thunk.into_any().downcast().ok(),
        }
    }
}

impl<S, A: Action, C> Message<S, A, C> {
    /// The type identifier: [`ACTION_TYPE`] for thunks, the action's own type otherwise.
    pub fn kind(&self) -> &str {
        match self {
            Message::Action(action) => action.action_type(),
            Message::Thunk(thunk) => thunk.kind(),
        }
    }
}

impl<S, A: Clone, C> Clone for Message<S, A, C> {
    fn clone(&self) -> Self {
        match self {
            Message::Action(action) => Message::Action(action.clone()),
            Message::Thunk(thunk) => Message::Thunk(Rc::clone(thunk)),
        }
    }
}

impl<S, A: fmt::Debug, C> fmt::Debug for Message<S, A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Message::Thunk(thunk) => f
                .debug_struct("Thunk")
                .field("kind", &thunk.kind())
                .field("thunk_type", &thunk.thunk_type())
                .finish(),
        }
    }
}

impl<S, A, C, R> From<Rc<ThunkAction<S, A, C, R>>> for Message<S, A, C>
where
    S: 'static,
    A: 'static,
    C: 'static,
    R: Clone + 'static,
{
    fn from(thunk: Rc<ThunkAction<S, A, C, R>>) -> Self {
        Message::Thunk(thunk)
    }
}

impl<S, A, C, R> From<ThunkAction<S, A, C, R>> for Message<S, A, C>
where
    S: 'static,
    A: 'static,
    C: 'static,
    R: Clone + 'static,
{
    fn from(thunk: ThunkAction<S, A, C, R>) -> Self {
        Message::Thunk(Rc::new(thunk))
    }
}

/// Whether `message` is a thunk action. Absent messages are not.
pub fn is_thunk_action<S, A, C>(message: Option<&Message<S, A, C>>) -> bool {
    matches!(message, Some(Message::Thunk(thunk)) if thunk.kind() == ACTION_TYPE)
}
