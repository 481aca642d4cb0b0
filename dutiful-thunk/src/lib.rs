// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>
//! # dutiful-thunk
//!
//! Async work dispatched as if it were a plain action.
//!
//! - [`thunk`] / [`thunk_as`] wrap an async work function into a [`ThunkAction`] that also
//!   carries a [`Completion`] handle.
//! - [`is_thunk_action`] tells thunk actions apart from plain actions.
//! - [`ThunkMiddleware`] recognizes thunk actions on their way to the reducer, starts them
//!   with the store's `dispatch`, `get_state`, an optional context and an executor, and returns
//!   the thunk action itself to the caller. Everything else passes through unchanged.
//!
//! Everything runs on one thread: the work functions are spawned on a
//! `futures::executor::LocalPool` and the store is a plain `Rc`/`RefCell` container.
//!
//! ```text
//! caller                     store chain                     executor
//!   |  dispatch(thunk action)     |                              |
//!   +---------------------------->| ThunkMiddleware              |
//!   |                             |  run(dispatch, get_state,    |
//!   |                             |      context, spawner) ----->| work function
//!   |<----------------------------+  (returns the action)        |     |
//!   |  action.completion().await  |                              |     |
//!   |<-------------------------------------------------------------------+
//! ```
//!
//! ```
//! use dutiful_thunk::{create_thunk_middleware, thunk, Action, Dispatch, GetState, Message, Store};
//! use futures::executor::LocalPool;
//!
//! #[derive(Debug, Clone)]
//! struct Add(i64);
//!
//! impl Action for Add {
//!     fn action_type(&self) -> &str {
//!         "ADD"
//!     }
//! }
//!
//! let mut pool = LocalPool::new();
//! let store: Store<i64, Add> = Store::with_middleware(
//!     |state: &i64, action: &Add| state + action.0,
//!     0,
//!     vec![Box::new(create_thunk_middleware::<(), _>(pool.spawner()))],
//! );
//!
//! let returned = store.dispatch(
//!     thunk(|dispatch: Dispatch<i64, Add, ()>, get_state: GetState<i64>, _| async move {
//!         dispatch(Message::action(Add(2)));
//!         anyhow::Ok(get_state())
//!     })
//!     .into(),
//! );
//!
//! let action = returned.into_thunk::<i64>().unwrap();
//! assert_eq!(pool.run_until(action.completion().clone()).unwrap(), 2);
//! ```

pub mod action;
pub mod error;
pub mod middleware;
pub mod store;
pub mod thunk;

pub use action::{
    is_thunk_action, Action, AnyThunkAction, Dispatch, GetState, Message, ACTION_TYPE,
};
pub use error::{StoreError, ThunkError};
pub use middleware::{
    create_thunk_middleware, create_thunk_middleware_with_context, Middleware, MiddlewareApi,
    ThunkMiddleware,
};
pub use store::{Store, SubscriptionId};
pub use thunk::{thunk, thunk_as, Completion, ThunkAction, ThunkResult, ThunkType};
