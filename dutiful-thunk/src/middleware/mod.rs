// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>
//! # Middleware chain
//!
//! A middleware sits between `Store::dispatch` and the reducer. It is installed once, when
//! the store is built, and receives
//!
//! - the store's `dispatch` capability (re-enters the chain from the top),
//! - the store's `get_state` capability,
//! - `next`, the rest of the chain below it,
//!
//! and returns the handler that replaces `next` for every stage above it.
//!
//! ```text
//! dispatch(message)
//!        |
//! +------v------+
//! | middleware0 |----> returns early (e.g. a started thunk)
//! +------+------+
//!        | next
//! +------v------+
//! | middleware1 |
//! +------+------+
//!        | next
//! +------v------+
//! |   reducer   |
//! +-------------+
//! ```

use std::rc::Rc;

use crate::action::{Dispatch, GetState};

pub mod thunk_middleware;

pub use thunk_middleware::{
    create_thunk_middleware, create_thunk_middleware_with_context, ThunkMiddleware,
};

/// Capabilities a middleware receives from the store at installation time.
pub struct MiddlewareApi<S, A, C> {
    pub dispatch: Dispatch<S, A, C>,
    pub get_state: GetState<S>,
}

impl<S, A, C> Clone for MiddlewareApi<S, A, C> {
    fn clone(&self) -> Self {
        Self {
            dispatch: Rc::clone(&self.dispatch),
            get_state: Rc::clone(&self.get_state),
        }
    }
}

pub trait Middleware<S, A, C> {
    /// Builds the handler for this stage of the chain.
    fn install(&self, api: MiddlewareApi<S, A, C>, next: Dispatch<S, A, C>) -> Dispatch<S, A, C>;
}

impl<S, A, C, F> Middleware<S, A, C> for F
where
    F: Fn(MiddlewareApi<S, A, C>, Dispatch<S, A, C>) -> Dispatch<S, A, C>,
{
    fn install(&self, api: MiddlewareApi<S, A, C>, next: Dispatch<S, A, C>) -> Dispatch<S, A, C> {
        self(api, next)
    }
}
