// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::task::LocalSpawn;
use log::debug;

use crate::action::{is_thunk_action, Dispatch, Message};
use crate::middleware::{Middleware, MiddlewareApi};

/// Runs thunk actions and forwards every other message unchanged.
///
/// A thunk action is started with the store's `dispatch` and `get_state`, a clone of the
/// context and the spawner, and the action itself is returned to the caller right away.
/// Neither its result nor its failure is observed here; both go to its completion.
#[derive(Debug, Clone)]
pub struct ThunkMiddleware<C, Sp = LocalSpawner> {
    spawner: Sp,
    context: C,
}

impl<C: Default, Sp> ThunkMiddleware<C, Sp> {
    pub fn new(spawner: Sp) -> Self {
        Self::with_context(spawner, C::default())
    }
}

impl<C, Sp> ThunkMiddleware<C, Sp> {
    pub fn with_context(spawner: Sp, context: C) -> Self {
        Self { spawner, context }
    }

    pub fn context(&self) -> &C {
        &self.context
    }
}

/// Thunk middleware whose thunks receive `C::default()` as context.
pub fn create_thunk_middleware<C, Sp>(spawner: Sp) -> ThunkMiddleware<C, Sp>
where
    C: Default,
    Sp: LocalSpawn,
{
    ThunkMiddleware::new(spawner)
}

/// Thunk middleware whose thunks receive a clone of `context`.
pub fn create_thunk_middleware_with_context<C, Sp>(spawner: Sp, context: C) -> ThunkMiddleware<C, Sp>
where
    Sp: LocalSpawn,
{
    ThunkMiddleware::with_context(spawner, context)
}

impl<S, A, C, Sp> Middleware<S, A, C> for ThunkMiddleware<C, Sp>
where
    S: 'static,
    A: 'static,
    C: Clone + 'static,
    Sp: LocalSpawn + Clone + 'static,
{
    fn install(&self, api: MiddlewareApi<S, A, C>, next: Dispatch<S, A, C>) -> Dispatch<S, A, C> {
        let MiddlewareApi {
            dispatch,
            get_state,
        } = api;
        let context = self.context.clone();
        let spawner = self.spawner.clone();

        Rc::new(move |message: Message<S, A, C>| {
            if !is_thunk_action(Some(&message)) {
                return next(message);
            }
            if let Message::Thunk(thunk) = &message {
                debug!("Running thunk {:?}", thunk.thunk_type());
                thunk.run_erased(
                    Rc::clone(&dispatch),
                    Rc::clone(&get_state),
                    context.clone(),
                    &spawner,
                );
            }
            // the caller gets the action back and awaits its completion
            message
        })
    }
}
