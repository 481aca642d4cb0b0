// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Arc;
use std::task::Context;

use futures::task::{noop_waker_ref, LocalSpawn, LocalSpawnExt};
use futures::FutureExt;
use log::{debug, warn};

use crate::action::{AnyThunkAction, Dispatch, GetState, ACTION_TYPE};
use crate::error::ThunkError;
use crate::thunk::completion::{Completion, Settle};

/// Optional label telling consumers which logical operation a thunk action performs.
/// It has no effect on how the thunk runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ThunkType(Option<String>);

impl ThunkType {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl From<&str> for ThunkType {
    fn from(value: &str) -> Self {
        Self(Some(value.to_string()))
    }
}

impl From<String> for ThunkType {
    fn from(value: String) -> Self {
        Self(Some(value))
    }
}

impl From<Option<&str>> for ThunkType {
    fn from(value: Option<&str>) -> Self {
        Self(value.map(str::to_string))
    }
}

impl From<Option<String>> for ThunkType {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

type RunFn<S, A, C> = Box<dyn FnOnce(Dispatch<S, A, C>, GetState<S>, C, &dyn LocalSpawn)>;

/// An asynchronous unit of work packaged as a dispatchable action.
///
/// Created by [`thunk`] or [`thunk_as`]. The work function is not called until the
/// action is run, normally by the thunk middleware. Its outcome is delivered through
/// [`ThunkAction::completion`].
pub struct ThunkAction<S, A, C, R> {
    kind: &'static str,
    thunk_type: ThunkType,
    run: RefCell<Option<RunFn<S, A, C>>>,
    completion: Completion<R>,
}

impl<S, A, C, R> ThunkAction<S, A, C, R> {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn thunk_type(&self) -> Option<&str> {
        self.thunk_type.as_deref()
    }

    pub fn completion(&self) -> &Completion<R> {
        &self.completion
    }
}

impl<S, A, C, R: Clone> ThunkAction<S, A, C, R> {
    /// Calls the work function and polls its future once, in the caller's turn, up to its
    /// first pending await. Unless it already finished, the rest is spawned on `spawner`.
    ///
    /// Returns without waiting for the work. Only the first call does anything; later
    /// calls return the same completion.
    pub fn run(
        &self,
        dispatch: Dispatch<S, A, C>,
        get_state: GetState<S>,
        context: C,
        spawner: &dyn LocalSpawn,
    ) -> Completion<R> {
        let run = self.run.borrow_mut().take();
        match run {
            Some(run) => run(dispatch, get_state, context, spawner),
            None => debug!("thunk {:?} has already been run", self.thunk_type()),
        }
        self.completion.clone()
    }
}

impl<S, A, C, R> AnyThunkAction<S, A, C> for ThunkAction<S, A, C, R>
where
    S: 'static,
    A: 'static,
    C: 'static,
    R: Clone + 'static,
{
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn thunk_type(&self) -> Option<&str> {
        self.thunk_type.as_deref()
    }

    fn run_erased(
        &self,
        dispatch: Dispatch<S, A, C>,
        get_state: GetState<S>,
        context: C,
        spawner: &dyn LocalSpawn,
    ) {
        let _ = self.run(dispatch, get_state, context, spawner);
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

impl<S, A, C, R> fmt::Debug for ThunkAction<S, A, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThunkAction")
            .field("kind", &self.kind)
            .field("thunk_type", &self.thunk_type())
            .field("pending_run", &self.run.borrow().is_some())
            .finish()
    }
}

/// Wraps a work function into a thunk action without a thunk type.
pub fn thunk<S, A, C, R, F, Fut>(f: F) -> ThunkAction<S, A, C, R>
where
    S: 'static,
    A: 'static,
    C: 'static,
    R: Clone + 'static,
    F: FnOnce(Dispatch<S, A, C>, GetState<S>, C) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<R>> + 'static,
{
    thunk_as(ThunkType::none(), f)
}

/// Wraps a work function into a thunk action labelled with `thunk_type`.
pub fn thunk_as<S, A, C, R, F, Fut>(thunk_type: impl Into<ThunkType>, f: F) -> ThunkAction<S, A, C, R>
where
    S: 'static,
    A: 'static,
    C: 'static,
    R: Clone + 'static,
    F: FnOnce(Dispatch<S, A, C>, GetState<S>, C) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<R>> + 'static,
{
    // the run closure owns the only sender, so the completion must exist first
    let (settle, completion) = Completion::channel();

    let run: RunFn<S, A, C> = Box::new(
        move |dispatch: Dispatch<S, A, C>,
              get_state: GetState<S>,
              context: C,
              spawner: &dyn LocalSpawn| {
            let work = match panic::catch_unwind(AssertUnwindSafe(|| {
                f(dispatch, get_state, context)
            })) {
                Ok(work) => work,
                Err(payload) => {
                    let _ = settle.send(Err(ThunkError::from_panic(payload)));
                    return;
                }
            };

            // first poll happens here, in the dispatching turn
            let mut driver = drive(work, settle).boxed_local();
            let mut cx = Context::from_waker(noop_waker_ref());
            if driver.poll_unpin(&mut cx).is_ready() {
                return;
            }

            if let Err(e) = spawner.spawn_local(driver) {
                warn!("Failed to spawn thunk: {e}");
            }
        },
    );

    ThunkAction {
        kind: ACTION_TYPE,
        thunk_type: thunk_type.into(),
        run: RefCell::new(Some(run)),
        completion,
    }
}

/// Awaits the work function and forwards its outcome into the completion.
async fn drive<R, Fut>(work: Fut, settle: Settle<R>)
where
    Fut: Future<Output = anyhow::Result<R>>,
{
    let outcome = match AssertUnwindSafe(work).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(ThunkError::Failed(Arc::new(err))),
        Err(payload) => Err(ThunkError::from_panic(payload)),
    };
    // every completion handle may already be gone
    let _ = settle.send(outcome);
}
