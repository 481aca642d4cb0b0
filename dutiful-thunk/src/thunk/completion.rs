// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::error::ThunkError;

pub type ThunkResult<R> = Result<R, ThunkError>;

/// Write side of a completion. `send` consumes it, so a completion settles at most once.
pub(crate) type Settle<R> = oneshot::Sender<ThunkResult<R>>;

/// Single-settlement handle to the outcome of a thunk.
///
/// Clones share one underlying cell: every clone observes the same outcome, and awaiting
/// one clone does not consume the result for the others.
pub struct Completion<R> {
    inner: Shared<LocalBoxFuture<'static, ThunkResult<R>>>,
}

impl<R: Clone + 'static> Completion<R> {
    pub(crate) fn channel() -> (Settle<R>, Self) {
        let (settle, settled) = oneshot::channel();
        let inner = settled
            .map(|outcome| outcome.unwrap_or(Err(ThunkError::Abandoned)))
            .boxed_local()
            .shared();
        (settle, Self { inner })
    }

    /// The outcome, if the completion has already settled. Never blocks.
    pub fn try_get(&self) -> Option<ThunkResult<R>> {
        self.inner.clone().now_or_never()
    }

    pub fn is_settled(&self) -> bool {
        self.try_get().is_some()
    }

    /// Whether both handles refer to the same completion.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl<R> Clone for Completion<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: Clone> Future for Completion<R> {
    type Output = ThunkResult<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<R> fmt::Debug for Completion<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}
