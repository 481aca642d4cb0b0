// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

/// Why a thunk's completion settled without a value.
#[derive(Debug, Clone, Error)]
pub enum ThunkError {
    /// The work function returned an error.
    #[error("thunk failed: {0}")]
    Failed(Arc<anyhow::Error>),

    /// The work function panicked, either while being called or while its future was polled.
    #[error("thunk panicked: {0}")]
    Panicked(String),

    /// The thunk was dropped, or its driver could not be spawned, before it settled.
    #[error("thunk was dropped before it settled")]
    Abandoned,
}

impl ThunkError {
    /// The error returned by the work function, if that is why the thunk failed.
    pub fn failure(&self) -> Option<&anyhow::Error> {
        match self {
            ThunkError::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        ThunkError::Panicked(message)
    }
}

/// Conditions under which the store refuses a message.
///
/// `Store::dispatch` keeps the `dispatch(message) -> message` contract and only logs these;
/// `Store::try_dispatch` returns them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("reducers may not dispatch actions")]
    DispatchFromReducer,

    #[error("dispatching while the middleware chain is being constructed is not allowed")]
    DispatchDuringConstruction,

    #[error("the store behind this dispatch capability has been dropped")]
    StoreDropped,

    #[error("action type {0:?} is reserved for thunk actions")]
    ReservedActionType(String),
}
