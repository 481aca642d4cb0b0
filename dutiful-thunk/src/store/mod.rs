// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>
//! Single-threaded state container that hosts the middleware chain.
//!
//! - State lives in one `RefCell`; the reducer computes the next state from `&S` and `&A`.
//! - `dispatch` runs the composed chain synchronously and returns what the chain returned.
//! - Reducers may not dispatch; subscribers may.
//! - Capabilities handed to middleware hold weak references, so a thunk that outlives its
//!   store only logs a warning when it dispatches.

pub mod container;

pub use container::{Listener, Reducer, Store, SubscriptionId};
