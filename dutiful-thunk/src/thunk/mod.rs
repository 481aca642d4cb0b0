// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>
//! Thunk actions: async work functions wrapped as dispatchable actions.
//!
//! A [`ThunkAction`] owns the work function and a [`Completion`] created before it.
//! Running the action calls the work function and polls a small driver once, so the work
//! runs up to its first pending await before `run` returns. A driver that is not done yet
//! is spawned on the injected executor. It forwards the outcome into the completion and
//! nothing else ever settles it.

pub mod completion;
pub mod thunk_action;

pub use completion::{Completion, ThunkResult};
pub use thunk_action::{thunk, thunk_as, ThunkAction, ThunkType};

#[cfg(test)]
mod tests;
