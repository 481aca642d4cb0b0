// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

pub mod message;

pub use message::{
    is_thunk_action, Action, AnyThunkAction, Dispatch, GetState, Message, ACTION_TYPE,
};
