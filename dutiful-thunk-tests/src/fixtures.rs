// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::cell::RefCell;
use std::rc::Rc;

use dutiful_thunk::{Action, Dispatch, GetState, Message, Store, ThunkAction, ThunkMiddleware};
use futures::executor::LocalSpawner;
use serde::{Deserialize, Serialize};

use crate::test_log::{recorder, TestLog};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoteAction {
    Added(String),
    Cleared,
}

impl Action for NoteAction {
    fn action_type(&self) -> &str {
        match self {
            NoteAction::Added(_) => "NOTE_ADDED",
            NoteAction::Cleared => "NOTES_CLEARED",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteState {
    pub notes: Vec<String>,
}

pub fn reducer(state: &NoteState, action: &NoteAction) -> NoteState {
    match action {
        NoteAction::Added(text) => {
            let mut notes = state.notes.clone();
            notes.push(text.clone());
            NoteState { notes }
        }
        NoteAction::Cleared => NoteState::default(),
    }
}

pub type NoteStore<C> = Store<NoteState, NoteAction, C>;
pub type NoteMessage<C> = Message<NoteState, NoteAction, C>;
pub type NoteDispatch<C> = Dispatch<NoteState, NoteAction, C>;
pub type NoteGetState = GetState<NoteState>;
pub type NoteThunk<C, R> = ThunkAction<NoteState, NoteAction, C, R>;

pub fn note<C>(text: &str) -> NoteMessage<C> {
    Message::action(NoteAction::Added(text.to_string()))
}

/// A store whose messages pass the recorder first and the thunk middleware second.
pub fn recorded_store<C: Clone + 'static>(
    spawner: LocalSpawner,
    context: C,
    log: &Rc<RefCell<TestLog>>,
) -> NoteStore<C> {
    Store::with_middleware(
        reducer,
        NoteState::default(),
        vec![
            Box::new(recorder::<NoteState, NoteAction, C>(Rc::clone(log))),
            Box::new(ThunkMiddleware::with_context(spawner, context)),
        ],
    )
}
