// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::collections::BTreeSet;
use std::rc::Rc;

use dutiful_thunk::{Action, Dispatch, Message, MiddlewareApi, Store, ThunkMiddleware};
use futures::executor::LocalSpawner;
use log::debug;
use serde::{Deserialize, Serialize};

/// Context handed to every thunk, taken from `--context`.
pub type DemoContext = String;

pub type CounterStore = Store<CounterState, CounterAction, DemoContext>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum CounterAction {
    #[serde(rename = "increment")]
    Increment { by: i64 },

    #[serde(rename = "reset")]
    Reset,

    #[serde(rename = "fetch-started")]
    FetchStarted { id: usize },

    #[serde(rename = "fetch-succeeded")]
    FetchSucceeded {
        id: usize,
        value: i64,
        context: DemoContext,
    },

    #[serde(rename = "fetch-failed")]
    FetchFailed { id: usize, reason: String },
}

impl Action for CounterAction {
    fn action_type(&self) -> &str {
        match self {
            CounterAction::Increment { .. } => "increment",
            CounterAction::Reset => "reset",
            CounterAction::FetchStarted { .. } => "fetch-started",
            CounterAction::FetchSucceeded { .. } => "fetch-succeeded",
            CounterAction::FetchFailed { .. } => "fetch-failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchRecord {
    pub id: usize,
    pub value: i64,
    pub context: DemoContext,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CounterState {
    pub count: i64,
    pub pending: BTreeSet<usize>,
    pub completed: Vec<FetchRecord>,
    pub failed: Vec<usize>,
}

pub fn reducer(state: &CounterState, action: &CounterAction) -> CounterState {
    let mut next = state.clone();
    match action {
        CounterAction::Increment { by } => next.count += by,
        CounterAction::Reset => next.count = 0,
        CounterAction::FetchStarted { id } => {
            next.pending.insert(*id);
        }
        CounterAction::FetchSucceeded { id, value, context } => {
            next.pending.remove(id);
            next.count += value;
            next.completed.push(FetchRecord {
                id: *id,
                value: *value,
                context: context.clone(),
            });
        }
        CounterAction::FetchFailed { id, .. } => {
            next.pending.remove(id);
            next.failed.push(*id);
        }
    }
    next
}

fn log_messages(
    _api: MiddlewareApi<CounterState, CounterAction, DemoContext>,
    next: Dispatch<CounterState, CounterAction, DemoContext>,
) -> Dispatch<CounterState, CounterAction, DemoContext> {
    Rc::new(move |message: Message<CounterState, CounterAction, DemoContext>| {
        match message.thunk_type() {
            Some(thunk_type) => debug!("Dispatching {} ({thunk_type})", message.kind()),
            None => debug!("Dispatching {}", message.kind()),
        }
        next(message)
    })
}

pub fn create_store(spawner: LocalSpawner, context: DemoContext) -> CounterStore {
    Store::with_middleware(
        reducer,
        CounterState::default(),
        vec![
            Box::new(log_messages),
            Box::new(ThunkMiddleware::with_context(spawner, context)),
        ],
    )
}
