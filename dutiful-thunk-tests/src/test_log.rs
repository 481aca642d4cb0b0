// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::cell::RefCell;
use std::rc::Rc;

use dutiful_thunk::{Action, Dispatch, Message, MiddlewareApi};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggedMessage {
    pub kind: String,

    pub thunk_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct TestLog {
    pub messages: Vec<LoggedMessage>,
}

impl TestLog {
    pub fn shared() -> Rc<RefCell<TestLog>> {
        Rc::new(RefCell::new(TestLog::default()))
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.kind.as_str()).collect()
    }
}

/// Middleware that appends every message passing through it to `log`.
pub fn recorder<S, A, C>(
    log: Rc<RefCell<TestLog>>,
) -> impl Fn(MiddlewareApi<S, A, C>, Dispatch<S, A, C>) -> Dispatch<S, A, C>
where
    S: 'static,
    A: Action,
    C: 'static,
{
    move |_api: MiddlewareApi<S, A, C>, next: Dispatch<S, A, C>| {
        let log = Rc::clone(&log);
        let handler: Dispatch<S, A, C> = Rc::new(move |message: Message<S, A, C>| {
            log.borrow_mut().messages.push(LoggedMessage {
                kind: message.kind().to_string(),
                thunk_type: message.thunk_type().map(str::to_string),
            });
            next(message)
        });
        handler
    }
}
