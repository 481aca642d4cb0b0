// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use anyhow::Context;
use async_channel::Sender;
use dutiful_thunk::{thunk_as, Dispatch, GetState, Message, ThunkAction};

use crate::backend::BackendRequest;
use crate::counter::{CounterAction, CounterState, DemoContext};

pub const FETCH_COUNT: &str = "FETCH_COUNT";

pub type CounterThunk<R> = ThunkAction<CounterState, CounterAction, DemoContext, R>;

/// Asks the backend for a value, adds it to the counter and resolves with the new count.
pub fn fetch_count(id: usize, backend: Sender<BackendRequest>, fail: bool) -> CounterThunk<i64> {
    thunk_as(
        FETCH_COUNT,
        move |dispatch: Dispatch<CounterState, CounterAction, DemoContext>,
              get_state: GetState<CounterState>,
              context: DemoContext| async move {
            dispatch(Message::action(CounterAction::FetchStarted { id }));

            let (reply, replied) = async_channel::bounded(1);
            backend
                .send(BackendRequest { id, fail, reply })
                .await
                .context("backend is gone")?;

            match replied
                .recv()
                .await
                .context("backend dropped the request")?
            {
                Ok(value) => {
                    dispatch(Message::action(CounterAction::FetchSucceeded {
                        id,
                        value,
                        context,
                    }));
                    anyhow::Ok(get_state().count)
                }
                Err(reason) => {
                    dispatch(Message::action(CounterAction::FetchFailed {
                        id,
                        reason: reason.clone(),
                    }));
                    Err(anyhow::anyhow!("fetch {id} failed: {reason}"))
                }
            }
        },
    )
}
