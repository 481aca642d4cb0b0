use super::*;
use crate::action::{Action, Dispatch, GetState, Message, ACTION_TYPE};
use crate::error::ThunkError;

use futures::executor::{block_on, LocalPool};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
struct Hello;

impl Action for Hello {
    fn action_type(&self) -> &str {
        "HELLO"
    }
}

type TestThunk<R> = ThunkAction<(), Hello, (), R>;

fn dispatch() -> Dispatch<(), Hello, ()> {
    Rc::new(|message: Message<(), Hello, ()>| message)
}

fn get_state() -> GetState<()> {
    Rc::new(|| ())
}

#[test]
fn test_thunk_wraps_a_work_function() {
    let mut pool = LocalPool::new();
    let action: TestThunk<i32> = thunk(|_, _, _| async { anyhow::Ok(42) });

    let completion = action.run(dispatch(), get_state(), (), &pool.spawner());

    assert_eq!(pool.run_until(completion).unwrap(), 42);
}

#[test]
fn test_completion_provides_the_return_value() {
    let mut pool = LocalPool::new();
    let action: TestThunk<&'static str> = thunk(|_, _, _| async { anyhow::Ok("return value") });

    let _ = action.run(dispatch(), get_state(), (), &pool.spawner());

    assert_eq!(
        pool.run_until(action.completion().clone()).unwrap(),
        "return value"
    );
}

#[test]
fn test_run_returns_the_same_completion() {
    let pool = LocalPool::new();
    let action: TestThunk<()> = thunk(|_, _, _| async { anyhow::Ok(()) });

    let completion = action.run(dispatch(), get_state(), (), &pool.spawner());

    assert!(completion.ptr_eq(action.completion()));
}

#[test]
fn test_thunk_has_no_thunk_type() {
    let action: TestThunk<()> = thunk(|_, _, _| async { anyhow::Ok(()) });
    assert_eq!(action.thunk_type(), None);
    assert_eq!(action.kind(), ACTION_TYPE);
}

#[test]
fn test_thunk_as_sets_the_thunk_type() {
    let action: TestThunk<()> = thunk_as("SOME_ACTION_NAME", |_, _, _| async { anyhow::Ok(()) });
    assert_eq!(action.thunk_type(), Some("SOME_ACTION_NAME"));
    assert_eq!(action.kind(), ACTION_TYPE);

    let untyped: TestThunk<()> = thunk_as(None::<String>, |_, _, _| async { anyhow::Ok(()) });
    assert_eq!(untyped.thunk_type(), None);
}

#[test]
fn test_work_function_is_not_called_at_construction() {
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let action: TestThunk<()> = thunk(move |_, _, _| {
        c.set(c.get() + 1);
        async { anyhow::Ok(()) }
    });

    assert_eq!(calls.get(), 0);
    assert!(!action.completion().is_settled());
}

#[test]
fn test_work_function_starts_in_the_calling_turn() {
    let pool = LocalPool::new();
    let steps = Rc::new(Cell::new(0));
    let s = steps.clone();
    let action: TestThunk<()> = thunk(move |_, _, _| async move {
        s.set(1);
        futures::future::pending::<()>().await;
        s.set(2);
        anyhow::Ok(())
    });

    let completion = action.run(dispatch(), get_state(), (), &pool.spawner());

    // runs up to the first pending await before run returns
    assert_eq!(steps.get(), 1);
    assert!(!completion.is_settled());
}

#[test]
fn test_work_without_awaits_settles_before_run_returns() {
    let pool = LocalPool::new();
    let action: TestThunk<i32> = thunk(|_, _, _| async { anyhow::Ok(5) });

    let completion = action.run(dispatch(), get_state(), (), &pool.spawner());

    assert_eq!(completion.try_get().map(|r| r.unwrap()), Some(5));
}

#[test]
fn test_work_resumes_on_the_pool_after_pending() {
    let mut pool = LocalPool::new();
    let (tx, rx) = futures::channel::oneshot::channel::<i32>();
    let action: TestThunk<i32> = thunk(move |_, _, _| async move {
        let value = rx.await?;
        anyhow::Ok(value * 2)
    });

    let completion = action.run(dispatch(), get_state(), (), &pool.spawner());
    assert!(!completion.is_settled());

    tx.send(21).unwrap();
    assert_eq!(pool.run_until(completion).unwrap(), 42);
}

#[test]
fn test_failure_rejects_the_completion() {
    let mut pool = LocalPool::new();
    let action: TestThunk<i32> = thunk(|_, _, _| async { Err(anyhow::anyhow!("boom")) });

    let completion = action.run(dispatch(), get_state(), (), &pool.spawner());
    let err = pool.run_until(completion).unwrap_err();

    assert!(matches!(err, ThunkError::Failed(_)));
    assert_eq!(err.failure().unwrap().to_string(), "boom");
    assert!(matches!(
        action.completion().try_get(),
        Some(Err(ThunkError::Failed(_)))
    ));
}

#[test]
fn test_duplicate_run_calls_the_work_function_once() {
    let mut pool = LocalPool::new();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let action: TestThunk<u32> = thunk(move |_, _, _| {
        c.set(c.get() + 1);
        let n = c.get();
        async move { anyhow::Ok(n) }
    });

    let first = action.run(dispatch(), get_state(), (), &pool.spawner());
    let second = action.run(dispatch(), get_state(), (), &pool.spawner());
    pool.run_until_stalled();

    assert_eq!(calls.get(), 1);
    assert!(first.ptr_eq(&second));
    assert_eq!(block_on(second).unwrap(), 1);
}

#[test]
fn test_panic_while_calling_the_work_function_rejects() {
    let pool = LocalPool::new();
    let action: TestThunk<()> = thunk(|_, _, _| -> futures::future::Ready<anyhow::Result<()>> {
        panic!("sync panic")
    });

    let completion = action.run(dispatch(), get_state(), (), &pool.spawner());

    match completion.try_get() {
        Some(Err(ThunkError::Panicked(message))) => assert_eq!(message, "sync panic"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_panic_inside_the_work_future_rejects() {
    let mut pool = LocalPool::new();
    let action: TestThunk<()> = thunk(|_, _, _| async {
        if true {
            panic!("async panic");
        }
        anyhow::Ok(())
    });

    let completion = action.run(dispatch(), get_state(), (), &pool.spawner());
    let err = pool.run_until(completion).unwrap_err();

    assert!(matches!(err, ThunkError::Panicked(ref m) if m == "async panic"));
}

#[test]
fn test_dropping_an_unexecuted_thunk_abandons_it() {
    let action: TestThunk<()> = thunk(|_, _, _| async { anyhow::Ok(()) });
    let completion = action.completion().clone();
    assert!(completion.try_get().is_none());

    drop(action);

    assert!(matches!(block_on(completion), Err(ThunkError::Abandoned)));
}

#[test]
fn test_spawn_failure_abandons_the_thunk() {
    let spawner = {
        let pool = LocalPool::new();
        pool.spawner()
    };
    let action: TestThunk<()> = thunk(|_, _, _| async {
        futures::future::pending::<()>().await;
        anyhow::Ok(())
    });

    let completion = action.run(dispatch(), get_state(), (), &spawner);

    assert!(matches!(block_on(completion), Err(ThunkError::Abandoned)));
}

#[test]
fn test_work_function_receives_the_injected_capabilities() {
    let mut pool = LocalPool::new();
    let seen = Rc::new(Cell::new(false));
    let s = seen.clone();
    let dispatch: Dispatch<u8, Hello, u8> = Rc::new(move |message| {
        s.set(true);
        message
    });
    let get_state: GetState<u8> = Rc::new(|| 7);

    let action = thunk(|dispatch: Dispatch<u8, Hello, u8>, get_state: GetState<u8>, ctx: u8| async move {
        dispatch(Message::action(Hello));
        anyhow::Ok(get_state() + ctx)
    });

    let completion = action.run(dispatch, get_state, 3, &pool.spawner());

    assert_eq!(pool.run_until(completion).unwrap(), 10);
    assert!(seen.get());
}
