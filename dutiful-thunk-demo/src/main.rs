// SPDX-License-Identifier: MIT
// counter-demo: drives a counter store with thunk actions
//
// - Dispatches a number of fetch thunks that talk to a simulated backend.
// - Waits for their completions and prints the final state as JSON.
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use dutiful_thunk::Message;
use futures::executor::LocalPool;
use futures::future::join_all;
use futures::task::LocalSpawnExt;
use log::{info, warn};

pub mod backend;
pub mod counter;
pub mod global_config;
pub mod thunks;

use crate::counter::CounterAction;
use crate::global_config::{get_fetches, get_reply_order, ReplyOrder};

const MAX_FETCHES: usize = 64;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Context value handed to every thunk
    #[arg(long, default_value = "demo")]
    context: String,

    /// Number of fetch thunks to dispatch
    #[arg(long, default_value_t = 3)]
    fetches: usize,

    /// Plain action to dispatch after the thunks (JSON encoded), e.g. {"action":"increment","by":2}
    #[arg(long, value_name = "JSON")]
    action: Option<String>,

    /// Make the fetch with this index fail
    #[arg(long = "fail-fetch", value_name = "INDEX")]
    fail_fetch: Option<usize>,

    /// Order in which the backend answers
    #[arg(long, value_enum, default_value_t)]
    reply_order: ReplyOrder,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn validate_args(args: &Args) -> Result<(), String> {
    if args.fetches == 0 || args.fetches > MAX_FETCHES {
        return Err(format!("--fetches must be between 1 and {MAX_FETCHES}"));
    }

    if let Some(index) = args.fail_fetch {
        if index >= args.fetches {
            return Err(format!(
                "--fail-fetch must be smaller than --fetches ({})",
                args.fetches
            ));
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    let extra_action = args
        .action
        .as_deref()
        .map(serde_json::from_str::<CounterAction>)
        .transpose()
        .context("invalid action JSON")?;

    global_config::initialize_global_config(&args.reply_order, args.fetches);

    let mut pool = LocalPool::new();
    let (backend, requests) = async_channel::unbounded();
    pool.spawner()
        .spawn_local(backend::serve(requests, get_reply_order(), get_fetches()))
        .context("failed to spawn the backend")?;

    let store = counter::create_store(pool.spawner(), args.context.clone());
    store.subscribe(|state| log::debug!("State is now {state:?}"));

    info!("Dispatching {} fetches", get_fetches());
    let fetches: Vec<_> = (0..get_fetches())
        .map(|id| {
            let fetch = Rc::new(thunks::fetch_count(
                id,
                backend.clone(),
                args.fail_fetch == Some(id),
            ));
            // the store hands the very same action back
            let _ = store.dispatch(Message::from(Rc::clone(&fetch)));
            (id, fetch)
        })
        .collect();
    drop(backend);

    if let Some(action) = extra_action {
        store.dispatch(Message::action(action));
    }

    let outcomes = pool.run_until(join_all(
        fetches.iter().map(|(_, fetch)| fetch.completion().clone()),
    ));
    for ((id, fetch), outcome) in fetches.iter().zip(outcomes) {
        match outcome {
            Ok(count) => info!(
                "{} #{id} settled, count was {count}",
                fetch.thunk_type().unwrap_or("thunk")
            ),
            Err(e) => warn!("{} #{id}: {e}", fetch.thunk_type().unwrap_or("thunk")),
        }
    }

    println!("{}", serde_json::to_string_pretty(&store.get_state())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["counter-demo"]).unwrap();
        assert_eq!(args.context, "demo");
        assert_eq!(args.fetches, 3);
        assert_eq!(args.action, None);
        assert_eq!(args.fail_fetch, None);
        assert_eq!(args.reply_order, ReplyOrder::InOrder);
        assert_eq!(args.log_level, "info");
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_rejects_out_of_range_values() {
        let args =
            Args::try_parse_from(["counter-demo", "--fetches", "2", "--fail-fetch", "2"]).unwrap();
        assert!(validate_args(&args).is_err());

        let args = Args::try_parse_from(["counter-demo", "--fetches", "0"]).unwrap();
        assert!(validate_args(&args).is_err());

        let args = Args::try_parse_from([
            "counter-demo",
            "--fetches",
            "4",
            "--fail-fetch",
            "3",
            "--reply-order",
            "reversed",
        ])
        .unwrap();
        assert_eq!(args.reply_order, ReplyOrder::Reversed);
        assert!(validate_args(&args).is_ok());
    }
}
