// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use clap::ValueEnum;
use std::sync::OnceLock;

#[derive(Debug)]
pub struct GlobalConfig {
    pub reply_order: ReplyOrder,
    pub fetches: usize,
}

// The actual static variable. It starts empty and is set once in main().
pub static CONFIG: OnceLock<GlobalConfig> = OnceLock::new();

/// The order in which the simulated backend answers fetch requests.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
#[clap(rename_all = "kebab-case")]
pub enum ReplyOrder {
    #[default]
    /// Default: answer each request as soon as it arrives
    InOrder,
    /// Hold all requests back, then answer the last one first
    Reversed,
}

pub fn initialize_global_config(reply_order: &ReplyOrder, fetches: usize) {
    if CONFIG
        .set(GlobalConfig {
            reply_order: *reply_order,
            fetches,
        })
        .is_err()
    {
        eprintln!("Failed to initialize global config");
        std::process::exit(1);
    }
}

pub fn get_reply_order() -> ReplyOrder {
    CONFIG
        .get()
        .map(|config| config.reply_order)
        .unwrap_or_default()
}

pub fn get_fetches() -> usize {
    CONFIG.get().map(|config| config.fetches).unwrap_or(0)
}
