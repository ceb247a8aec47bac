// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod balance;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod fx;
pub mod ledger;
pub mod log;
pub mod models;
pub mod refresh;
pub mod statistics;
pub mod store;
pub mod utils;

pub use error::{LedgerError, LedgerResult};
