// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod categories;
pub mod doctor;
pub mod fx;
pub mod reports;
pub mod transactions;
pub mod users;

use anyhow::{Context, Result};

/// The acting user from `--user` / `FXLEDGER_USER`.
pub fn require_user(m: &clap::ArgMatches) -> Result<i64> {
    m.get_one::<i64>("user")
        .copied()
        .context("No user selected; pass --user <ID> or set FXLEDGER_USER")
}
