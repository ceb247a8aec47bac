// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::debug;

use fxledger::commands::{self, require_user};
use fxledger::{cli, config::AppConfig, db, log};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    log::init_logging(matches.get_flag("verbose"));

    let cfg = AppConfig::from_env()?;
    debug!(db = %cfg.db_path.display(), feed = %cfg.feed_url, "Loaded config");
    let mut conn = db::open_or_init(&cfg.db_path)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", cfg.db_path.display());
        }
        Some(("user", sub)) => commands::users::handle(&conn, sub)?,
        Some(("account", sub)) => {
            commands::accounts::handle(&mut conn, require_user(&matches)?, sub)?
        }
        Some(("category", sub)) => {
            commands::categories::handle(&conn, require_user(&matches)?, sub)?
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, require_user(&matches)?, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, require_user(&matches)?, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&conn, &cfg, sub).await?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
