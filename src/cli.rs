// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn amount_arg() -> Arg {
    Arg::new("amount")
        .long("amount")
        .allow_negative_numbers(true)
        .help("Signed amount: positive is income, negative is expense")
}

pub fn build_cli() -> Command {
    Command::new("fxledger")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Multi-currency personal ledger with FX-normalized statistics")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .arg(
            Arg::new("user")
                .short('u')
                .long("user")
                .global(true)
                .env("FXLEDGER_USER")
                .value_parser(value_parser!(i64))
                .help("Acting user id"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("email").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(Arg::new("comment").long("comment").default_value("")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(Command::new("show").arg(id_arg("id", "Account id")).arg(json_flag()))
                .subcommand(
                    Command::new("comment")
                        .arg(id_arg("id", "Account id"))
                        .arg(Arg::new("text").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete an account and its transactions")
                        .arg(id_arg("id", "Account id")),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(Command::new("add").arg(Arg::new("name").required(true)))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(id_arg("id", "Category id"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(amount_arg().required(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("comment").long("comment").default_value(""))
                        .arg(
                            Arg::new("at")
                                .long("at")
                                .help("Timestamp YYYY-MM-DD[ HH:MM[:SS]] (UTC), default now"),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg("id", "Transaction id"))
                        .arg(amount_arg())
                        .arg(Arg::new("comment").long("comment"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .value_parser(value_parser!(i64))
                                .conflicts_with("clear-category"),
                        )
                        .arg(
                            Arg::new("clear-category")
                                .long("clear-category")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg("id", "Transaction id"))),
        )
        .subcommand(
            Command::new("report")
                .about("Balances and statistics")
                .subcommand(
                    Command::new("balances")
                        .arg(Arg::new("currency").long("currency"))
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("stats")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("currency").long("currency"))
                        .arg(json_flag()),
                ),
        )
        .subcommand(
            Command::new("fx")
                .about("Exchange rates")
                .subcommand(
                    Command::new("set-currency")
                        .about("Set the default reporting currency")
                        .arg(Arg::new("currency").required(true)),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("convert")
                        .arg(
                            Arg::new("amount")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("from").required(true))
                        .arg(Arg::new("to").required(true)),
                )
                .subcommand(Command::new("refresh").about("Run one refresh cycle"))
                .subcommand(
                    Command::new("watch")
                        .about("Refresh rates periodically until interrupted")
                        .arg(
                            Arg::new("interval")
                                .long("interval")
                                .value_parser(value_parser!(u64))
                                .help("Seconds between refreshes"),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check for currencies without rates"))
}
