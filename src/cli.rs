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

fn tree_arg() -> Arg {
    Arg::new("tree")
        .long("tree")
        .default_value("expense")
        .help("Category tree: income|expense")
}

fn position_arg() -> Arg {
    Arg::new("position")
        .long("position")
        .value_parser(value_parser!(usize))
        .help("Position among siblings (appends when omitted)")
}

fn named_list(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand(Command::new("add").arg(Arg::new("name").long("name").required(true)))
        .subcommand(Command::new("list").arg(json_flag()))
}

fn rename_cmd(with_tree: bool) -> Command {
    let cmd = Command::new("rename")
        .arg(Arg::new("path").long("path").required(true))
        .arg(Arg::new("name").long("name").required(true));
    if with_tree { cmd.arg(tree_arg()) } else { cmd }
}

pub fn build_cli() -> Command {
    Command::new("walletbook")
        .version(clap::crate_version!())
        .about("Hierarchical wallets and categories with an anchored transaction log")
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .global(true)
                .help("Ledger directory (default: $WALLETBOOK_DATA_DIR or the platform data dir)"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .help("Override today's date (YYYY-MM-DD)"),
        )
        .subcommand(Command::new("init").about("Create an empty ledger"))
        .subcommand(named_list("owner", "Manage wallet owners"))
        .subcommand(named_list("bank", "Manage banks wallets can be held at"))
        .subcommand(
            Command::new("wallet")
                .about("Manage the wallet tree")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("parent").long("parent"))
                        .arg(Arg::new("kind").long("kind").default_value("cash"))
                        .arg(Arg::new("balance").long("balance").default_value("0"))
                        .arg(Arg::new("owner").long("owner"))
                        .arg(
                            Arg::new("bank")
                                .long("bank")
                                .help("Bank name, for card|account|deposit"),
                        )
                        .arg(
                            Arg::new("percent")
                                .long("percent")
                                .help("Yearly rate of a deposit"),
                        )
                        .arg(position_arg()),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(Command::new("rm").arg(Arg::new("path").long("path").required(true)))
                .subcommand(rename_cmd(false))
                .subcommand(
                    Command::new("move")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(Arg::new("parent").long("parent"))
                        .arg(position_arg()),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage income and expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(tree_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("parent").long("parent"))
                        .arg(
                            Arg::new("regular")
                                .long("regular")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(position_arg()),
                )
                .subcommand(Command::new("list").arg(tree_arg()).arg(json_flag()))
                .subcommand(
                    Command::new("rm")
                        .arg(tree_arg())
                        .arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(rename_cmd(true))
                .subcommand(
                    Command::new("move")
                        .arg(tree_arg())
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(Arg::new("parent").long("parent"))
                        .arg(position_arg()),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and edit transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("month").long("month"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("index")
                            .long("index")
                            .required(true)
                            .value_parser(value_parser!(usize)),
                    ),
                )
                .subcommand(
                    Command::new("note")
                        .arg(
                            Arg::new("index")
                                .long("index")
                                .required(true)
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(Arg::new("text").long("text").required(true)),
                )
                .subcommand(
                    Command::new("set")
                        .about("Change one field of a pending transaction")
                        .arg(
                            Arg::new("index")
                                .long("index")
                                .required(true)
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("field")
                                .long("field")
                                .required(true)
                                .value_parser([
                                    "date", "note", "type", "amount", "category", "from", "to",
                                ]),
                        )
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(
                    Command::new("prune")
                        .about("Drop anchored history older than a date")
                        .arg(Arg::new("before").long("before").required(true)),
                ),
        )
        .subcommand(Command::new("anchor").about("Apply pending transactions to balances"))
        .subcommand(Command::new("normalize").about("Merge duplicates and collapse transfer chains"))
        .subcommand(
            Command::new("import").subcommand(
                Command::new("receipts")
                    .arg(Arg::new("path").long("path").required(true))
                    .arg(Arg::new("wallet").long("wallet").required(true))
                    .arg(
                        Arg::new("rule")
                            .long("rule")
                            .action(ArgAction::Append)
                            .help("PATTERN=Category/Path, first match wins"),
                    ),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(Arg::new("format").long("format").default_value("csv"))
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("stats")
                .subcommand(
                    Command::new("brief")
                        .arg(Arg::new("month").long("month"))
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("categories")
                        .arg(tree_arg())
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(json_flag()),
                ),
        )
        .subcommand(
            Command::new("task")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("type").long("type").default_value("out"))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("index")
                            .long("index")
                            .required(true)
                            .value_parser(value_parser!(usize)),
                    ),
                ),
        )
        .subcommand(
            Command::new("plan")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("term").long("term").default_value("short"))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("type").long("type").default_value("out"))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("term").long("term").required(true))
                        .arg(
                            Arg::new("index")
                                .long("index")
                                .required(true)
                                .value_parser(value_parser!(usize)),
                        ),
                ),
        )
}
