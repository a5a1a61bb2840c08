// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use walletbook::{cli, commands, storage, utils};

fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = storage::Config::resolve(matches.get_one::<String>("data_dir").map(String::as_str))?;
    let today = utils::today(matches.get_one::<String>("today").map(String::as_str))?;
    let mut book = storage::load(&cfg)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            book.touch();
            println!("Ledger initialized at {}", cfg.data_dir.display());
        }
        Some(("owner", sub)) => commands::owners::handle_owner(&mut book, sub)?,
        Some(("bank", sub)) => commands::owners::handle_bank(&mut book, sub)?,
        Some(("wallet", sub)) => commands::wallets::handle(&mut book, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut book, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut book, sub, today)?,
        Some(("anchor", _)) => commands::transactions::anchor(&mut book)?,
        Some(("normalize", _)) => commands::transactions::normalize(&mut book)?,
        Some(("import", sub)) => commands::importer::handle(&mut book, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&book, sub)?,
        Some(("stats", sub)) => commands::reports::handle(&mut book, sub, today)?,
        Some(("task", sub)) => commands::tasks::handle(&mut book, sub, today)?,
        Some(("plan", sub)) => commands::plans::handle(&mut book, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    storage::save(&cfg, &mut book)?;
    Ok(())
}
