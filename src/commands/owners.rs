// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::book::Book;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct NamedRow {
    name: String,
    wallets: usize,
}

/// `owner add|list`
pub fn handle_owner(book: &mut Book, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            book.add_owner(name)?;
            println!("Added owner '{}'", name);
        }
        Some(("list", sub)) => {
            let data: Vec<NamedRow> = book
                .owners
                .iter()
                .map(|o| NamedRow {
                    name: o.name.clone(),
                    wallets: book
                        .wallets
                        .iter()
                        .filter(|(_, w)| w.owner == Some(o.id))
                        .count(),
                })
                .collect();
            print_named(sub, "Owner", data)?;
        }
        _ => {}
    }
    Ok(())
}

/// `bank add|list`
pub fn handle_bank(book: &mut Book, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            book.add_bank(name)?;
            println!("Added bank '{}'", name);
        }
        Some(("list", sub)) => {
            let data: Vec<NamedRow> = book
                .banks
                .iter()
                .map(|b| NamedRow {
                    name: b.name.clone(),
                    wallets: book
                        .wallets
                        .iter()
                        .filter(|(_, w)| w.kind.bank() == Some(b.id))
                        .count(),
                })
                .collect();
            print_named(sub, "Bank", data)?;
        }
        _ => {}
    }
    Ok(())
}

fn print_named(sub: &clap::ArgMatches, title: &str, data: Vec<NamedRow>) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.name, r.wallets.to_string()])
            .collect();
        println!("{}", pretty_table(&[title, "Wallets"], rows));
    }
    Ok(())
}
