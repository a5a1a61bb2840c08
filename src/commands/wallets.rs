// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::book::Book;
use crate::models::{Wallet, WalletKind};
use crate::utils::{bank_id, maybe_print_json, node_at_path, owner_id, parse_money, pretty_table};
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(book: &mut Book, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(book, sub)?,
        Some(("list", sub)) => list(book, sub)?,
        Some(("rm", sub)) => {
            let path = required(sub, "path")?;
            let node = node_at_path(&book.wallets, path, "Wallet")?;
            let removal = book.remove_wallet(node)?;
            println!("Removed {} wallet(s) under '{}'", removal.len(), path);
        }
        Some(("rename", sub)) => {
            let path = required(sub, "path")?;
            let node = node_at_path(&book.wallets, path, "Wallet")?;
            book.wallets_mut().rename(node, required(sub, "name")?)?;
            println!("Renamed '{}' to '{}'", path, book.wallets.path(node));
        }
        Some(("move", sub)) => {
            let path = required(sub, "path")?;
            let node = node_at_path(&book.wallets, path, "Wallet")?;
            let parent = match optional(sub, "parent") {
                Some(p) => Some(node_at_path(&book.wallets, p, "Wallet")?),
                None => None,
            };
            let position = sub.get_one::<usize>("position").copied();
            book.wallets_mut().move_node(node, parent, position)?;
            println!("Moved '{}' to '{}'", path, book.wallets.path(node));
        }
        _ => {}
    }
    Ok(())
}

fn add(book: &mut Book, sub: &clap::ArgMatches) -> Result<()> {
    let name = required(sub, "name")?;
    let mut kind = required(sub, "kind")?
        .parse::<WalletKind>()
        .map_err(|e| anyhow!(e))?;
    if let Some(bank) = optional(sub, "bank") {
        if !kind.set_bank(bank_id(book, bank)?) {
            return Err(anyhow!("A {} wallet is not held at a bank", kind.label()));
        }
    }
    if let Some(rate) = optional(sub, "percent") {
        match &mut kind {
            WalletKind::Deposit { percent, .. } => {
                *percent = rate
                    .parse::<Decimal>()
                    .map_err(|_| anyhow!("Invalid percentage '{}'", rate))?;
            }
            other => return Err(anyhow!("Only deposits carry a rate, not {}", other.label())),
        }
    }
    let owner = optional(sub, "owner").map(|o| owner_id(book, o)).transpose()?;
    let balance = parse_money(required(sub, "balance")?)?;
    let parent = match optional(sub, "parent") {
        Some(p) => Some(node_at_path(&book.wallets, p, "Wallet")?),
        None => None,
    };
    let position = sub.get_one::<usize>("position").copied();
    let mut wallet = Wallet::new(name, kind).with_balance(balance);
    wallet.owner = owner;
    let node = book.wallets_mut().insert(parent, position, wallet)?;
    println!("Added wallet '{}'", book.wallets.path(node));
    Ok(())
}

#[derive(Serialize)]
pub struct WalletRow {
    pub path: String,
    pub kind: String,
    pub owner: String,
    pub balance: String,
}

pub fn rows(book: &Book) -> Vec<WalletRow> {
    book.wallets
        .iter()
        .map(|(node, w)| WalletRow {
            path: book.wallets.path(node),
            kind: w.kind.label().to_string(),
            owner: w
                .owner
                .and_then(|id| book.owners.iter().find(|o| o.id == id))
                .map(|o| o.name.clone())
                .unwrap_or_default(),
            balance: w.balance.to_string(),
        })
        .collect()
}

fn list(book: &Book, sub: &clap::ArgMatches) -> Result<()> {
    let data = rows(book);
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| vec![r.path, r.kind, r.owner, r.balance])
            .collect();
        println!(
            "{}",
            pretty_table(&["Wallet", "Kind", "Owner", "Balance"], rows)
        );
        println!("Total: {}", book.wallet_total());
    }
    Ok(())
}
