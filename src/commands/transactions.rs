// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::archive::ArchivalRef;
use crate::book::{Book, CategoryKind};
use crate::ledger::TransactionEdit;
use crate::models::{Transaction, TransactionType};
use crate::utils::{
    category_id, maybe_print_json, parse_date, parse_money, parse_month, pretty_table, wallet_id,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle(book: &mut Book, m: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(book, sub, today)?,
        Some(("list", sub)) => list(book, sub)?,
        Some(("rm", sub)) => {
            let index = *sub.get_one::<usize>("index").unwrap_or(&0);
            let tx = book.remove_transaction(index)?;
            println!("Removed {} {} on {}", tx.kind, tx.amount, tx.date);
        }
        Some(("note", sub)) => {
            let index = *sub.get_one::<usize>("index").unwrap_or(&0);
            book.update_note(index, required(sub, "text")?)?;
            println!("Updated note of #{}", index);
        }
        Some(("set", sub)) => set(book, sub)?,
        Some(("prune", sub)) => {
            let cutoff = parse_date(required(sub, "before")?)?;
            let n = book.drop_history_before(cutoff);
            println!("Dropped {} anchored transactions before {}", n, cutoff);
        }
        _ => {}
    }
    Ok(())
}

fn category_ref(book: &Book, kind: TransactionType, path: Option<&str>) -> Result<ArchivalRef> {
    match (CategoryKind::of(kind), path) {
        (Some(ck), Some(p)) => Ok(ArchivalRef::live(category_id(book, ck, p)?)),
        _ => Ok(ArchivalRef::none()),
    }
}

fn wallet_ref(book: &Book, path: Option<&str>) -> Result<ArchivalRef> {
    match path {
        Some(p) => Ok(ArchivalRef::live(wallet_id(book, p)?)),
        None => Ok(ArchivalRef::none()),
    }
}

fn add(book: &mut Book, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let kind = required(sub, "type")?
        .parse::<TransactionType>()
        .map_err(|e| anyhow!(e))?;
    let date = match optional(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today,
    };
    let amount = parse_money(required(sub, "amount")?)?;
    if amount.is_negative() {
        return Err(anyhow!("Amount must not be negative, use --type to pick a direction"));
    }

    let mut tx = Transaction::new(date, kind, amount);
    tx.category = category_ref(book, kind, optional(sub, "category"))?;
    tx.from = wallet_ref(book, optional(sub, "from"))?;
    tx.to = wallet_ref(book, optional(sub, "to"))?;
    tx.note = optional(sub, "note").unwrap_or_default().to_string();
    book.add_transaction(tx);
    println!("Recorded pending {} of {} on {}", kind, amount, date);
    Ok(())
}

fn set(book: &mut Book, sub: &clap::ArgMatches) -> Result<()> {
    let index = *sub.get_one::<usize>("index").unwrap_or(&0);
    let field = required(sub, "field")?;
    let value = required(sub, "value")?;
    let kind = book
        .log
        .get(index)
        .map(|t| t.kind)
        .ok_or_else(|| anyhow!("No transaction #{}", index))?;
    let edit = match field {
        "date" => TransactionEdit::Date(parse_date(value)?),
        "note" => TransactionEdit::Note(value.to_string()),
        "type" => TransactionEdit::Kind(value.parse().map_err(|e: String| anyhow!(e))?),
        "amount" => TransactionEdit::Amount(parse_money(value)?),
        "category" => TransactionEdit::Category(category_ref(book, kind, Some(value))?),
        "from" => TransactionEdit::From(wallet_ref(book, Some(value))?),
        "to" => TransactionEdit::To(wallet_ref(book, Some(value))?),
        other => return Err(anyhow!("Unknown field '{}'", other)),
    };
    book.update_transaction(index, edit)?;
    println!("Updated {} of #{}", field, index);
    Ok(())
}

pub fn anchor(book: &mut Book) -> Result<()> {
    let blockers = book.anchor_blockers();
    if !blockers.is_empty() {
        let rows = blockers
            .iter()
            .map(|(i, why)| vec![i.to_string(), why.to_string()])
            .collect();
        println!("{}", pretty_table(&["#", "Blocked because"], rows));
        return Err(anyhow!("{} pending transaction(s) need fixing", blockers.len()));
    }
    match book.anchore()? {
        0 => println!("Nothing to anchor"),
        n => println!("Anchored {} transaction(s)", n),
    }
    Ok(())
}

pub fn normalize(book: &mut Book) -> Result<()> {
    let report = book.normalize_data();
    if report.changed() {
        println!(
            "Merged {} duplicate(s); collapsed transfers on {} day(s) ({} -> {})",
            report.merged,
            report.collapsed_days,
            report.transfers_removed,
            report.transfers_added
        );
    } else {
        println!("Log already normalized");
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub index: usize,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub from: String,
    pub to: String,
    pub note: String,
    pub anchored: bool,
}

pub fn transaction_row(book: &Book, index: usize, tx: &Transaction) -> TransactionRow {
    let category = match CategoryKind::of(tx.kind) {
        Some(kind) => tx.category.label(book.categories(kind)),
        None => String::new(),
    };
    TransactionRow {
        index,
        date: tx.date.to_string(),
        kind: tx.kind.to_string(),
        amount: tx.amount.to_string(),
        category,
        from: tx.from.label(&book.wallets),
        to: tx.to.label(&book.wallets),
        note: tx.note.clone(),
        anchored: book.log.is_anchored(index),
    }
}

pub fn query_rows(book: &Book, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let month = optional(sub, "month").map(parse_month).transpose()?;
    let limit = sub.get_one::<usize>("limit").copied();
    let rows = book
        .log
        .iter()
        .enumerate()
        .filter(|(_, t)| month.is_none_or(|m| t.month() == m))
        .take(limit.unwrap_or(usize::MAX))
        .map(|(i, t)| transaction_row(book, i, t))
        .collect();
    Ok(rows)
}

fn list(book: &Book, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(book, sub)?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.index.to_string(),
                    r.date,
                    r.kind,
                    r.amount,
                    r.category,
                    r.from,
                    r.to,
                    r.note,
                    if r.anchored { "" } else { "pending" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["#", "Date", "Type", "Amount", "Category", "From", "To", "Note", "State"],
                rows,
            )
        );
    }
    Ok(())
}
