// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::book::Book;
use crate::commands::transactions::{TransactionRow, transaction_row};
use anyhow::{Result, anyhow};
use std::path::Path;

pub fn handle(book: &Book, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = required(sub, "format")?.to_lowercase();
            let out = required(sub, "out")?;
            export_transactions(book, &fmt, Path::new(out))?;
            println!("Exported transactions to {}", out);
            Ok(())
        }
        _ => Ok(()),
    }
}

pub fn export_transactions(book: &Book, fmt: &str, out: &Path) -> Result<()> {
    let rows: Vec<TransactionRow> = book
        .log
        .iter()
        .enumerate()
        .map(|(i, t)| transaction_row(book, i, t))
        .collect();

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "type", "amount", "category", "from", "to", "note", "anchored",
            ])?;
            for r in rows {
                wtr.write_record([
                    r.date,
                    r.kind,
                    r.amount,
                    r.category,
                    r.from,
                    r.to,
                    r.note,
                    r.anchored.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    Ok(())
}
