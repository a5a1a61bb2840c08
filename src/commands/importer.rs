// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::book::{Book, CategoryKind, ImportRecord, ImportRule};
use crate::utils::{category_id, parse_date, parse_money, wallet_id};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use regex::Regex;
use std::io::Read;

pub fn handle(book: &mut Book, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("receipts", sub)) => import_receipts(book, sub),
        _ => Ok(()),
    }
}

/// Parses `PATTERN=Category/Path` into a rule over the expense tree.
pub fn parse_rule(book: &Book, raw: &str) -> Result<ImportRule> {
    let (pattern, path) = raw
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Invalid rule '{}', expected PATTERN=Category/Path", raw))?;
    let pattern = pattern.trim();
    let re = Regex::new(pattern)
        .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;
    Ok(ImportRule {
        pattern: re,
        category: category_id(book, CategoryKind::Expense, path)?,
    })
}

/// Reads `date,label,amount` rows (with a header line).
pub fn read_records<R: Read>(reader: R) -> Result<Vec<ImportRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut out = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let label = rec.get(1).context("label missing")?.trim().to_string();
        let amount_raw = rec.get(2).context("amount missing")?.trim();
        let date = parse_date(date_raw)
            .with_context(|| format!("Invalid receipt date '{}'", date_raw))?;
        let amount = parse_money(amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {}", amount_raw, label))?;
        out.push(ImportRecord {
            date,
            label,
            amount,
        });
    }
    Ok(out)
}

fn import_receipts(book: &mut Book, sub: &clap::ArgMatches) -> Result<()> {
    let path = required(sub, "path")?;
    let wallet = wallet_id(book, required(sub, "wallet")?)?;
    let rules = sub
        .get_many::<String>("rule")
        .into_iter()
        .flatten()
        .map(|r| parse_rule(book, r))
        .collect::<Result<Vec<_>>>()?;

    let file = std::fs::File::open(path).with_context(|| format!("Open CSV {}", path))?;
    let records = read_records(file)?;
    let n = book.import_records(wallet, records, &rules)?;
    println!("Imported {} receipt line(s) from {} as pending expenses", n, path);
    Ok(())
}
