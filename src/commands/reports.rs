// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::book::{Book, CategoryKind};
use crate::models::Month;
use crate::utils::{maybe_print_json, parse_category_kind, parse_date, parse_month, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle(book: &mut Book, m: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    match m.subcommand() {
        Some(("brief", sub)) => brief(book, sub)?,
        Some(("categories", sub)) => categories(book, sub, today)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct BriefRow {
    month: String,
    received: String,
    spent: String,
    regular_received: String,
    regular_spent: String,
    other_spent: String,
}

fn brief(book: &Book, sub: &clap::ArgMatches) -> Result<()> {
    let only: Option<Month> = optional(sub, "month").map(parse_month).transpose()?;
    let data: Vec<BriefRow> = book
        .stats
        .brief
        .iter()
        .rev()
        .filter(|(m, _)| only.is_none_or(|o| o == **m))
        .map(|(m, r)| BriefRow {
            month: m.to_string(),
            received: r.common.received.to_string(),
            spent: r.common.spent.to_string(),
            regular_received: r.regular.received.to_string(),
            regular_spent: r.regular.spent.to_string(),
            other_spent: r.other_spent().to_string(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.month,
                    r.received,
                    r.spent,
                    r.regular_received,
                    r.regular_spent,
                    r.other_spent,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Received", "Spent", "Regular in", "Regular out", "Other out"],
                rows
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryTotalRow {
    category: String,
    amount: String,
}

/// Window defaults to the current month.
fn categories(book: &mut Book, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let kind = parse_category_kind(required(sub, "tree")?)?;
    let month = Month::of(today);
    let from = match optional(sub, "from") {
        Some(s) => parse_date(s)?,
        None => month.first_day().unwrap_or(today),
    };
    let to = match optional(sub, "to") {
        Some(s) => parse_date(s)?,
        None => month.last_day().unwrap_or(today),
    };
    book.load_categories_statistics(from, to);

    let tree = book.categories(kind);
    let map = match kind {
        CategoryKind::Income => &book.stats.income_window,
        CategoryKind::Expense => &book.stats.expense_window,
    };
    let data: Vec<CategoryTotalRow> = tree
        .iter()
        .map(|(node, c)| CategoryTotalRow {
            category: format!("{}{}", "  ".repeat(tree.depth(node)), c.name),
            amount: map.get(c.id).to_string(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.category, r.amount])
            .collect();
        println!("{} .. {}", from, to);
        println!("{}", pretty_table(&["Category", "Turnover"], rows));
    }
    Ok(())
}
