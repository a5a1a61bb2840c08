// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::book::{Book, CategoryKind};
use crate::models::{Month, Task, TransactionType};
use crate::utils::{category_id, maybe_print_json, parse_date, parse_money, pretty_table};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle(book: &mut Book, m: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(book, sub, today)?,
        Some(("list", sub)) => list(book, sub)?,
        Some(("rm", sub)) => {
            let index = *sub.get_one::<usize>("index").unwrap_or(&0);
            book.remove_task(index)?;
            println!("Removed task #{}", index);
        }
        _ => {}
    }
    Ok(())
}

fn add(book: &mut Book, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let kind = required(sub, "type")?
        .parse::<TransactionType>()
        .map_err(|e| anyhow!(e))?;
    let ck = CategoryKind::of(kind).ok_or_else(|| anyhow!("Tasks track income or expenses"))?;
    let category = category_id(book, ck, required(sub, "category")?)?;
    let amount = parse_money(required(sub, "amount")?)?;
    let month = Month::of(today);
    let from = match optional(sub, "from") {
        Some(s) => parse_date(s)?,
        None => month.first_day().unwrap_or(today),
    };
    let to = match optional(sub, "to") {
        Some(s) => parse_date(s)?,
        None => month.last_day().unwrap_or(today),
    };
    let index = book.add_task(Task::new(kind, category, from, to, amount));
    let task = book.update_task(index)?;
    println!(
        "Task #{} added: spent {} of {}, {} left",
        index, task.spent, task.amount, task.rest
    );
    Ok(())
}

#[derive(Serialize)]
struct TaskRow {
    index: usize,
    kind: String,
    category: String,
    from: String,
    to: String,
    amount: String,
    spent: String,
    rest: String,
}

fn list(book: &Book, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<TaskRow> = book
        .tasks
        .iter()
        .enumerate()
        .map(|(i, t)| TaskRow {
            index: i,
            kind: t.kind.to_string(),
            category: CategoryKind::of(t.kind)
                .map(|k| t.category.label(book.categories(k)))
                .unwrap_or_default(),
            from: t.from.to_string(),
            to: t.to.to_string(),
            amount: t.amount.to_string(),
            spent: t.spent.to_string(),
            rest: t.rest.to_string(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.index.to_string(),
                    r.kind,
                    r.category,
                    r.from,
                    r.to,
                    r.amount,
                    r.spent,
                    r.rest,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["#", "Type", "Category", "From", "To", "Amount", "Spent", "Rest"],
                rows
            )
        );
    }
    Ok(())
}
