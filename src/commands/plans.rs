// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::required;
use crate::archive::ArchivalRef;
use crate::book::{Book, CategoryKind};
use crate::models::{Plan, Term, TransactionType};
use crate::utils::{category_id, maybe_print_json, parse_money, pretty_table};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub fn handle(book: &mut Book, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let term = required(sub, "term")?
                .parse::<Term>()
                .map_err(|e| anyhow!(e))?;
            let kind = required(sub, "type")?
                .parse::<TransactionType>()
                .map_err(|e| anyhow!(e))?;
            let ck =
                CategoryKind::of(kind).ok_or_else(|| anyhow!("Plans track income or expenses"))?;
            let plan = Plan {
                name: required(sub, "name")?.to_string(),
                kind,
                category: ArchivalRef::live(category_id(
                    book,
                    ck,
                    required(sub, "category")?,
                )?),
                amount: parse_money(required(sub, "amount")?)?,
            };
            println!("Added plan '{}'", plan.name);
            book.plans.bucket_mut(term).push(plan);
            book.touch();
        }
        Some(("list", sub)) => list(book, sub)?,
        Some(("rm", sub)) => {
            let term = required(sub, "term")?
                .parse::<Term>()
                .map_err(|e| anyhow!(e))?;
            let index = *sub.get_one::<usize>("index").unwrap_or(&0);
            let bucket = book.plans.bucket_mut(term);
            if index >= bucket.len() {
                return Err(anyhow!("No plan #{} in that term", index));
            }
            let plan = bucket.remove(index);
            book.touch();
            println!("Removed plan '{}'", plan.name);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct PlanRow {
    term: &'static str,
    index: usize,
    name: String,
    kind: String,
    category: String,
    amount: String,
}

fn list(book: &Book, sub: &clap::ArgMatches) -> Result<()> {
    let mut data = Vec::new();
    for (label, term) in [("short", Term::Short), ("middle", Term::Middle), ("long", Term::Long)] {
        for (i, p) in book.plans.bucket(term).iter().enumerate() {
            data.push(PlanRow {
                term: label,
                index: i,
                name: p.name.clone(),
                kind: p.kind.to_string(),
                category: CategoryKind::of(p.kind)
                    .map(|k| p.category.label(book.categories(k)))
                    .unwrap_or_default(),
                amount: p.amount.to_string(),
            });
        }
    }
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.term.to_string(),
                    r.index.to_string(),
                    r.name,
                    r.kind,
                    r.category,
                    r.amount,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Term", "#", "Name", "Type", "Category", "Amount"], rows)
        );
    }
    Ok(())
}
