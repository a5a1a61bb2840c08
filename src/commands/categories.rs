// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::book::Book;
use crate::models::Category;
use crate::utils::{maybe_print_json, node_at_path, parse_category_kind, pretty_table};
use anyhow::Result;
use serde::Serialize;

pub fn handle(book: &mut Book, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind = parse_category_kind(required(sub, "tree")?)?;
            let name = required(sub, "name")?;
            let parent = match optional(sub, "parent") {
                Some(p) => Some(node_at_path(book.categories(kind), p, "Category")?),
                None => None,
            };
            let position = sub.get_one::<usize>("position").copied();
            let category = if sub.get_flag("regular") {
                Category::regular(name)
            } else {
                Category::new(name)
            };
            let node = book.categories_mut(kind).insert(parent, position, category)?;
            println!("Added category '{}'", book.categories(kind).path(node));
        }
        Some(("list", sub)) => {
            let kind = parse_category_kind(required(sub, "tree")?)?;
            let tree = book.categories(kind);
            let data: Vec<CategoryRow> = tree
                .iter()
                .map(|(node, c)| CategoryRow {
                    path: tree.path(node),
                    regular: c.regular,
                })
                .collect();
            if !maybe_print_json(sub.get_flag("json"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|r| vec![r.path, if r.regular { "yes" } else { "" }.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Category", "Regular"], rows));
            }
        }
        Some(("rm", sub)) => {
            let kind = parse_category_kind(required(sub, "tree")?)?;
            let path = required(sub, "path")?;
            let node = node_at_path(book.categories(kind), path, "Category")?;
            let removal = book.remove_category(kind, node)?;
            println!("Removed {} categories under '{}'", removal.len(), path);
        }
        Some(("rename", sub)) => {
            let kind = parse_category_kind(required(sub, "tree")?)?;
            let path = required(sub, "path")?;
            let node = node_at_path(book.categories(kind), path, "Category")?;
            book.categories_mut(kind).rename(node, required(sub, "name")?)?;
            println!("Renamed '{}' to '{}'", path, book.categories(kind).path(node));
        }
        Some(("move", sub)) => {
            let kind = parse_category_kind(required(sub, "tree")?)?;
            let path = required(sub, "path")?;
            let node = node_at_path(book.categories(kind), path, "Category")?;
            let parent = match optional(sub, "parent") {
                Some(p) => Some(node_at_path(book.categories(kind), p, "Category")?),
                None => None,
            };
            let position = sub.get_one::<usize>("position").copied();
            book.move_category(kind, node, parent, position)?;
            println!("Moved '{}' to '{}'", path, book.categories(kind).path(node));
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    path: String,
    regular: bool,
}
