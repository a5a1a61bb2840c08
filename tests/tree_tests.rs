// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use uuid::Uuid;
use walletbook::models::{Category, Task, Transaction, TransactionType, Wallet, WalletKind};
use walletbook::tree::Tree;
use walletbook::{ArchivalRef, Book, CategoryKind, LedgerError, Money};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
}

/// Food -> {Bread, Sweets -> Candy}, Rent
fn setup() -> (Tree<Category>, [Uuid; 5]) {
    let mut tree = Tree::new();
    let food = Category::new("Food");
    let bread = Category::new("Bread");
    let sweets = Category::new("Sweets");
    let candy = Category::new("Candy");
    let rent = Category::regular("Rent");
    let ids = [food.id, bread.id, sweets.id, candy.id, rent.id];

    let f = tree.push(None, food).unwrap();
    tree.push(Some(f), bread).unwrap();
    let s = tree.push(Some(f), sweets).unwrap();
    tree.push(Some(s), candy).unwrap();
    tree.push(None, rent).unwrap();
    (tree, ids)
}

#[test]
fn paths_are_resolved_both_ways() {
    let (tree, [food, _, _, candy, rent]) = setup();

    let node = tree.find_path("Food/Sweets/Candy").unwrap();
    assert_eq!(tree.get(node).unwrap().id, candy);
    assert_eq!(tree.path_of(candy).unwrap(), "Food/Sweets/Candy");
    assert_eq!(tree.depth(node), 2);
    assert!(tree.find_path("Food/Candy").is_none());
    assert!(tree.find_path("Rent/Anything").is_none());

    let food_node = tree.node_of(food).unwrap();
    assert!(tree.is_in_subtree(node, food_node));
    assert!(!tree.is_in_subtree(tree.node_of(rent).unwrap(), food_node));
}

#[test]
fn insert_respects_position_and_rejects_duplicates() {
    let (mut tree, [food, bread, ..]) = setup();
    let food_node = tree.node_of(food).unwrap();
    let milk = Category::new("Milk");
    let milk_id = milk.id;

    tree.insert(Some(food_node), Some(0), milk).unwrap();
    let names: Vec<&str> = tree
        .children(food_node)
        .iter()
        .map(|c| tree.get(*c).unwrap().name.as_str())
        .collect();
    assert_eq!(names, vec!["Milk", "Bread", "Sweets"]);

    let mut again = Category::new("Copy");
    again.id = bread;
    let err = tree.push(None, again).unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateId(id) if id == bread));
    assert!(tree.contains(milk_id));
}

#[test]
fn moving_into_own_subtree_is_rejected() {
    let (mut tree, [food, _, sweets, candy, rent]) = setup();
    let food_node = tree.node_of(food).unwrap();
    let candy_node = tree.node_of(candy).unwrap();

    let err = tree.move_node(food_node, Some(candy_node), None).unwrap_err();
    assert!(matches!(err, LedgerError::CyclicMove));

    let sweets_node = tree.node_of(sweets).unwrap();
    let rent_node = tree.node_of(rent).unwrap();
    tree.move_node(sweets_node, Some(rent_node), None).unwrap();
    assert_eq!(tree.path_of(candy).unwrap(), "Rent/Sweets/Candy");
    assert_eq!(tree.children(food_node).len(), 1);
}

#[test]
fn removal_reports_every_descendant_with_its_path() {
    let (mut tree, [food, bread, sweets, candy, rent]) = setup();
    let food_node = tree.node_of(food).unwrap();

    let removal = tree.remove(food_node).unwrap();

    assert_eq!(removal.len(), 4);
    assert_eq!(removal.path_of(candy), Some("Food/Sweets/Candy"));
    assert_eq!(removal.path_of(bread), Some("Food/Bread"));
    for id in [food, bread, sweets, candy] {
        assert!(!tree.contains(id));
    }
    assert!(tree.contains(rent));
    assert_eq!(tree.len(), 1);
}

#[test]
fn flat_form_rebuilds_the_same_shape() {
    let (tree, [_, _, _, candy, rent]) = setup();

    let rebuilt = Tree::from_flat(tree.flatten()).unwrap();

    assert_eq!(rebuilt.len(), tree.len());
    assert_eq!(rebuilt.roots().len(), 2);
    assert_eq!(rebuilt.path_of(candy).unwrap(), "Food/Sweets/Candy");
    assert_eq!(rebuilt.path_of(rent).unwrap(), "Rent");
}

#[test]
fn reference_serializes_as_ref_or_archive() {
    let id = Uuid::new_v4();

    let live = serde_json::to_value(ArchivalRef::live(id)).unwrap();
    assert_eq!(live, serde_json::json!({ "ref": id.to_string() }));

    let none = serde_json::to_value(ArchivalRef::none()).unwrap();
    assert_eq!(none, serde_json::json!({ "ref": Uuid::nil().to_string() }));

    let archived: ArchivalRef =
        serde_json::from_value(serde_json::json!({ "archive": "Food/Bread" })).unwrap();
    assert_eq!(archived, ArchivalRef::Archived("Food/Bread".into()));

    let nil: ArchivalRef =
        serde_json::from_value(serde_json::json!({ "ref": Uuid::nil().to_string() })).unwrap();
    assert!(nil.is_none());
}

#[test]
fn removing_a_category_archives_transactions_tasks_and_plans() {
    let mut book = Book::new();
    let wallet = Wallet::new("Cash", WalletKind::Cash);
    let wallet_id = wallet.id;
    book.wallets.push(None, wallet).unwrap();
    let (tree, [food, bread, _, candy, rent]) = setup();
    book.expense = tree;

    book.add_transaction(Transaction::expense(d(3), Money::from_units(10), wallet_id, bread));
    book.add_transaction(Transaction::expense(d(4), Money::from_units(20), wallet_id, candy));
    book.add_transaction(Transaction::expense(d(5), Money::from_units(30), wallet_id, rent));
    book.add_task(Task::new(TransactionType::Out, food, d(1), d(31), Money::from_units(100)));
    book.plans.short.push(walletbook::models::Plan {
        name: "treats".into(),
        kind: TransactionType::Out,
        category: ArchivalRef::live(candy),
        amount: Money::from_units(5),
    });

    let node = book.expense.node_of(food).unwrap();
    book.remove_category(CategoryKind::Expense, node).unwrap();

    let categories: Vec<ArchivalRef> = book.log.iter().map(|t| t.category.clone()).collect();
    assert_eq!(
        categories,
        vec![
            ArchivalRef::live(rent),
            ArchivalRef::Archived("Food/Sweets/Candy".into()),
            ArchivalRef::Archived("Food/Bread".into()),
        ]
    );
    assert_eq!(book.tasks[0].category, ArchivalRef::Archived("Food".into()));
    assert_eq!(book.tasks[0].spent, Money::ZERO);
    assert_eq!(
        book.plans.short[0].category,
        ArchivalRef::Archived("Food/Sweets/Candy".into())
    );
    assert!(book.log.iter().all(|t| t.from == ArchivalRef::live(wallet_id)));
}

#[test]
fn removing_a_wallet_archives_both_ends_of_transfers() {
    let mut book = Book::new();
    let bank = Wallet::new("Bank", WalletKind::Common);
    let card = Wallet::new("Card", WalletKind::Card { bank: None });
    let cash = Wallet::new("Cash", WalletKind::Cash);
    let (card_id, cash_id) = (card.id, cash.id);
    let bank_node = book.wallets.push(None, bank).unwrap();
    book.wallets.push(Some(bank_node), card).unwrap();
    book.wallets.push(None, cash).unwrap();

    book.add_transaction(Transaction::transfer(d(7), Money::from_units(40), cash_id, card_id));
    book.add_transaction(Transaction::transfer(d(8), Money::from_units(15), card_id, cash_id));

    book.remove_wallet(bank_node).unwrap();

    let newest = book.log.get(0).unwrap();
    assert_eq!(newest.from, ArchivalRef::Archived("Bank/Card".into()));
    assert_eq!(newest.to, ArchivalRef::live(cash_id));
    let oldest = book.log.get(1).unwrap();
    assert_eq!(oldest.to, ArchivalRef::Archived("Bank/Card".into()));
    assert_eq!(oldest.from, ArchivalRef::live(cash_id));
    assert!(!book.can_anchore());
    assert_eq!(book.log.get(0).unwrap().from.label(&book.wallets), "[Bank/Card]");
}

#[test]
fn rename_keeps_siblings_unique() {
    let (mut tree, [food, _, sweets, candy, _]) = setup();
    let sweets_node = tree.node_of(sweets).unwrap();

    tree.rename(sweets_node, "Treats").unwrap();
    assert_eq!(tree.path_of(candy).unwrap(), "Food/Treats/Candy");

    let err = tree.rename(sweets_node, "Bread").unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateName(_)));
    assert!(matches!(
        tree.rename(sweets_node, "A/B").unwrap_err(),
        LedgerError::InvalidName(_)
    ));

    let food_node = tree.node_of(food).unwrap();
    let err = tree.push(Some(food_node), Category::new("Bread")).unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateName(name) if name == "Bread"));
    assert!(matches!(
        tree.require_path("Food/Sweets").unwrap_err(),
        LedgerError::UnknownPath(_)
    ));
}

#[test]
fn owners_and_banks_reject_duplicates() {
    let mut book = Book::new();
    let owner = book.add_owner("Alex").unwrap();
    assert!(book.add_owner(" Alex ").is_err());
    let bank = book.add_bank("First Bank").unwrap();

    let mut kind = WalletKind::Card { bank: None };
    assert!(kind.set_bank(bank));
    assert_eq!(kind.bank(), Some(bank));
    assert!(!WalletKind::Cash.set_bank(bank));

    let mut wallet = Wallet::new("Visa", kind);
    wallet.owner = Some(owner);
    let json = serde_json::to_value(&wallet).unwrap();
    assert_eq!(json["kind"], "card");
    assert_eq!(json["bank"], bank.to_string());
    let back: Wallet = serde_json::from_value(json).unwrap();
    assert_eq!(back, wallet);
}
