// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use uuid::Uuid;
use walletbook::models::{Category, Month, Transaction, Wallet, WalletKind};
use walletbook::{AnchorBlock, ArchivalRef, Book, LedgerError, Money};

struct Fixture {
    book: Book,
    cash: Uuid,
    card: Uuid,
    food: Uuid,
    bread: Uuid,
    rent: Uuid,
    salary: Uuid,
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
}

fn setup() -> Fixture {
    let mut book = Book::new();
    let cash = Wallet::new("Cash", WalletKind::Cash);
    let card = Wallet::new("Card", WalletKind::Card { bank: None }).with_balance(Money::from_units(1000));
    let (cash_id, card_id) = (cash.id, card.id);
    book.wallets.push(None, cash).unwrap();
    book.wallets.push(None, card).unwrap();

    let food = Category::new("Food");
    let bread = Category::new("Bread");
    let rent = Category::regular("Rent");
    let (food_id, bread_id, rent_id) = (food.id, bread.id, rent.id);
    let food_node = book.expense.push(None, food).unwrap();
    book.expense.push(Some(food_node), bread).unwrap();
    book.expense.push(None, rent).unwrap();

    let salary = Category::regular("Salary");
    let salary_id = salary.id;
    book.income.push(None, salary).unwrap();

    Fixture {
        book,
        cash: cash_id,
        card: card_id,
        food: food_id,
        bread: bread_id,
        rent: rent_id,
        salary: salary_id,
    }
}

#[test]
fn out_transaction_updates_balance_brief_and_category_chain() {
    let mut f = setup();
    f.book
        .add_transaction(Transaction::expense(d(10), Money::from_units(500), f.cash, f.bread));

    assert_eq!(f.book.anchore().unwrap(), 1);

    let cash = f.book.wallets.find(f.cash).unwrap();
    assert_eq!(cash.balance, Money::from_units(-500));
    let brief = f.book.stats.brief_for(Month::new(2025, 8));
    assert_eq!(brief.common.spent, Money::from_cents(50000));
    assert_eq!(brief.regular.spent, Money::ZERO);
    assert_eq!(f.book.stats.expense_total.get(f.food), Money::from_units(500));
    assert_eq!(f.book.stats.expense_total.get(f.bread), Money::from_units(500));
}

#[test]
fn balance_deltas_equal_signed_amounts() {
    let mut f = setup();
    let before = f.book.wallet_total();
    f.book
        .add_transaction(Transaction::expense(d(1), Money::from_cents(1234), f.card, f.bread));
    f.book
        .add_transaction(Transaction::income(d(2), Money::from_cents(250_000), f.cash, f.salary));
    f.book
        .add_transaction(Transaction::transfer(d(3), Money::from_cents(9_999), f.cash, f.card));
    f.book
        .add_transaction(Transaction::expense(d(4), Money::from_cents(80_000), f.card, f.rent));

    f.book.anchore().unwrap();

    let expected = Money::from_cents(250_000 - 1234 - 80_000);
    assert_eq!(f.book.wallet_total() - before, expected);
    assert_eq!(
        f.book.wallets.find(f.cash).unwrap().balance,
        Money::from_cents(250_000 - 9_999)
    );
    let brief = f.book.stats.brief_for(Month::new(2025, 8));
    assert_eq!(brief.common.received, Money::from_cents(250_000));
    assert_eq!(brief.regular.received, Money::from_cents(250_000));
    assert_eq!(brief.regular.spent, Money::from_cents(80_000));
    assert_eq!(brief.other_spent(), Money::from_cents(1234));
}

#[test]
fn second_anchor_is_a_no_op() {
    let mut f = setup();
    f.book
        .add_transaction(Transaction::expense(d(5), Money::from_units(20), f.cash, f.bread));
    assert_eq!(f.book.anchore().unwrap(), 1);
    assert_eq!(f.book.log.unanchored(), 0);

    assert_eq!(f.book.anchore().unwrap(), 0);
    assert_eq!(
        f.book.wallets.find(f.cash).unwrap().balance,
        Money::from_units(-20)
    );
    assert_eq!(f.book.stats.expense_total.get(f.food), Money::from_units(20));
}

#[test]
fn anchoring_refused_while_category_missing() {
    let mut f = setup();
    let mut tx = Transaction::expense(d(6), Money::from_units(3), f.cash, f.bread);
    tx.category = ArchivalRef::none();
    f.book.add_transaction(tx);

    assert!(!f.book.can_anchore());
    match f.book.anchore() {
        Err(LedgerError::NotAnchorable { index, reason }) => {
            assert_eq!(index, 0);
            assert_eq!(reason, AnchorBlock::MissingCategory);
        }
        other => panic!("expected refusal, got {:?}", other),
    }
    assert_eq!(f.book.log.unanchored(), 1);
    assert_eq!(f.book.wallets.find(f.cash).unwrap().balance, Money::ZERO);
}

#[test]
fn transfer_needs_both_wallets() {
    let mut f = setup();
    let mut tx = Transaction::transfer(d(7), Money::from_units(3), f.cash, f.card);
    tx.to = ArchivalRef::Archived("Old card".into());
    f.book.add_transaction(tx);

    let blockers = f.book.anchor_blockers();
    assert_eq!(blockers, vec![(0, AnchorBlock::MissingTarget)]);
}

#[test]
fn transient_import_note_is_cleared_on_anchor() {
    let mut f = setup();
    f.book.add_transaction(
        Transaction::expense(d(8), Money::from_units(4), f.cash, f.bread).with_note("~BAKERY 12"),
    );
    f.book.add_transaction(
        Transaction::expense(d(8), Money::from_units(4), f.cash, f.food).with_note("lunch"),
    );
    f.book.anchore().unwrap();

    let notes: Vec<&str> = f.book.log.iter().map(|t| t.note.as_str()).collect();
    assert_eq!(notes, vec!["lunch", ""]);
}

#[test]
fn anchored_entries_are_immutable() {
    let mut f = setup();
    f.book
        .add_transaction(Transaction::expense(d(9), Money::from_units(1), f.cash, f.bread));
    f.book.anchore().unwrap();

    assert!(matches!(
        f.book.remove_transaction(0),
        Err(LedgerError::AnchoredEntry(0))
    ));
    f.book.update_note(0, "still editable").unwrap();
    assert_eq!(f.book.log.get(0).unwrap().note, "still editable");
}

#[test]
fn overflowing_balance_leaves_book_untouched() {
    let mut f = setup();
    f.book
        .add_transaction(Transaction::expense(d(6), Money::from_units(20), f.cash, f.bread));
    f.book.add_transaction(Transaction::income(
        d(7),
        Money::from_cents(i64::MAX),
        f.card,
        f.salary,
    ));

    assert!(matches!(f.book.anchore(), Err(LedgerError::InvalidAmount(_))));
    assert_eq!(f.book.log.unanchored(), 2);
    assert_eq!(f.book.wallets.find(f.cash).unwrap().balance, Money::ZERO);
    assert_eq!(
        f.book.wallets.find(f.card).unwrap().balance,
        Money::from_units(1000)
    );
    assert_eq!(f.book.stats.expense_total.get(f.food), Money::ZERO);
}
