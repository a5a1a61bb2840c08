// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use uuid::Uuid;
use walletbook::models::{Category, Month, Task, Transaction, TransactionType, Wallet, WalletKind};
use walletbook::stats::{DateWindow, category_statistics};
use walletbook::{Book, CategoryKind, Money};

struct Fixture {
    book: Book,
    wallet: Uuid,
    food: Uuid,
    bread: Uuid,
    sweets: Uuid,
    rent: Uuid,
    salary: Uuid,
}

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

fn units(n: i64) -> Money {
    Money::from_units(n)
}

fn setup() -> Fixture {
    let mut book = Book::new();
    let wallet = Wallet::new("Cash", WalletKind::Cash);
    let wallet_id = wallet.id;
    book.wallets.push(None, wallet).unwrap();

    let food = Category::new("Food");
    let bread = Category::new("Bread");
    let sweets = Category::new("Sweets");
    let rent = Category::regular("Rent");
    let ids = (food.id, bread.id, sweets.id, rent.id);
    let f = book.expense.push(None, food).unwrap();
    book.expense.push(Some(f), bread).unwrap();
    book.expense.push(Some(f), sweets).unwrap();
    book.expense.push(None, rent).unwrap();

    let salary = Category::regular("Salary");
    let salary_id = salary.id;
    book.income.push(None, salary).unwrap();

    Fixture {
        book,
        wallet: wallet_id,
        food: ids.0,
        bread: ids.1,
        sweets: ids.2,
        rent: ids.3,
        salary: salary_id,
    }
}

#[test]
fn parent_total_is_sum_of_children() {
    let mut f = setup();
    let w = f.wallet;
    f.book.add_transaction(Transaction::expense(d(6, 2), units(120), w, f.bread));
    f.book.add_transaction(Transaction::expense(d(6, 3), units(80), w, f.sweets));
    f.book.add_transaction(Transaction::expense(d(6, 4), units(15), w, f.food));
    f.book.anchore().unwrap();

    let totals = &f.book.stats.expense_total;
    assert_eq!(totals.get(f.bread), units(120));
    assert_eq!(totals.get(f.sweets), units(80));
    assert_eq!(totals.get(f.food), units(215));
    assert_eq!(totals.get(f.rent), Money::ZERO);
}

#[test]
fn brief_splits_regular_from_other() {
    let mut f = setup();
    let w = f.wallet;
    f.book.add_transaction(Transaction::income(d(6, 1), units(3000), w, f.salary));
    f.book.add_transaction(Transaction::expense(d(6, 1), units(900), w, f.rent));
    f.book.add_transaction(Transaction::expense(d(6, 9), units(100), w, f.bread));
    f.book.add_transaction(Transaction::expense(d(7, 1), units(900), w, f.rent));
    f.book.anchore().unwrap();

    let june = f.book.stats.brief_for(Month::new(2025, 6));
    assert_eq!(june.common.received, units(3000));
    assert_eq!(june.regular.received, units(3000));
    assert_eq!(june.common.spent, units(1000));
    assert_eq!(june.regular.spent, units(900));
    assert_eq!(june.other_spent(), units(100));
    assert_eq!(june.other_received(), Money::ZERO);

    let july = f.book.stats.brief_for(Month::new(2025, 7));
    assert_eq!(july.common.spent, units(900));
    assert_eq!(f.book.stats.brief_for(Month::new(2025, 8)).common.spent, Money::ZERO);
}

#[test]
fn window_only_counts_dates_inside_it() {
    let mut f = setup();
    let w = f.wallet;
    f.book.add_transaction(Transaction::expense(d(5, 31), units(10), w, f.bread));
    f.book.add_transaction(Transaction::expense(d(6, 1), units(20), w, f.bread));
    f.book.add_transaction(Transaction::expense(d(6, 30), units(40), w, f.sweets));
    f.book.add_transaction(Transaction::expense(d(7, 1), units(80), w, f.bread));
    f.book.anchore().unwrap();

    f.book.load_categories_statistics(d(6, 30), d(6, 1));

    let window = &f.book.stats.expense_window;
    assert_eq!(window.get(f.bread), units(20));
    assert_eq!(window.get(f.sweets), units(40));
    assert_eq!(window.get(f.food), units(60));
    assert_eq!(f.book.stats.expense_total.get(f.food), units(150));
}

#[test]
fn pending_entries_do_not_count() {
    let mut f = setup();
    f.book
        .add_transaction(Transaction::expense(d(6, 2), units(50), f.wallet, f.bread));

    let map = category_statistics(
        &f.book.log,
        &f.book.expense,
        TransactionType::Out,
        Some(DateWindow::new(d(1, 1), d(12, 31))),
    );
    assert!(map.is_empty());
    assert_eq!(f.book.stats.brief_for(Month::new(2025, 6)).common.spent, Money::ZERO);
}

#[test]
fn moving_a_category_reshapes_totals() {
    let mut f = setup();
    f.book
        .add_transaction(Transaction::expense(d(6, 2), units(50), f.wallet, f.sweets));
    f.book.anchore().unwrap();
    assert_eq!(f.book.stats.expense_total.get(f.food), units(50));

    let sweets = f.book.expense.node_of(f.sweets).unwrap();
    f.book
        .move_category(CategoryKind::Expense, sweets, None, None)
        .unwrap();

    assert_eq!(f.book.stats.expense_total.get(f.food), Money::ZERO);
    assert_eq!(f.book.stats.expense_total.get(f.sweets), units(50));
}

#[test]
fn replay_matches_incremental_recording() {
    let mut f = setup();
    let w = f.wallet;
    f.book.add_transaction(Transaction::income(d(6, 1), units(500), w, f.salary));
    f.book.add_transaction(Transaction::expense(d(6, 5), units(70), w, f.bread));
    f.book.anchore().unwrap();
    let brief = f.book.stats.brief.clone();
    let food = f.book.stats.expense_total.get(f.food);

    f.book.replay_statistics();

    assert_eq!(f.book.stats.brief, brief);
    assert_eq!(f.book.stats.expense_total.get(f.food), food);
}

// Task tracking

#[test]
fn task_sums_subtree_inside_window() {
    let mut f = setup();
    let w = f.wallet;
    f.book.add_transaction(Transaction::expense(d(6, 30), units(999), w, f.bread));
    f.book.add_transaction(Transaction::expense(d(7, 3), units(400), w, f.bread));
    f.book.add_transaction(Transaction::expense(d(7, 9), units(250), w, f.sweets));
    f.book.add_transaction(Transaction::expense(d(7, 12), units(300), w, f.rent));
    f.book.add_transaction(Transaction::expense(d(8, 1), units(999), w, f.bread));

    let index = f.book.add_task(Task::new(
        TransactionType::Out,
        f.food,
        d(7, 1),
        d(7, 31),
        units(1000),
    ));

    let task = f.book.update_task(index).unwrap();
    assert_eq!(task.spent, units(650));
    assert_eq!(task.rest, units(350));
}

#[test]
fn task_on_empty_log_keeps_full_rest() {
    let mut f = setup();
    let index = f.book.add_task(Task::for_month_of(
        d(7, 15),
        TransactionType::Out,
        f.food,
        units(300),
    ));

    let task = f.book.update_task(index).unwrap();
    assert_eq!(task.from, d(7, 1));
    assert_eq!(task.to, d(7, 31));
    assert_eq!(task.spent, Money::ZERO);
    assert_eq!(task.rest, units(300));
}

#[test]
fn task_window_outside_log_spends_nothing() {
    let mut f = setup();
    f.book
        .add_transaction(Transaction::expense(d(3, 3), units(40), f.wallet, f.bread));
    let index = f.book.add_task(Task::new(
        TransactionType::Out,
        f.food,
        d(9, 1),
        d(9, 30),
        units(100),
    ));

    let task = f.book.update_task(index).unwrap();
    assert_eq!(task.spent, Money::ZERO);
    assert_eq!(task.rest, units(100));
}

#[test]
fn tasks_follow_log_edits() {
    let mut f = setup();
    let index = f.book.add_task(Task::new(
        TransactionType::Out,
        f.food,
        d(7, 1),
        d(7, 31),
        units(100),
    ));
    f.book
        .add_transaction(Transaction::expense(d(7, 2), units(30), f.wallet, f.sweets));
    assert_eq!(f.book.tasks[index].spent, units(30));

    f.book.remove_transaction(0).unwrap();
    assert_eq!(f.book.tasks[index].spent, Money::ZERO);
    assert_eq!(f.book.tasks[index].rest, units(100));
}

#[test]
fn back_dated_pending_entry_does_not_hide_anchored_history() {
    let mut f = setup();
    let w = f.wallet;
    f.book.add_transaction(Transaction::expense(d(7, 4), units(120), w, f.bread));
    f.book.add_transaction(Transaction::expense(d(7, 20), units(80), w, f.sweets));
    f.book.anchore().unwrap();
    f.book.add_transaction(Transaction::expense(d(7, 25), units(5), w, f.bread));
    f.book.add_transaction(Transaction::expense(d(6, 28), units(999), w, f.bread));
    f.book.add_transaction(Transaction::expense(d(7, 10), units(15), w, f.sweets));

    let index = f.book.add_task(Task::new(
        TransactionType::Out,
        f.food,
        d(7, 1),
        d(7, 31),
        units(500),
    ));

    let task = f.book.update_task(index).unwrap();
    assert_eq!(task.spent, units(220));
    assert_eq!(task.rest, units(280));
}
