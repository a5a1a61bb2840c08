// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::archive::ArchivalRef;
use crate::money::Money;
use crate::tree::Entity;

/// Notes starting with this character were produced by an import and are
/// cleared when the entry is anchored.
pub const TRANSIENT_NOTE_MARKER: char = '~';

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    pub id: Uuid,
    pub name: String,
}

impl Owner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

impl Bank {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub regular: bool,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            regular: false,
        }
    }

    pub fn regular(name: impl Into<String>) -> Self {
        Self {
            regular: true,
            ..Self::new(name)
        }
    }
}

impl Entity for Category {
    fn id(&self) -> Uuid {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentKind {
    Stocks,
    Bonds,
    Funds,
    Metals,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum WalletKind {
    Cash,
    Card {
        bank: Option<Uuid>,
    },
    Account {
        bank: Option<Uuid>,
    },
    Deposit {
        bank: Option<Uuid>,
        percent: Decimal,
    },
    Investment {
        sub: InvestmentKind,
    },
    Crypto,
    Points,
    Common,
}

impl WalletKind {
    pub fn label(&self) -> &'static str {
        match self {
            WalletKind::Cash => "cash",
            WalletKind::Card { .. } => "card",
            WalletKind::Account { .. } => "account",
            WalletKind::Deposit { .. } => "deposit",
            WalletKind::Investment { .. } => "investment",
            WalletKind::Crypto => "crypto",
            WalletKind::Points => "points",
            WalletKind::Common => "common",
        }
    }

    /// Attaches `bank` to kinds that are held at one; false for the rest.
    pub fn set_bank(&mut self, id: Uuid) -> bool {
        match self {
            WalletKind::Card { bank }
            | WalletKind::Account { bank }
            | WalletKind::Deposit { bank, .. } => {
                *bank = Some(id);
                true
            }
            _ => false,
        }
    }

    pub fn bank(&self) -> Option<Uuid> {
        match self {
            WalletKind::Card { bank }
            | WalletKind::Account { bank }
            | WalletKind::Deposit { bank, .. } => *bank,
            _ => None,
        }
    }
}

impl FromStr for WalletKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(WalletKind::Cash),
            "card" => Ok(WalletKind::Card { bank: None }),
            "account" => Ok(WalletKind::Account { bank: None }),
            "deposit" => Ok(WalletKind::Deposit {
                bank: None,
                percent: Decimal::ZERO,
            }),
            "investment" => Ok(WalletKind::Investment {
                sub: InvestmentKind::Other,
            }),
            "crypto" => Ok(WalletKind::Crypto),
            "points" => Ok(WalletKind::Points),
            "common" => Ok(WalletKind::Common),
            other => Err(format!("unknown wallet kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub name: String,
    pub balance: Money,
    #[serde(flatten)]
    pub kind: WalletKind,
    #[serde(default)]
    pub owner: Option<Uuid>,
}

impl Wallet {
    pub fn new(name: impl Into<String>, kind: WalletKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance: Money::ZERO,
            kind,
            owner: None,
        }
    }

    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }
}

impl Entity for Wallet {
    fn id(&self) -> Uuid {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    In,
    Out,
    Transfer,
}

impl TransactionType {
    /// Out and Transfer take money from a wallet.
    pub fn debits(self) -> bool {
        matches!(self, TransactionType::Out | TransactionType::Transfer)
    }

    /// In and Transfer put money into a wallet.
    pub fn credits(self) -> bool {
        matches!(self, TransactionType::In | TransactionType::Transfer)
    }

    pub fn has_category(self) -> bool {
        !matches!(self, TransactionType::Transfer)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::In => f.write_str("in"),
            TransactionType::Out => f.write_str("out"),
            TransactionType::Transfer => f.write_str("transfer"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" | "income" => Ok(TransactionType::In),
            "out" | "expense" => Ok(TransactionType::Out),
            "transfer" => Ok(TransactionType::Transfer),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Money,
    #[serde(default)]
    pub category: ArchivalRef,
    #[serde(default)]
    pub from: ArchivalRef,
    #[serde(default)]
    pub to: ArchivalRef,
}

impl Transaction {
    pub fn new(date: NaiveDate, kind: TransactionType, amount: Money) -> Self {
        Self {
            date,
            note: String::new(),
            kind,
            amount,
            category: ArchivalRef::none(),
            from: ArchivalRef::none(),
            to: ArchivalRef::none(),
        }
    }

    pub fn income(date: NaiveDate, amount: Money, to: Uuid, category: Uuid) -> Self {
        Self {
            to: ArchivalRef::live(to),
            category: ArchivalRef::live(category),
            ..Self::new(date, TransactionType::In, amount)
        }
    }

    pub fn expense(date: NaiveDate, amount: Money, from: Uuid, category: Uuid) -> Self {
        Self {
            from: ArchivalRef::live(from),
            category: ArchivalRef::live(category),
            ..Self::new(date, TransactionType::Out, amount)
        }
    }

    pub fn transfer(date: NaiveDate, amount: Money, from: Uuid, to: Uuid) -> Self {
        Self {
            from: ArchivalRef::live(from),
            to: ArchivalRef::live(to),
            ..Self::new(date, TransactionType::Transfer, amount)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn month(&self) -> Month {
        Month::of(self.date)
    }

    /// Resets the reference slots that do not apply to this type.
    pub fn clear_unused_slots(&mut self) {
        if !self.kind.has_category() {
            self.category = ArchivalRef::none();
        }
        if !self.kind.debits() {
            self.from = ArchivalRef::none();
        }
        if !self.kind.credits() {
            self.to = ArchivalRef::none();
        }
    }

    pub fn is_transient(&self) -> bool {
        self.note.starts_with(TRANSIENT_NOTE_MARKER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1).and_then(|d| d.pred_opt())
    }

    /// `year.month` shard name used for monthly log files.
    pub fn shard_name(&self) -> String {
        format!("{:04}.{:02}", self.year, self.month)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Budget goal over a date window; `spent` and `rest` are recomputed from
/// the log and never authored directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: ArchivalRef,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub amount: Money,
    #[serde(skip)]
    pub spent: Money,
    #[serde(skip)]
    pub rest: Money,
}

impl Task {
    pub fn new(
        kind: TransactionType,
        category: Uuid,
        from: NaiveDate,
        to: NaiveDate,
        amount: Money,
    ) -> Self {
        Self {
            kind,
            category: ArchivalRef::live(category),
            from,
            to,
            amount,
            spent: Money::ZERO,
            rest: amount,
        }
    }

    /// Task spanning the calendar month that contains `today`.
    pub fn for_month_of(
        today: NaiveDate,
        kind: TransactionType,
        category: Uuid,
        amount: Money,
    ) -> Self {
        let month = Month::of(today);
        let from = month.first_day().unwrap_or(today);
        let to = month.last_day().unwrap_or(today);
        Self::new(kind, category, from, to, amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    Short,
    Middle,
    Long,
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Term::Short),
            "middle" => Ok(Term::Middle),
            "long" => Ok(Term::Long),
            other => Err(format!("unknown plan term '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: ArchivalRef,
    pub amount: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plans {
    pub short: Vec<Plan>,
    pub middle: Vec<Plan>,
    pub long: Vec<Plan>,
}

impl Plans {
    pub fn bucket(&self, term: Term) -> &Vec<Plan> {
        match term {
            Term::Short => &self.short,
            Term::Middle => &self.middle,
            Term::Long => &self.long,
        }
    }

    pub fn bucket_mut(&mut self, term: Term) -> &mut Vec<Plan> {
        match term {
            Term::Short => &mut self.short,
            Term::Middle => &mut self.middle,
            Term::Long => &mut self.long,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Plan> {
        self.short
            .iter_mut()
            .chain(self.middle.iter_mut())
            .chain(self.long.iter_mut())
    }
}
