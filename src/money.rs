// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Exact amount of money in minor units (cents).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub fn from_units(units: i64) -> Self {
        Money(units.saturating_mul(100))
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Self {
        Money(self.0.saturating_abs())
    }

    pub fn checked_add(self, rhs: Money) -> LedgerResult<Money> {
        self.0
            .checked_add(rhs.0)
            .map(Money)
            .ok_or_else(|| LedgerError::InvalidAmount(format!("{} + {}", self, rhs)))
    }

    pub fn checked_sub(self, rhs: Money) -> LedgerResult<Money> {
        self.0
            .checked_sub(rhs.0)
            .map(Money)
            .ok_or_else(|| LedgerError::InvalidAmount(format!("{} - {}", self, rhs)))
    }

    /// Converts a decimal with at most two fractional digits. `i64::MIN`
    /// cents is refused so every amount has a representable magnitude.
    pub fn from_decimal(d: Decimal) -> LedgerResult<Self> {
        let invalid = || LedgerError::InvalidAmount(d.to_string());
        let scaled = d.checked_mul(Decimal::ONE_HUNDRED).ok_or_else(invalid)?;
        if scaled.fract() != Decimal::ZERO {
            return Err(invalid());
        }
        scaled
            .to_i64()
            .filter(|c| *c != i64::MIN)
            .map(Money)
            .ok_or_else(invalid)
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub fn parse(s: &str) -> LedgerResult<Self> {
        let d = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| LedgerError::InvalidAmount(s.to_string()))?;
        Money::from_decimal(d)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_decimal())
    }
}

// Operators saturate; balance updates go through the checked forms.
impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
