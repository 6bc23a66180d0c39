use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Relative tolerance used when deciding whether a payment covers a debt.
/// Repeated subtraction of a fixed payment leaves residuals of a few ulps,
/// which must not cost an extra period.
pub const COVER_TOLERANCE: f64 = 1e-9;

/// An amount owed.
///
/// Debt is always stored as a non-negative magnitude: a loan is paid off
/// when its `Debit` is exactly zero, and payments move it monotonically
/// toward zero. Money available to pay *with* is a [`Credit`]; the two are
/// never mixed implicitly.
///
/// # Examples
///
/// ```
/// use loan_snowball::core::money::{Credit, Debit};
///
/// let owed = Debit::new(250.0);
/// let payment = Credit::new(100.0);
/// assert_eq!(owed - payment, Debit::new(150.0));
/// assert!(owed.is_covered_by(Credit::new(250.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Debit(f64);

impl Debit {
    pub const ZERO: Debit = Debit(0.0);

    pub fn new(amount: f64) -> Self {
        Self(amount)
    }

    pub fn amount(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// True when `payment` is at least as large as this debt, up to a
    /// relative [`COVER_TOLERANCE`] of the payment.
    pub fn is_covered_by(self, payment: Credit) -> bool {
        self.0 <= payment.0 + COVER_TOLERANCE * payment.0.abs().max(1.0)
    }

    /// Interest accrued on this balance at a periodic `rate`.
    pub fn accrue(self, rate: f64) -> Debit {
        Debit(self.0 * rate)
    }
}

impl fmt::Display for Debit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Debit {
    type Output = Debit;

    fn add(self, rhs: Debit) -> Debit {
        Debit(self.0 + rhs.0)
    }
}

impl AddAssign for Debit {
    fn add_assign(&mut self, rhs: Debit) {
        self.0 += rhs.0;
    }
}

/// Paying `Credit` against a `Debit` shrinks the debt.
impl Sub<Credit> for Debit {
    type Output = Debit;

    fn sub(self, rhs: Credit) -> Debit {
        Debit(self.0 - rhs.0)
    }
}

impl SubAssign<Credit> for Debit {
    fn sub_assign(&mut self, rhs: Credit) {
        self.0 -= rhs.0;
    }
}

impl Sum for Debit {
    fn sum<I: Iterator<Item = Debit>>(iter: I) -> Debit {
        Debit(iter.map(|d| d.0).sum())
    }
}

/// Money available to pay down debt: minimum payments, budgets and the
/// extra pool cascaded between loans.
///
/// A negative `Credit` is representable and means a shortfall.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credit(f64);

impl Credit {
    pub const ZERO: Credit = Credit(0.0);

    pub fn new(amount: f64) -> Self {
        Self(amount)
    }

    pub fn amount(self) -> f64 {
        self.0
    }

    /// What is left of this payment after settling `debt` in full. Never
    /// negative; a debt within tolerance of the payment leaves nothing.
    pub fn remaining_after(self, debt: Debit) -> Credit {
        Credit((self.0 - debt.0).max(0.0))
    }

    /// A payment exactly large enough to settle `debt`.
    pub fn settling(debt: Debit) -> Credit {
        Credit(debt.0)
    }
}

impl fmt::Display for Credit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Credit {
    type Output = Credit;

    fn add(self, rhs: Credit) -> Credit {
        Credit(self.0 + rhs.0)
    }
}

impl AddAssign for Credit {
    fn add_assign(&mut self, rhs: Credit) {
        self.0 += rhs.0;
    }
}

impl Sub for Credit {
    type Output = Credit;

    fn sub(self, rhs: Credit) -> Credit {
        Credit(self.0 - rhs.0)
    }
}

impl Sum for Credit {
    fn sum<I: Iterator<Item = Credit>>(iter: I) -> Credit {
        Credit(iter.map(|c| c.0).sum())
    }
}
