use crate::core::money::{Credit, Debit};
use serde::Serialize;
use std::fmt;

/// Payment periods per year. Rates and terms are given annually and
/// converted to monthly periods.
pub const PERIODS_PER_YEAR: f64 = 12.0;

/// A single amortizing debt.
///
/// The minimum payment is derived once, at construction, from the annuity
/// formula and stays fixed for the life of the loan, like a real
/// fixed-payment schedule. Only the balance changes afterwards, and
/// [`Loan::reset`] puts it back to the original principal.
///
/// # Examples
///
/// ```
/// use loan_snowball::core::loan::Loan;
///
/// let loan = Loan::new("CAR", 1200.0, 12.0, 1.0);
/// assert_eq!(loan.term_periods(), 12.0);
/// assert!((loan.minimum_payment().amount() - 106.62).abs() < 0.01);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    name: String,
    balance: Debit,
    original_balance: Debit,
    periodic_rate: f64,
    term_periods: f64,
    minimum_payment: Credit,
}

/// What happened to a loan during one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Payment {
    /// Money actually applied to the loan.
    pub applied: Credit,
    /// Interest accrued after the payment.
    pub interest: Debit,
    /// Unused funds handed back for the next loan in the cascade.
    pub leftover: Credit,
}

impl Loan {
    /// Create a loan from a principal, an annual percentage rate
    /// (e.g. `6.5` for 6.5%) and a term in years.
    ///
    /// # Panics
    ///
    /// Panics if the balance or term is not positive, or the rate is
    /// negative. Input records are validated before they get here.
    pub fn new(
        name: impl Into<String>,
        balance: f64,
        annual_rate_percent: f64,
        term_years: f64,
    ) -> Self {
        Self::with_term_periods(
            name,
            balance,
            annual_rate_percent,
            term_years * PERIODS_PER_YEAR,
        )
    }

    /// Create a loan whose term is given directly in monthly periods.
    pub fn with_term_periods(
        name: impl Into<String>,
        balance: f64,
        annual_rate_percent: f64,
        term_periods: f64,
    ) -> Self {
        assert!(balance > 0.0, "Loan balance must be positive");
        assert!(term_periods > 0.0, "Loan term must be positive");
        assert!(annual_rate_percent >= 0.0, "Loan rate must not be negative");

        let balance = Debit::new(balance);
        let periodic_rate = annual_rate_percent / 100.0 / PERIODS_PER_YEAR;

        Self {
            name: name.into(),
            balance,
            original_balance: balance,
            periodic_rate,
            term_periods,
            minimum_payment: minimum_payment(periodic_rate, term_periods, balance),
        }
    }

    // --- Accessors ---

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Debit {
        self.balance
    }

    pub fn original_balance(&self) -> Debit {
        self.original_balance
    }

    pub fn periodic_rate(&self) -> f64 {
        self.periodic_rate
    }

    pub fn term_periods(&self) -> f64 {
        self.term_periods
    }

    pub fn minimum_payment(&self) -> Credit {
        self.minimum_payment
    }

    /// The annual rate in percent, as it was given.
    pub fn annual_rate_percent(&self) -> f64 {
        self.periodic_rate * PERIODS_PER_YEAR * 100.0
    }

    /// The term in years, as it was given.
    pub fn term_years(&self) -> f64 {
        self.term_periods / PERIODS_PER_YEAR
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance.is_zero()
    }

    /// Pay one period: the fixed minimum payment plus as much of `extra`
    /// as it takes to finish the loan.
    ///
    /// If the payment covers the balance the loan is closed and whatever
    /// is not needed comes back as `leftover`. Otherwise the whole payment
    /// is applied and a period of interest accrues on the reduced balance.
    ///
    /// Must not be called on a loan that is already paid off.
    pub fn pay(&mut self, extra: Option<Credit>) -> Payment {
        let total = self.minimum_payment + extra.unwrap_or(Credit::ZERO);

        if self.balance.is_covered_by(total) {
            let applied = Credit::settling(self.balance);
            let leftover = total.remaining_after(self.balance);
            self.balance = Debit::ZERO;
            Payment {
                applied,
                interest: Debit::ZERO,
                leftover,
            }
        } else {
            self.balance -= total;
            let interest = self.balance.accrue(self.periodic_rate);
            self.balance += interest;
            Payment {
                applied: total,
                interest,
                leftover: Credit::ZERO,
            }
        }
    }

    /// Restore the balance to the original principal.
    pub fn reset(&mut self) {
        self.balance = self.original_balance;
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: balance {}, rate {:.2}%, term {:.1}y, minimum payment {}",
            self.name,
            self.balance,
            self.annual_rate_percent(),
            self.term_years(),
            self.minimum_payment
        )
    }
}

/// Fixed periodic payment that amortizes `principal` to zero over
/// `term_periods` at `periodic_rate`.
///
/// Uses the closed-form annuity formula `r * P * pvif / (pvif - 1)` with
/// `pvif = (1 + r)^n`, or straight-line `P / n` when the rate is zero.
pub fn minimum_payment(periodic_rate: f64, term_periods: f64, principal: Debit) -> Credit {
    let principal = principal.amount().abs();
    if periodic_rate == 0.0 {
        return Credit::new(principal / term_periods);
    }
    let pvif = (1.0 + periodic_rate).powf(term_periods);
    Credit::new(periodic_rate * principal * pvif / (pvif - 1.0))
}
