use crate::amortization::schedule::Schedule;
use crate::core::money::{Credit, Debit};
use crate::core::portfolio::Portfolio;
use log::{debug, warn};
use thiserror::Error;

/// Default cap on simulated periods: 10,000 months is over 800 years.
pub const DEFAULT_MAX_PERIODS: u32 = 10_000;

/// Errors arising from a payoff simulation.
#[derive(Debug, Error, PartialEq)]
pub enum AmortizationError {
    #[error("monthly budget {supplied} does not cover the minimum payments of {required}")]
    InsufficientBudget { supplied: Credit, required: Credit },
    #[error("portfolio not paid off after {max_periods} periods ({remaining} still owed)")]
    NonTerminating { max_periods: u32, remaining: Debit },
}

/// Money flows for one simulated period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodTotals {
    /// Extra funds available at the start of the period: the baseline
    /// extra plus every freed minimum payment.
    pub extra_pool: Credit,
    /// Total applied across all loans.
    pub paid: Credit,
    /// Total interest accrued across all loans.
    pub interest: Debit,
    /// Funds left over after the last loan in the cascade.
    pub unused: Credit,
}

/// Drives a portfolio to zero balance with the snowball method.
///
/// Every period, each open loan gets its minimum payment. A baseline extra
/// amount plus the minimum payments freed by loans already paid off form
/// an extra pool, which cascades through the loans in portfolio order:
/// whatever one loan does not need goes to the next.
///
/// # Examples
///
/// ```
/// use loan_snowball::amortization::engine::AmortizationEngine;
/// use loan_snowball::core::loan::Loan;
/// use loan_snowball::core::money::Credit;
/// use loan_snowball::core::portfolio::Portfolio;
///
/// let mut portfolio = Portfolio::new();
/// portfolio.add(Loan::new("CAR", 1200.0, 12.0, 1.0));
///
/// let engine = AmortizationEngine::new();
/// let periods = engine.count_periods(&mut portfolio, Credit::ZERO).unwrap();
/// assert_eq!(periods, 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmortizationEngine {
    max_periods: u32,
}

impl Default for AmortizationEngine {
    fn default() -> Self {
        Self {
            max_periods: DEFAULT_MAX_PERIODS,
        }
    }
}

impl AmortizationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of periods after which a run is abandoned as
    /// non-terminating.
    pub fn with_max_periods(mut self, max_periods: u32) -> Self {
        self.max_periods = max_periods;
        self
    }

    pub fn max_periods(&self) -> u32 {
        self.max_periods
    }

    /// Check a fixed monthly budget against the portfolio's minimum
    /// payments and return the baseline extra it leaves.
    ///
    /// Must be called before simulating with a caller-supplied budget: a
    /// budget below the minimums would never pay the portfolio off.
    pub fn check_budget(
        portfolio: &Portfolio,
        budget: Credit,
    ) -> Result<Credit, AmortizationError> {
        let required = portfolio.total_minimum_payments();
        if budget < required {
            return Err(AmortizationError::InsufficientBudget {
                supplied: budget,
                required,
            });
        }
        Ok(budget - required)
    }

    /// Simulate a single period.
    ///
    /// Loans already paid off are skipped; they are neither paid nor
    /// credited.
    pub fn pay_period(portfolio: &mut Portfolio, extra: Credit) -> PeriodTotals {
        let extra_pool = extra + portfolio.freed_payments();
        let mut remaining = extra_pool;
        let mut paid = Credit::ZERO;
        let mut interest = Debit::ZERO;

        for loan in portfolio.loans_mut() {
            if loan.is_paid_off() {
                continue;
            }
            let payment = loan.pay(Some(remaining));
            remaining = payment.leftover;
            paid += payment.applied;
            interest += payment.interest;
        }

        PeriodTotals {
            extra_pool,
            paid,
            interest,
            unused: remaining,
        }
    }

    /// Number of periods until the portfolio is paid off, starting from
    /// its current balances.
    pub fn count_periods(
        &self,
        portfolio: &mut Portfolio,
        extra: Credit,
    ) -> Result<u32, AmortizationError> {
        self.simulate(portfolio, extra, None)
    }

    /// Like [`count_periods`](Self::count_periods), but records every
    /// period's balances.
    pub fn amortize(
        &self,
        portfolio: &mut Portfolio,
        extra: Credit,
    ) -> Result<Schedule, AmortizationError> {
        let mut schedule = Schedule::new(portfolio);
        self.simulate(portfolio, extra, Some(&mut schedule))?;
        Ok(schedule)
    }

    fn simulate(
        &self,
        portfolio: &mut Portfolio,
        extra: Credit,
        mut schedule: Option<&mut Schedule>,
    ) -> Result<u32, AmortizationError> {
        debug!(
            "amortizing {} loans, balance {}, extra {}",
            portfolio.len(),
            portfolio.total_balance(),
            extra
        );

        let mut periods = 0u32;
        while !portfolio.is_paid_off() {
            if periods >= self.max_periods {
                let remaining = portfolio.total_balance();
                warn!(
                    "giving up after {} periods with {} still owed",
                    periods, remaining
                );
                return Err(AmortizationError::NonTerminating {
                    max_periods: self.max_periods,
                    remaining,
                });
            }

            let totals = Self::pay_period(portfolio, extra);
            periods += 1;

            if let Some(schedule) = schedule.as_deref_mut() {
                schedule.record_period(portfolio, totals);
            }
        }

        debug!("paid off after {} periods", periods);
        Ok(periods)
    }
}
