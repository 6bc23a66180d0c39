use crate::amortization::engine::PeriodTotals;
use crate::core::money::{Credit, Debit};
use crate::core::portfolio::Portfolio;
use crate::report::format_cents;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-period, per-loan balance trace of one payoff simulation.
///
/// Row 0 holds the opening balances; row `k` holds the balances after
/// period `k`. Columns follow the portfolio order at the time of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    loan_names: Vec<String>,
    rows: Vec<Vec<Debit>>,
    /// Extra pool available at the start of each period.
    extra_pools: Vec<Credit>,
    total_paid: Credit,
    total_interest: Debit,
}

impl Schedule {
    /// Start a schedule from the portfolio's current balances.
    pub fn new(portfolio: &Portfolio) -> Self {
        Self {
            loan_names: portfolio.names(),
            rows: vec![balances(portfolio)],
            extra_pools: Vec::new(),
            total_paid: Credit::ZERO,
            total_interest: Debit::ZERO,
        }
    }

    pub(crate) fn record_period(&mut self, portfolio: &Portfolio, totals: PeriodTotals) {
        self.rows.push(balances(portfolio));
        self.extra_pools.push(totals.extra_pool);
        self.total_paid += totals.paid;
        self.total_interest += totals.interest;
    }

    pub fn loan_names(&self) -> &[String] {
        &self.loan_names
    }

    /// Number of periods simulated.
    pub fn periods(&self) -> u32 {
        (self.rows.len() - 1) as u32
    }

    /// Balances after `period` (0 = opening balances).
    pub fn balances(&self, period: u32) -> Option<&[Debit]> {
        self.rows.get(period as usize).map(|r| r.as_slice())
    }

    /// Extra pool available at the start of `period` (1-based).
    pub fn extra_pool(&self, period: u32) -> Option<Credit> {
        let index = (period as usize).checked_sub(1)?;
        self.extra_pools.get(index).copied()
    }

    /// Period in which the loan in column `loan` was paid off.
    pub fn payoff_period(&self, loan: usize) -> Option<u32> {
        self.rows
            .iter()
            .position(|row| row.get(loan).is_some_and(|b| b.is_zero()))
            .map(|p| p as u32)
    }

    /// Everything paid across all loans and periods.
    pub fn total_paid(&self) -> Credit {
        self.total_paid
    }

    /// Interest accrued across all loans and periods.
    pub fn total_interest(&self) -> Debit {
        self.total_interest
    }

    /// Calendar month of the final payment, counting the first period as
    /// the month of `start`.
    pub fn payoff_date(&self, start: NaiveDate) -> Option<NaiveDate> {
        let months = self.periods().checked_sub(1)?;
        start.checked_add_months(Months::new(months))
    }
}

fn balances(portfolio: &Portfolio) -> Vec<Debit> {
    portfolio.iter().map(|l| l.balance()).collect()
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| {
                        if b.is_zero() {
                            "--".to_string()
                        } else {
                            format_cents(b.amount())
                        }
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .loan_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|c| c.len())
                    .fold(name.len(), usize::max)
            })
            .collect();
        let period_width = self.periods().to_string().len().max("Month".len());

        write!(f, "{:>w$}", "Month", w = period_width)?;
        for (name, width) in self.loan_names.iter().zip(&widths) {
            write!(f, "  {:>w$}", name, w = width)?;
        }
        writeln!(f)?;

        for (period, row) in cells.iter().enumerate() {
            write!(f, "{:>w$}", period, w = period_width)?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {:>w$}", cell, w = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
