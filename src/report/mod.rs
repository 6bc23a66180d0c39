//! Text rendering of portfolios for the command line.
//!
//! The simulation works in unrounded `f64`; amounts are rounded to cents
//! only here, on the way out.

use crate::core::portfolio::Portfolio;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// Round a monetary amount to cents, half away from zero.
///
/// Returns `None` for NaN, infinities and amounts outside the range of
/// [`Decimal`].
pub fn cents(amount: f64) -> Option<Decimal> {
    let mut rounded = Decimal::from_f64_retain(amount)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    Some(rounded)
}

/// Text for an amount: rounded to cents, or the raw `f64` when it has no
/// cents representation, so a diverging balance never prints as zero.
pub fn format_cents(amount: f64) -> String {
    match cents(amount) {
        Some(rounded) => rounded.to_string(),
        None => amount.to_string(),
    }
}

const SUMMARY_HEADERS: [&str; 5] = [
    "Loan ID",
    "Balance ($)",
    "Rate (%)",
    "Term",
    "Min Pmt ($)",
];

/// One row per loan: name, balance, annual rate, term in years and
/// minimum payment, right-aligned in columns sized to fit.
pub struct PortfolioSummary<'a>(pub &'a Portfolio);

impl fmt::Display for PortfolioSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<[String; 5]> = self
            .0
            .iter()
            .map(|loan| {
                [
                    loan.name().to_string(),
                    format_cents(loan.balance().amount()),
                    format!("{:.2}", loan.annual_rate_percent()),
                    format!("{:.1}", loan.term_years()),
                    format_cents(loan.minimum_payment().amount()),
                ]
            })
            .collect();

        let mut widths = SUMMARY_HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        for (header, width) in SUMMARY_HEADERS.iter().zip(&widths) {
            write!(f, "   {:>w$}", header, w = width)?;
        }
        writeln!(f)?;
        for row in &rows {
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "   {:>w$}", cell, w = width)?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "   Total minimum payments: {}",
            format_cents(self.0.total_minimum_payments().amount())
        )
    }
}
