//! Random portfolio generation for exercising the engine and the order
//! search on larger inputs.

use crate::core::portfolio::Portfolio;
use crate::input::records::LoanRecord;
use rand::Rng;

/// Configuration for generating a random portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// Number of loans.
    pub loan_count: usize,
    /// Minimum principal.
    pub min_balance: f64,
    /// Maximum principal.
    pub max_balance: f64,
    /// Maximum annual rate in percent. Rates are drawn from `0..max_rate`.
    pub max_rate: f64,
    /// Terms to choose from, in years.
    pub terms: Vec<f64>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            loan_count: 8,
            min_balance: 500.0,
            max_balance: 50_000.0,
            max_rate: 25.0,
            terms: vec![1.0, 3.0, 5.0, 10.0, 15.0, 30.0],
        }
    }
}

/// Generate random loan records. Loans are named `L001`, `L002`, ...
///
/// Balances are whole cents and rates are rounded to hundredths of a
/// percent, so the records print exactly in the text record format.
///
/// # Panics
///
/// Panics if `min_balance` is not below `max_balance`, if `min_balance`
/// is not positive, if `max_rate` is not positive, or if `terms` is empty
/// or holds a term that is not positive.
pub fn generate_random_records<R: Rng + ?Sized>(
    config: &PortfolioConfig,
    rng: &mut R,
) -> Vec<LoanRecord> {
    assert!(
        config.min_balance > 0.0 && config.min_balance < config.max_balance,
        "Balance range must be positive and non-empty"
    );
    assert!(config.max_rate > 0.0, "Maximum rate must be positive");
    assert!(!config.terms.is_empty(), "At least one term is required");
    assert!(
        config.terms.iter().all(|&t| t > 0.0),
        "Terms must be positive"
    );

    (0..config.loan_count)
        .map(|i| {
            let balance = round_to(rng.gen_range(config.min_balance..config.max_balance), 2);
            let rate = round_to(rng.gen_range(0.0..config.max_rate), 2);
            let term = config.terms[rng.gen_range(0..config.terms.len())];
            LoanRecord::new(format!("L{:03}", i + 1), balance.max(0.01), rate, term)
        })
        .collect()
}

/// Generate a random portfolio from [`generate_random_records`].
pub fn generate_random_portfolio<R: Rng + ?Sized>(
    config: &PortfolioConfig,
    rng: &mut R,
) -> Portfolio {
    Portfolio::from_records(&generate_random_records(config, rng))
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}
