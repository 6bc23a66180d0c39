use crate::amortization::engine::{AmortizationEngine, AmortizationError};
use crate::amortization::schedule::Schedule;
use crate::core::money::Credit;
use crate::core::portfolio::Portfolio;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default number of random orderings tried.
pub const DEFAULT_TRIALS: u32 = 1_000;

/// A strictly better ordering found during the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    /// Trial number, starting from 1.
    pub trial: u32,
    pub periods: u32,
    /// Loan names in cascade order.
    pub order: Vec<String>,
    /// Full trace of the ordering, recorded in verbose mode only.
    pub schedule: Option<Schedule>,
}

/// Result of an order search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Periods needed with the portfolio's original order.
    pub baseline_periods: u32,
    /// Fewest periods seen. Never more than `baseline_periods`.
    pub best_periods: u32,
    pub trials: u32,
    /// Every strict improvement, in the order discovered.
    pub improvements: Vec<Improvement>,
}

impl SearchOutcome {
    pub fn improved(&self) -> bool {
        self.best_periods < self.baseline_periods
    }

    /// Periods saved over the original order.
    pub fn periods_saved(&self) -> u32 {
        self.baseline_periods - self.best_periods
    }
}

/// Randomized search for a loan ordering that pays the portfolio off
/// sooner.
///
/// Each trial resets every balance, shuffles the portfolio uniformly at
/// random and re-runs the amortization. An ordering is kept only if it is
/// strictly faster than the best so far, so ties never displace an earlier
/// ordering. The search is heuristic; it does not guarantee the optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSearch {
    trials: u32,
    verbose: bool,
    engine: AmortizationEngine,
}

impl Default for OrderSearch {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            verbose: false,
            engine: AmortizationEngine::default(),
        }
    }
}

impl OrderSearch {
    pub fn new(trials: u32) -> Self {
        Self {
            trials,
            ..Default::default()
        }
    }

    /// Record the full schedule of every improving ordering.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_engine(mut self, engine: AmortizationEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Run the search.
    ///
    /// On success the portfolio is left in the best order found, with all
    /// balances reset. The random source is supplied by the caller so a
    /// seeded generator gives reproducible searches.
    pub fn run<R: Rng + ?Sized>(
        &self,
        portfolio: &mut Portfolio,
        extra: Credit,
        rng: &mut R,
    ) -> Result<SearchOutcome, AmortizationError> {
        portfolio.reset();
        let baseline_periods = self.engine.count_periods(portfolio, extra)?;
        info!("starting minimum: {} periods", baseline_periods);

        portfolio.reset();
        let mut best_periods = baseline_periods;
        let mut best_order = portfolio.clone();
        let mut improvements = Vec::new();

        for trial in 1..=self.trials {
            portfolio.reset();
            portfolio.shuffle(rng);
            let periods = self.engine.count_periods(portfolio, extra)?;
            debug!("trial {}: {} periods", trial, periods);

            if periods < best_periods {
                best_periods = periods;
                info!("new minimum: {} periods (trial {})", periods, trial);

                portfolio.reset();
                best_order = portfolio.clone();
                let schedule = if self.verbose {
                    Some(self.engine.amortize(portfolio, extra)?)
                } else {
                    None
                };
                improvements.push(Improvement {
                    trial,
                    periods,
                    order: portfolio.names(),
                    schedule,
                });
            }
        }

        *portfolio = best_order;
        Ok(SearchOutcome {
            baseline_periods,
            best_periods,
            trials: self.trials,
            improvements,
        })
    }
}
