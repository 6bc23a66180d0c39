use loan_snowball::amortization::engine::{AmortizationEngine, AmortizationError};
use loan_snowball::core::loan::Loan;
use loan_snowball::core::money::Credit;
use loan_snowball::core::portfolio::Portfolio;
use loan_snowball::optimization::order_search::OrderSearch;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Principal between 100.00 and 100,000.00, in whole cents.
fn arb_balance() -> impl Strategy<Value = f64> {
    (10_000u64..10_000_000u64).prop_map(|cents| cents as f64 / 100.0)
}

/// Annual rate between 0% and 30%, in hundredths of a percent.
fn arb_rate() -> impl Strategy<Value = f64> {
    (0u32..=3_000u32).prop_map(|bp| bp as f64 / 100.0)
}

/// Term in whole years from the usual loan terms.
fn arb_term() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![1.0, 2.0, 3.0, 5.0, 10.0, 15.0, 30.0])
}

fn arb_loan() -> impl Strategy<Value = Loan> {
    (arb_balance(), arb_rate(), arb_term())
        .prop_map(|(balance, rate, term)| Loan::new("L", balance, rate, term))
}

/// A portfolio of 1..8 loans, named by position.
fn arb_portfolio() -> impl Strategy<Value = Portfolio> {
    prop::collection::vec((arb_balance(), arb_rate(), arb_term()), 1..8).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (balance, rate, term))| Loan::new(format!("L{}", i + 1), balance, rate, term))
            .collect::<Portfolio>()
    })
}

/// Extra monthly funds between 0 and 2,000.
fn arb_extra() -> impl Strategy<Value = Credit> {
    (0u32..200_000u32).prop_map(|cents| Credit::new(cents as f64 / 100.0))
}

proptest! {
    // ===================================================================
    // Zero-rate loans amortize straight-line.
    // ===================================================================
    #[test]
    fn zero_rate_payment_is_balance_over_term(balance in arb_balance(), term in arb_term()) {
        let loan = Loan::new("FLAT", balance, 0.0, term);
        let expected = balance / (term * 12.0);
        prop_assert!((loan.minimum_payment().amount() - expected).abs() < 1e-9);
    }

    // ===================================================================
    // The minimum payment alone pays a loan off within its term. Interest
    // accrues after each payment, so it never takes longer, and a
    // zero-rate loan takes exactly its term.
    // ===================================================================
    #[test]
    fn minimum_payment_pays_off_within_term(loan in arb_loan()) {
        let term = loan.term_periods() as u32;
        let zero_rate = loan.periodic_rate() == 0.0;
        let mut portfolio: Portfolio = std::iter::once(loan).collect();
        let periods = AmortizationEngine::new()
            .count_periods(&mut portfolio, Credit::ZERO)
            .unwrap();
        prop_assert!(periods >= 1);
        prop_assert!(periods <= term, "took {} periods for a {}-period term", periods, term);
        if zero_rate {
            prop_assert_eq!(periods, term);
        }
        prop_assert!(portfolio.is_paid_off());
    }

    // ===================================================================
    // Reset restores the original principal exactly.
    // ===================================================================
    #[test]
    fn reset_restores_original_balance(mut loan in arb_loan(), payments in 0usize..24) {
        let original = loan.balance();
        for _ in 0..payments {
            if loan.is_paid_off() {
                break;
            }
            loan.pay(None);
        }
        loan.reset();
        prop_assert_eq!(loan.balance(), original);
        prop_assert_eq!(loan.original_balance(), original);
    }

    // ===================================================================
    // Balances never grow from one period to the next, and never go
    // negative.
    // ===================================================================
    #[test]
    fn total_balance_never_increases(mut portfolio in arb_portfolio(), extra in arb_extra()) {
        let mut previous = portfolio.total_balance().amount();
        let mut periods = 0;
        while !portfolio.is_paid_off() && periods < 400 {
            AmortizationEngine::pay_period(&mut portfolio, extra);
            let current = portfolio.total_balance().amount();
            prop_assert!(current <= previous + 1e-9 * previous.max(1.0));
            for loan in &portfolio {
                prop_assert!(loan.balance().amount() >= 0.0);
            }
            previous = current;
            periods += 1;
        }
        prop_assert!(portfolio.is_paid_off());
    }

    // ===================================================================
    // More extra money never delays the payoff.
    // ===================================================================
    #[test]
    fn more_extra_never_takes_longer(
        mut portfolio in arb_portfolio(),
        extra in arb_extra(),
        more in arb_extra(),
    ) {
        let engine = AmortizationEngine::new();
        let base = engine.count_periods(&mut portfolio, extra).unwrap();
        portfolio.reset();
        let with_more = engine.count_periods(&mut portfolio, extra + more).unwrap();
        prop_assert!(with_more <= base);
    }

    // ===================================================================
    // Freed payments only ever cover paid-off loans, so they never exceed
    // the total of all minimum payments.
    // ===================================================================
    #[test]
    fn freed_payments_bounded_by_minimums(mut portfolio in arb_portfolio(), periods in 0usize..60) {
        for _ in 0..periods {
            if portfolio.is_paid_off() {
                break;
            }
            AmortizationEngine::pay_period(&mut portfolio, Credit::ZERO);
        }
        prop_assert!(portfolio.freed_payments() <= portfolio.total_minimum_payments());
    }

    // ===================================================================
    // A budget is accepted exactly when it covers the minimum payments,
    // and the extra it leaves is the difference.
    // ===================================================================
    #[test]
    fn budget_check_matches_minimums(portfolio in arb_portfolio(), delta in -50_000i32..50_000i32) {
        let required = portfolio.total_minimum_payments();
        let budget = Credit::new(required.amount() + delta as f64 / 100.0);
        match AmortizationEngine::check_budget(&portfolio, budget) {
            Ok(extra) => {
                prop_assert!(budget >= required);
                prop_assert!((extra.amount() - (budget - required).amount()).abs() < 1e-9);
            }
            Err(AmortizationError::InsufficientBudget { supplied, required: r }) => {
                prop_assert!(budget < required);
                prop_assert_eq!(supplied, budget);
                prop_assert_eq!(r, required);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    // ===================================================================
    // A schedule has one row per period plus the starting balances, and
    // agrees with the plain period count.
    // ===================================================================
    #[test]
    fn schedule_agrees_with_count(mut portfolio in arb_portfolio(), extra in arb_extra()) {
        let engine = AmortizationEngine::new();
        let periods = engine.count_periods(&mut portfolio, extra).unwrap();
        portfolio.reset();
        let schedule = engine.amortize(&mut portfolio, extra).unwrap();
        prop_assert_eq!(schedule.periods(), periods);
        prop_assert!(schedule.balances(periods).unwrap().iter().all(|b| b.is_zero()));
        prop_assert!(schedule.balances(periods + 1).is_none());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // ===================================================================
    // The search never reports worse than the starting order, each
    // improvement is strictly better than the last, and the portfolio
    // comes back reset in an order that achieves the reported best.
    // ===================================================================
    #[test]
    fn search_never_worse_than_baseline(
        mut portfolio in arb_portfolio(),
        extra in arb_extra(),
        seed in any::<u64>(),
    ) {
        let original_balance = portfolio.total_balance();
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = OrderSearch::new(20).run(&mut portfolio, extra, &mut rng).unwrap();

        prop_assert!(outcome.best_periods <= outcome.baseline_periods);
        let mut last = outcome.baseline_periods;
        for improvement in &outcome.improvements {
            prop_assert!(improvement.periods < last);
            last = improvement.periods;
        }
        prop_assert_eq!(last, outcome.best_periods);

        let restored = portfolio.total_balance().amount();
        prop_assert!((restored - original_balance.amount()).abs() < 1e-6);
        let replayed = AmortizationEngine::new().count_periods(&mut portfolio, extra).unwrap();
        prop_assert_eq!(replayed, outcome.best_periods);
    }
}
