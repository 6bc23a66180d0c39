use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loan_snowball::amortization::engine::AmortizationEngine;
use loan_snowball::core::money::Credit;
use loan_snowball::optimization::order_search::OrderSearch;
use loan_snowball::simulation::random_portfolio::{generate_random_portfolio, PortfolioConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_amortize_8_loans(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(8);
    let mut portfolio = generate_random_portfolio(&PortfolioConfig::default(), &mut rng);
    let engine = AmortizationEngine::new();

    c.bench_function("count_periods_8_loans", |b| {
        b.iter(|| {
            portfolio.reset();
            engine.count_periods(black_box(&mut portfolio), Credit::new(250.0))
        })
    });
}

fn bench_amortize_50_loans(c: &mut Criterion) {
    let config = PortfolioConfig {
        loan_count: 50,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(50);
    let mut portfolio = generate_random_portfolio(&config, &mut rng);
    let engine = AmortizationEngine::new();

    c.bench_function("count_periods_50_loans", |b| {
        b.iter(|| {
            portfolio.reset();
            engine.count_periods(black_box(&mut portfolio), Credit::new(1_000.0))
        })
    });
}

fn bench_order_search_100_trials(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(100);
    let portfolio = generate_random_portfolio(&PortfolioConfig::default(), &mut rng);
    let search = OrderSearch::new(100);

    c.bench_function("order_search_100_trials", |b| {
        b.iter(|| {
            let mut trial = portfolio.clone();
            let mut rng = StdRng::seed_from_u64(7);
            search.run(black_box(&mut trial), Credit::new(250.0), &mut rng)
        })
    });
}

criterion_group!(
    benches,
    bench_amortize_8_loans,
    bench_amortize_50_loans,
    bench_order_search_100_trials
);
criterion_main!(benches);
