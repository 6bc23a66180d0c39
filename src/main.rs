//! snowball CLI
//!
//! Simulate a snowball loan payoff from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Months until debt free, paying only the minimums
//! snowball simple --input loans.txt
//!
//! # Full schedule with a $2,500 monthly budget
//! snowball report --input loans.txt --budget 2500
//!
//! # Search 5,000 random orderings, reproducibly
//! snowball shuffle --input loans.txt --extra 200 --trials 5000 --seed 42
//!
//! # Generate a random portfolio for testing
//! snowball generate --loans 12 --seed 7
//! ```

use chrono::NaiveDate;
use loan_snowball::amortization::engine::AmortizationEngine;
use loan_snowball::amortization::schedule::Schedule;
use loan_snowball::core::money::Credit;
use loan_snowball::core::portfolio::Portfolio;
use loan_snowball::input::records::{parse_json, parse_text, to_text, InputError, LoanRecord};
use loan_snowball::optimization::order_search::{OrderSearch, SearchOutcome, DEFAULT_TRIALS};
use loan_snowball::report::{format_cents, PortfolioSummary};
use loan_snowball::simulation::random_portfolio::{generate_random_records, PortfolioConfig};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::io::{self, Read};
use std::process;

fn print_usage() {
    eprintln!(
        r#"snowball: snowball-method loan payoff simulator

USAGE:
    snowball <COMMAND> [OPTIONS]

COMMANDS:
    simple      Print the number of months until every loan is paid off
    report      Print the loan summary and the full month-by-month schedule
    shuffle     Search random loan orderings for a faster payoff
    generate    Generate a random portfolio (for testing)
    help        Show this message

OPTIONS (simple, report, shuffle):
    --input <FILE>          Loan records file, '-' for stdin (default: stdin)
    --input-format <FMT>    text or json (default: json for *.json, else text)
    --budget <AMOUNT>       Total monthly budget (default: sum of minimums)
    --extra <AMOUNT>        Monthly amount on top of the minimums
    --max-periods <N>       Give up after N months (default: 10000)
    --format <FORMAT>       Output format: text (default) or json

OPTIONS (report):
    --start-date <DATE>     Month of the first payment, YYYY-MM-DD

OPTIONS (shuffle):
    --trials <N>            Random orderings to try (default: 1000)
    --seed <N>              Seed the random generator
    --verbose               Print the schedule of every improvement

OPTIONS (generate):
    --loans <N>             Number of loans (default: 8)
    --seed <N>              Seed the random generator
    --output <FILE>         Write to file instead of stdout

INPUT FORMAT (text):
    # name  balance  rate%  years
    CAR     12000    6.9    5
    CARD    3400.50  22.9   3

EXAMPLES:
    snowball simple --input loans.txt
    snowball report --input loans.txt --budget 2500 --start-date 2025-01-01
    snowball shuffle --input loans.json --extra 200 --trials 5000 --seed 42
    snowball generate --loans 12 --seed 7 --output loans.txt"#
    );
}

#[derive(Debug, Default)]
struct Options {
    input: Option<String>,
    input_format: Option<String>,
    budget: Option<f64>,
    extra: Option<f64>,
    max_periods: Option<u32>,
    json: bool,
    start_date: Option<NaiveDate>,
    trials: Option<u32>,
    seed: Option<u64>,
    verbose: bool,
    loans: Option<usize>,
    output: Option<String>,
}

fn value<'a>(args: &'a [String], i: usize, flag: &str, expected: &str) -> &'a str {
    args.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, expected);
        process::exit(1);
    })
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let raw = value(args, i, flag, "a number");
    raw.parse().unwrap_or_else(|_| {
        eprintln!("{} requires a number, got '{}'", flag, raw);
        process::exit(1);
    })
}

fn parse_options(args: &[String]) -> Options {
    let mut opts = Options::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--input" => {
                i += 1;
                opts.input = Some(value(args, i, flag, "a file path").to_string());
            }
            "--input-format" => {
                i += 1;
                opts.input_format = Some(value(args, i, flag, "'text' or 'json'").to_string());
            }
            "--budget" => {
                i += 1;
                opts.budget = Some(number(args, i, flag));
            }
            "--extra" => {
                i += 1;
                opts.extra = Some(number(args, i, flag));
            }
            "--max-periods" => {
                i += 1;
                opts.max_periods = Some(number(args, i, flag));
            }
            "--format" => {
                i += 1;
                opts.json = match value(args, i, flag, "'text' or 'json'") {
                    "json" => true,
                    "text" => false,
                    other => {
                        eprintln!("Unknown format: {}", other);
                        process::exit(1);
                    }
                };
            }
            "--start-date" => {
                i += 1;
                let raw = value(args, i, flag, "a date (YYYY-MM-DD)");
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|e| {
                    eprintln!("Invalid date '{}': {}", raw, e);
                    process::exit(1);
                });
                opts.start_date = Some(date);
            }
            "--trials" => {
                i += 1;
                opts.trials = Some(number(args, i, flag));
            }
            "--seed" => {
                i += 1;
                opts.seed = Some(number(args, i, flag));
            }
            "--verbose" => opts.verbose = true,
            "--loans" => {
                i += 1;
                opts.loans = Some(number(args, i, flag));
            }
            "--output" => {
                i += 1;
                opts.output = Some(value(args, i, flag, "a file path").to_string());
            }
            _ => {
                eprintln!("Unknown option: {}", flag);
                process::exit(1);
            }
        }
        i += 1;
    }

    if opts.budget.is_some() && opts.extra.is_some() {
        eprintln!("Error: --budget and --extra are mutually exclusive");
        process::exit(1);
    }
    opts
}

fn read_records(opts: &Options) -> Result<Vec<LoanRecord>, InputError> {
    let path = opts.input.as_deref().unwrap_or("-");
    let content = if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };

    let json = match opts.input_format.as_deref() {
        Some("json") => true,
        Some("text") => false,
        Some(other) => {
            eprintln!("Unknown input format: {}", other);
            process::exit(1);
        }
        None => path.ends_with(".json"),
    };
    if json {
        parse_json(&content)
    } else {
        parse_text(&content)
    }
}

fn load_portfolio(opts: &Options) -> Portfolio {
    let records = read_records(opts).unwrap_or_else(|e| {
        eprintln!("Error reading loans: {}", e);
        process::exit(1);
    });
    if records.is_empty() {
        eprintln!("Error: no loan records found");
        process::exit(1);
    }
    debug!("loaded {} loan records", records.len());
    Portfolio::from_records(&records)
}

/// Resolve `--budget` / `--extra` into the baseline extra payment,
/// refusing budgets that do not cover the minimum payments.
fn baseline_extra(portfolio: &Portfolio, opts: &Options) -> Credit {
    let minimums = portfolio.total_minimum_payments();
    let budget = match (opts.budget, opts.extra) {
        (Some(budget), _) => Credit::new(budget),
        (None, Some(extra)) => minimums + Credit::new(extra),
        (None, None) => minimums,
    };
    if !budget.amount().is_finite() {
        eprintln!("Error: budget must be a finite amount");
        process::exit(1);
    }
    AmortizationEngine::check_budget(portfolio, budget).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    })
}

fn engine(opts: &Options) -> AmortizationEngine {
    match opts.max_periods {
        Some(max) => AmortizationEngine::new().with_max_periods(max),
        None => AmortizationEngine::new(),
    }
}

fn print_json<T: serde::Serialize>(output: &T) {
    let json = serde_json::to_string_pretty(output).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        process::exit(1);
    });
    println!("{}", json);
}

fn cmd_simple(args: &[String]) {
    let opts = parse_options(args);
    let mut portfolio = load_portfolio(&opts);
    let extra = baseline_extra(&portfolio, &opts);

    let periods = engine(&opts)
        .count_periods(&mut portfolio, extra)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if opts.json {
        #[derive(serde::Serialize)]
        struct SimpleOutput {
            periods: u32,
        }
        print_json(&SimpleOutput { periods });
    } else {
        println!("{}", periods);
    }
}

/// JSON output schema for the report command.
#[derive(serde::Serialize)]
struct ReportOutput<'a> {
    loans: Vec<LoanOutput>,
    monthly_budget: String,
    extra_payment: String,
    periods: u32,
    total_paid: String,
    total_interest: String,
    payoff_date: Option<NaiveDate>,
    schedule: &'a Schedule,
}

#[derive(serde::Serialize)]
struct LoanOutput {
    name: String,
    balance: String,
    annual_rate: f64,
    term_years: f64,
    minimum_payment: String,
    payoff_period: Option<u32>,
}

fn cmd_report(args: &[String]) {
    let opts = parse_options(args);
    let mut portfolio = load_portfolio(&opts);
    let extra = baseline_extra(&portfolio, &opts);
    let budget = portfolio.total_minimum_payments() + extra;
    let summary = PortfolioSummary(&portfolio).to_string();
    let opening = portfolio.clone();

    let schedule = engine(&opts)
        .amortize(&mut portfolio, extra)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });
    let payoff_date = opts.start_date.and_then(|d| schedule.payoff_date(d));

    if opts.json {
        let loans = opening
            .iter()
            .enumerate()
            .map(|(i, loan)| LoanOutput {
                name: loan.name().to_string(),
                balance: format_cents(loan.balance().amount()),
                annual_rate: loan.annual_rate_percent(),
                term_years: loan.term_years(),
                minimum_payment: format_cents(loan.minimum_payment().amount()),
                payoff_period: schedule.payoff_period(i),
            })
            .collect();
        print_json(&ReportOutput {
            loans,
            monthly_budget: format_cents(budget.amount()),
            extra_payment: format_cents(extra.amount()),
            periods: schedule.periods(),
            total_paid: format_cents(schedule.total_paid().amount()),
            total_interest: format_cents(schedule.total_interest().amount()),
            payoff_date,
            schedule: &schedule,
        });
        return;
    }

    print!("{}", summary);
    println!("   Monthly budget:         {}", format_cents(budget.amount()));
    println!();
    print!("{}", schedule);
    println!();
    println!("Paid off in {} months", schedule.periods());
    println!("Total paid:     {}", format_cents(schedule.total_paid().amount()));
    println!(
        "Total interest: {}",
        format_cents(schedule.total_interest().amount())
    );
    if let Some(date) = payoff_date {
        println!("Debt free by:   {}", date.format("%B %Y"));
    }
}

fn cmd_shuffle(args: &[String]) {
    let opts = parse_options(args);
    let mut portfolio = load_portfolio(&opts);
    let extra = baseline_extra(&portfolio, &opts);

    // One generator for the whole process, never reseeded per trial.
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let search = OrderSearch::new(opts.trials.unwrap_or(DEFAULT_TRIALS))
        .verbose(opts.verbose)
        .with_engine(engine(&opts));
    let outcome: SearchOutcome = search
        .run(&mut portfolio, extra, &mut rng)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if opts.json {
        print_json(&outcome);
        return;
    }

    println!("Starting minimum: {}", outcome.baseline_periods);
    for improvement in &outcome.improvements {
        println!(
            "New minimum: {} (trial {})",
            improvement.periods, improvement.trial
        );
        println!("  Order: {}", improvement.order.join(" "));
        if let Some(schedule) = &improvement.schedule {
            print!("{}", schedule);
        }
    }
    println!(
        "Best: {} months over {} trials ({} saved)",
        outcome.best_periods,
        outcome.trials,
        outcome.periods_saved()
    );
    println!("Best order: {}", portfolio.names().join(" "));
}

fn cmd_generate(args: &[String]) {
    let opts = parse_options(args);
    let config = PortfolioConfig {
        loan_count: opts.loans.unwrap_or(PortfolioConfig::default().loan_count),
        ..Default::default()
    };
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let records = generate_random_records(&config, &mut rng);

    let output = if opts.json {
        #[derive(serde::Serialize)]
        struct OutputFile<'a> {
            loans: &'a [LoanRecord],
        }
        serde_json::to_string_pretty(&OutputFile { loans: &records }).unwrap_or_else(|e| {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }) + "\n"
    } else {
        to_text(&records)
    };

    if let Some(path) = opts.output {
        fs::write(&path, &output).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} loans -> {}", records.len(), path);
    } else {
        print!("{}", output);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "simple" => cmd_simple(rest),
        "report" => cmd_report(rest),
        "shuffle" => cmd_shuffle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
