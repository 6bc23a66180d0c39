//! # loan-snowball
//!
//! Loan payoff simulation with the snowball method.
//!
//! Given a list of amortizing loans and a fixed monthly budget, this crate
//! computes how many months it takes to pay everything off when extra
//! funds and the minimum payments freed by finished loans are cascaded,
//! in portfolio order, onto the loans still open. A randomized search over
//! loan orderings looks for an order that finishes sooner.
//!
//! ## Architecture
//!
//! - **core**: Money types, loans and the ordered portfolio
//! - **amortization**: The month-by-month snowball loop and its schedule
//! - **optimization**: Randomized loan order search
//! - **input**: Loan record parsing (text and JSON)
//! - **report**: Text tables for portfolios
//! - **simulation**: Random portfolio generation

pub mod amortization;
pub mod core;
pub mod input;
pub mod optimization;
pub mod report;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::amortization::engine::{AmortizationEngine, AmortizationError};
    pub use crate::amortization::schedule::Schedule;
    pub use crate::core::loan::Loan;
    pub use crate::core::money::{Credit, Debit};
    pub use crate::core::portfolio::Portfolio;
    pub use crate::input::records::{InputError, LoanRecord};
    pub use crate::optimization::order_search::{OrderSearch, SearchOutcome};
}
