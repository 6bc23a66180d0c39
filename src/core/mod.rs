pub mod loan;
pub mod money;
pub mod portfolio;
