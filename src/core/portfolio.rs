use crate::core::loan::Loan;
use crate::core::money::{Credit, Debit};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// An ordered collection of loans.
///
/// Order is significant: it is the snowball cascade order. A loan earlier
/// in the portfolio receives leftover funds before the loans after it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Portfolio {
    loans: Vec<Loan>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self { loans: Vec::new() }
    }

    pub fn add(&mut self, loan: Loan) {
        self.loans.push(loan);
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub(crate) fn loans_mut(&mut self) -> &mut [Loan] {
        &mut self.loans
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Loan> {
        self.loans.iter()
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// Loan names in cascade order.
    pub fn names(&self) -> Vec<String> {
        self.loans.iter().map(|l| l.name().to_string()).collect()
    }

    /// Sum of all outstanding balances. Zero exactly when every loan is
    /// paid off.
    pub fn total_balance(&self) -> Debit {
        self.loans.iter().map(|l| l.balance()).sum()
    }

    /// Minimum payments no longer owed because their loan is paid off.
    pub fn freed_payments(&self) -> Credit {
        self.loans
            .iter()
            .filter(|l| l.is_paid_off())
            .map(|l| l.minimum_payment())
            .sum()
    }

    /// Sum of every loan's minimum payment, paid off or not.
    pub fn total_minimum_payments(&self) -> Credit {
        self.loans.iter().map(|l| l.minimum_payment()).sum()
    }

    pub fn is_paid_off(&self) -> bool {
        self.total_balance().is_zero()
    }

    /// Restore every loan to its original balance.
    pub fn reset(&mut self) {
        for loan in &mut self.loans {
            loan.reset();
        }
    }

    /// Put the loans in a uniformly random order (Fisher-Yates).
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.loans.shuffle(rng);
    }
}

impl FromIterator<Loan> for Portfolio {
    fn from_iter<T: IntoIterator<Item = Loan>>(iter: T) -> Self {
        Self {
            loans: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Portfolio {
    type Item = &'a Loan;
    type IntoIter = std::slice::Iter<'a, Loan>;

    fn into_iter(self) -> Self::IntoIter {
        self.loans.iter()
    }
}
