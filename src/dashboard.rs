//! Income/expense totals shown next to the monthly chart.
//!
//! [`DashboardContext`] is built once per session from the user's income and
//! expense transactions and handed by reference to whatever renders the
//! summary cards.

use crate::engine::ExpenseReport;
use crate::error::{ExpenseReportError, Result};
use crate::utils::checked_sum;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
}

/// Inclusive date filter. An open bound matches everything on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_balance: Decimal,
    pub current_month_expense: Decimal,
    pub income_range: Option<AmountRange>,
    pub expense_range: Option<AmountRange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardContext {
    incomes: Vec<Transaction>,
    expenses: Vec<Transaction>,
}

impl DashboardContext {
    pub fn new(incomes: Vec<Transaction>, expenses: Vec<Transaction>) -> Self {
        Self { incomes, expenses }
    }

    pub fn incomes(&self) -> &[Transaction] {
        &self.incomes
    }

    pub fn expenses(&self) -> &[Transaction] {
        &self.expenses
    }

    pub fn total_income(&self, range: Option<DateRange>) -> Result<Decimal> {
        let range = range.unwrap_or_default();
        checked_sum(
            self.incomes
                .iter()
                .filter(|t| range.contains(t.date))
                .map(|t| &t.amount),
        )
        .ok_or_else(|| overflow("total income"))
    }

    pub fn total_expenses(&self) -> Result<Decimal> {
        checked_sum(self.expenses.iter().map(|t| &t.amount))
            .ok_or_else(|| overflow("total expenses"))
    }

    /// Income minus expenses over all time. Negative when overspent.
    pub fn total_balance(&self) -> Result<Decimal> {
        self.total_income(None)?
            .checked_sub(self.total_expenses()?)
            .ok_or_else(|| overflow("total balance"))
    }

    pub fn income_range(&self) -> Option<AmountRange> {
        amount_range(&self.incomes)
    }

    pub fn expense_range(&self) -> Option<AmountRange> {
        amount_range(&self.expenses)
    }

    /// Spending in the most recent month of the monthly report.
    pub fn current_month_expense(&self, report: Option<&ExpenseReport>) -> Decimal {
        report.map(ExpenseReport::latest_total).unwrap_or(Decimal::ZERO)
    }

    pub fn summary(
        &self,
        range: Option<DateRange>,
        report: Option<&ExpenseReport>,
    ) -> Result<DashboardSummary> {
        Ok(DashboardSummary {
            total_income: self.total_income(range)?,
            total_expenses: self.total_expenses()?,
            total_balance: self.total_balance()?,
            current_month_expense: self.current_month_expense(report),
            income_range: self.income_range(),
            expense_range: self.expense_range(),
        })
    }
}

fn overflow(what: &str) -> ExpenseReportError {
    ExpenseReportError::AmountOverflow(format!("{} exceeds {}", what, Decimal::MAX))
}

fn amount_range(transactions: &[Transaction]) -> Option<AmountRange> {
    let min = transactions.iter().map(|t| t.amount).min()?;
    let max = transactions.iter().map(|t| t.amount).max()?;
    Some(AmountRange { min, max })
}
