use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use rust_decimal::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::accounts::AccountRepositoryTrait;
use crate::errors::Result;
use crate::transactions::{TransactionRepositoryTrait, TransactionType};
use crate::users::UserRepositoryTrait;

use super::dashboard_model::{CategorySpending, DashboardSummary, MonthlyTotal, TransactionSummary};

const RECENT_TRANSACTIONS_LIMIT: i64 = 10;
const MONTHLY_TOTALS_MONTHS: i32 = 12;
const CATEGORY_SPENDING_MONTHS: i32 = 6;

/// Read-only aggregation over the stores. Sums are carried in `Decimal` so
/// the reported totals do not accumulate float noise.
pub struct DashboardService {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
}

impl DashboardService {
    /// Creates a new DashboardService instance with injected dependencies
    pub fn new(
        account_repository: Arc<dyn AccountRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            account_repository,
            transaction_repository,
            user_repository,
        }
    }

    /// Builds the dashboard summary for an owner: total balance across all
    /// accounts, the last 10 transactions, per-month income/expense totals
    /// over the trailing year and per-category expense totals over the
    /// trailing six months.
    pub fn get_summary(&self, owner_email: &str) -> Result<DashboardSummary> {
        let user = self.user_repository.find_by_email(owner_email)?;
        let today = Local::now().date_naive();

        let total_balance = self
            .account_repository
            .list_by_owner(&user.id)?
            .iter()
            .map(|account| Decimal::from_f64(account.balance).unwrap_or(Decimal::ZERO))
            .sum();

        let recent_transactions = self
            .transaction_repository
            .list_recent_with_account(&user.id, RECENT_TRANSACTIONS_LIMIT)?
            .into_iter()
            .map(|(t, account_name)| TransactionSummary {
                id: t.id,
                account_name,
                amount: Decimal::from_f64(t.amount).unwrap_or(Decimal::ZERO),
                txn_type: t.txn_type,
                category: t.category,
                date: t.txn_date.date().to_string(),
            })
            .collect();

        let monthly_totals = self.monthly_totals(&user.id, today)?;
        let category_spending = self.category_spending(&user.id, today)?;

        Ok(DashboardSummary {
            total_balance,
            recent_transactions,
            monthly_totals,
            category_spending,
        })
    }

    /// Income/expense totals bucketed per calendar month, covering the
    /// current year's transactions, emitted oldest month first over the
    /// trailing 12 months.
    fn monthly_totals(&self, owner_id: &str, today: NaiveDate) -> Result<Vec<MonthlyTotal>> {
        let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        let transactions = self
            .transaction_repository
            .list_by_owner_since(owner_id, year_start)?;

        let mut buckets: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        for t in &transactions {
            let month = t.txn_date.format("%Y-%m").to_string();
            let amount = Decimal::from_f64(t.amount).unwrap_or(Decimal::ZERO);
            let entry = buckets.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO));
            match TransactionType::parse(&t.txn_type)? {
                TransactionType::Income => entry.0 += amount,
                TransactionType::Expense => entry.1 += amount,
            }
        }

        let mut totals = Vec::with_capacity(MONTHLY_TOTALS_MONTHS as usize);
        for back in (0..MONTHLY_TOTALS_MONTHS).rev() {
            let month = shift_months(today, -back).format("%Y-%m").to_string();
            let (income, expense) = buckets
                .get(&month)
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            totals.push(MonthlyTotal {
                month,
                income,
                expense,
            });
        }

        Ok(totals)
    }

    /// Expense totals per category over the trailing six months, largest
    /// spender first.
    fn category_spending(&self, owner_id: &str, today: NaiveDate) -> Result<Vec<CategorySpending>> {
        let since = shift_months(today, -CATEGORY_SPENDING_MONTHS).and_time(NaiveTime::MIN);
        let transactions = self
            .transaction_repository
            .list_by_owner_since(owner_id, since)?;

        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for t in &transactions {
            if TransactionType::parse(&t.txn_type)? == TransactionType::Expense {
                let amount = Decimal::from_f64(t.amount).unwrap_or(Decimal::ZERO);
                *totals.entry(t.category.clone()).or_insert(Decimal::ZERO) += amount;
            }
        }

        let mut spending: Vec<CategorySpending> = totals
            .into_iter()
            .map(|(category, total_spent)| CategorySpending {
                category,
                total_spent,
            })
            .collect();
        spending.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));

        Ok(spending)
    }
}

/// Shifts a date by whole months, clamping the day to the target month's
/// length (Jan 31 - 1 month = Dec 31, Mar 31 - 1 month = Feb 28/29).
fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    // Valid by construction: day is clamped to the month's length.
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts_months_across_year_boundaries() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();
        assert_eq!(
            shift_months(date, -6),
            NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
        );
        assert_eq!(
            shift_months(date, 11),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
        );
    }

    #[test]
    fn shifting_clamps_to_month_length() {
        let jan_31 = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            shift_months(jan_31, 1),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        let march_31 = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            shift_months(march_31, -1),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
