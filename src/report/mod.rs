//! Aggregation queries feeding dashboards and charts.
//!
//! All functions are read-only over the store and recompute from scratch on
//! every call. Monetary sums are folded over `Decimal` in Rust so they stay
//! exact; percentage computations yield 0 on a zero denominator instead of
//! erroring or going non-finite.

use anyhow::Result;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::db::Database;
use crate::models::{Category, Transaction, TransactionType};
use crate::period;

#[derive(Debug, Clone)]
pub struct DashboardMetrics {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
    pub transaction_count: usize,
    /// Percent change of expenses vs. the previous calendar month; 0 when the
    /// previous month had no expenses.
    pub expense_variation: f64,
    /// Mean expense transaction amount; 0 when there are none.
    pub avg_transaction: Decimal,
}

#[derive(Debug, Clone)]
pub struct CategoryBreakdown {
    pub category_id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total: Decimal,
    pub count: usize,
    /// Share of the period's total expenses, in percent.
    pub percentage: f64,
}

#[derive(Debug, Clone)]
pub struct MonthlyPoint {
    pub month: u32,
    pub year: i32,
    pub label: &'static str,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct PaymentMethodBreakdown {
    pub method: String,
    pub total: Decimal,
    pub count: usize,
}

/// Label for expense transactions with no payment method recorded.
pub const UNKNOWN_METHOD: &str = "Unknown";

/// Period totals split by type, plus expense movement vs. the previous month.
pub fn dashboard_metrics(db: &Database, month: u32, year: i32) -> Result<DashboardMetrics> {
    let txns = db.get_transactions_by_period(month, year)?;
    let income = sum_of(&txns, TransactionType::Income);
    let expenses = sum_of(&txns, TransactionType::Expense);
    let expense_count = txns.iter().filter(|t| t.is_expense()).count();

    let (prev_month, prev_year) = period::previous(month, year);
    let prev_expenses = sum_of(
        &db.get_transactions_by_period(prev_month, prev_year)?,
        TransactionType::Expense,
    );

    let expense_variation = if prev_expenses > Decimal::ZERO {
        ((expenses - prev_expenses) / prev_expenses * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0)
    } else {
        0.0
    };

    let avg_transaction = if expense_count > 0 {
        (expenses / Decimal::from(expense_count)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    Ok(DashboardMetrics {
        income,
        expenses,
        balance: income - expenses,
        transaction_count: txns.len(),
        expense_variation,
        avg_transaction,
    })
}

/// Expense totals grouped by category, largest first, with display metadata
/// and share of the period's total expenses. Empty when the period has no
/// expense transactions.
pub fn category_breakdown(db: &Database, month: u32, year: i32) -> Result<Vec<CategoryBreakdown>> {
    let txns = db.get_transactions_by_period(month, year)?;

    let mut groups: HashMap<i64, (Decimal, usize)> = HashMap::new();
    for txn in txns.iter().filter(|t| t.is_expense()) {
        let entry = groups.entry(txn.category_id).or_insert((Decimal::ZERO, 0));
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    let total_expenses: Decimal = groups.values().map(|(total, _)| *total).sum();

    let mut rows = Vec::with_capacity(groups.len());
    for (category_id, (total, count)) in groups {
        let cat = db
            .get_category_by_id(category_id)?
            .unwrap_or_else(Category::placeholder);
        let percentage = if total_expenses > Decimal::ZERO {
            (total / total_expenses * Decimal::ONE_HUNDRED)
                .to_f64()
                .unwrap_or(0.0)
        } else {
            0.0
        };
        rows.push(CategoryBreakdown {
            category_id,
            name: cat.name,
            icon: cat.icon,
            color: cat.color,
            total,
            count,
            percentage,
        });
    }

    rows.sort_by(|a, b| b.total.cmp(&a.total));
    Ok(rows)
}

/// Income/expenses/balance for the `months` most recent calendar periods
/// counting back from the given anchor, oldest first. Pass
/// [`period::current`] to anchor the window at the wall clock.
pub fn monthly_evolution(
    db: &Database,
    month: u32,
    year: i32,
    months: usize,
) -> Result<Vec<MonthlyPoint>> {
    let mut periods = Vec::with_capacity(months);
    let (mut m, mut y) = (month, year);
    for _ in 0..months {
        periods.push((m, y));
        (m, y) = period::previous(m, y);
    }
    periods.reverse();

    let mut points = Vec::with_capacity(months);
    for (m, y) in periods {
        let txns = db.get_transactions_by_period(m, y)?;
        let income = sum_of(&txns, TransactionType::Income);
        let expenses = sum_of(&txns, TransactionType::Expense);
        points.push(MonthlyPoint {
            month: m,
            year: y,
            label: period::month_abbr(m),
            income,
            expenses,
            balance: income - expenses,
        });
    }
    Ok(points)
}

/// The `limit` largest expense transactions of the period, descending by
/// amount. The sort is stable, so ties keep their storage order.
pub fn top_expenses(
    db: &Database,
    month: u32,
    year: i32,
    limit: usize,
) -> Result<Vec<Transaction>> {
    let mut txns: Vec<Transaction> = db
        .get_transactions_by_period(month, year)?
        .into_iter()
        .filter(|t| t.is_expense())
        .collect();
    txns.sort_by(|a, b| b.amount.cmp(&a.amount));
    txns.truncate(limit);
    Ok(txns)
}

/// Expense totals and counts per payment method, largest first. Transactions
/// with no method recorded are bucketed under [`UNKNOWN_METHOD`].
pub fn payment_method_breakdown(
    db: &Database,
    month: u32,
    year: i32,
) -> Result<Vec<PaymentMethodBreakdown>> {
    let txns = db.get_transactions_by_period(month, year)?;

    let mut groups: HashMap<&'static str, (Decimal, usize)> = HashMap::new();
    for txn in txns.iter().filter(|t| t.is_expense()) {
        let method = txn.payment_method.map_or(UNKNOWN_METHOD, |m| m.as_str());
        let entry = groups.entry(method).or_insert((Decimal::ZERO, 0));
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    let mut rows: Vec<PaymentMethodBreakdown> = groups
        .into_iter()
        .map(|(method, (total, count))| PaymentMethodBreakdown {
            method: method.to_string(),
            total,
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    Ok(rows)
}

/// Sum of expense transactions for one category in a period. Consumed by the
/// budget evaluator.
pub fn category_expense_total(
    db: &Database,
    category_id: i64,
    month: u32,
    year: i32,
) -> Result<Decimal> {
    let txns = db.get_transactions_by_category(category_id, Some((month, year)))?;
    Ok(txns
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount)
        .sum())
}

fn sum_of(txns: &[Transaction], kind: TransactionType) -> Decimal {
    txns.iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}
