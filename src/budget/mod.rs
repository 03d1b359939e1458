//! Budget evaluation: planned spend vs. actual expenses for a period.
//!
//! Stateless; every status is recomputed from the store on each call.

use anyhow::Result;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::db::Database;
use crate::models::Category;
use crate::report;

#[derive(Debug, Clone)]
pub struct BudgetStatus {
    pub has_budget: bool,
    pub budgeted: Decimal,
    pub spent: Decimal,
    /// May be negative: overspend is representable, not clamped.
    pub remaining: Decimal,
    /// Spent as a percent of budgeted; 0 when budgeted is 0.
    pub percentage: f64,
    /// Alert threshold, in percent.
    pub threshold: f64,
    pub alert: bool,
}

impl BudgetStatus {
    fn absent() -> Self {
        Self {
            has_budget: false,
            budgeted: Decimal::ZERO,
            spent: Decimal::ZERO,
            remaining: Decimal::ZERO,
            percentage: 0.0,
            threshold: 0.0,
            alert: false,
        }
    }
}

/// A budget status with the category's display metadata attached.
#[derive(Debug, Clone)]
pub struct BudgetOverview {
    pub category_id: i64,
    pub category_name: String,
    pub category_icon: String,
    pub category_color: String,
    pub status: BudgetStatus,
}

/// Status of the active budget for a (category, month, year). A period with
/// no active budget yields zeroed fields and no alert.
pub fn status(db: &Database, category_id: i64, month: u32, year: i32) -> Result<BudgetStatus> {
    let Some(budget) = db.get_budget(category_id, month, year)? else {
        return Ok(BudgetStatus::absent());
    };

    let spent = report::category_expense_total(db, category_id, month, year)?;
    let remaining = budget.amount - spent;
    let percentage = if budget.amount > Decimal::ZERO {
        (spent / budget.amount * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0)
    } else {
        0.0
    };
    let threshold = budget.alert_threshold * 100.0;

    Ok(BudgetStatus {
        has_budget: true,
        budgeted: budget.amount,
        spent,
        remaining,
        percentage,
        threshold,
        alert: percentage >= threshold,
    })
}

/// Status of every active budget in the period, with category display
/// metadata. A soft-deleted category still resolves; an unresolvable
/// reference falls back to the placeholder.
pub fn status_all(db: &Database, month: u32, year: i32) -> Result<Vec<BudgetOverview>> {
    let budgets = db.get_budgets(month, year)?;

    let mut overviews = Vec::with_capacity(budgets.len());
    for budget in budgets {
        let entry = status(db, budget.category_id, month, year)?;
        let cat = db
            .get_category_by_id(budget.category_id)?
            .unwrap_or_else(Category::placeholder);
        overviews.push(BudgetOverview {
            category_id: budget.category_id,
            category_name: cat.name,
            category_icon: cat.icon,
            category_color: cat.color,
            status: entry,
        });
    }
    Ok(overviews)
}
