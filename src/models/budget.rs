use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Fraction of the budgeted amount at which the budget is flagged at-risk.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Option<i64>,
    pub category_id: i64,
    /// Planned spend for the period.
    pub amount: Decimal,
    /// 1-12.
    pub month: u32,
    pub year: i32,
    /// Fraction in [0, 1].
    pub alert_threshold: f64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Budget {
    pub fn new(category_id: i64, amount: Decimal, month: u32, year: i32) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            id: None,
            category_id,
            amount,
            month,
            year,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a budget. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    pub amount: Option<Decimal>,
    pub alert_threshold: Option<f64>,
    pub is_active: Option<bool>,
}
