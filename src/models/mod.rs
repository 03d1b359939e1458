mod budget;
mod category;
mod transaction;

pub use budget::{Budget, BudgetPatch, DEFAULT_ALERT_THRESHOLD};
pub use category::{Category, CategoryPatch, DEFAULT_COLOR, DEFAULT_ICON};
pub use transaction::{PaymentMethod, Transaction, TransactionPatch, TransactionType};

#[cfg(test)]
mod tests;
