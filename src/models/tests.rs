#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn march_10() -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

// ── Transaction type ──────────────────────────────────────────

#[test]
fn test_transaction_type_round_trip() {
    for kind in TransactionType::all() {
        assert_eq!(TransactionType::parse(kind.as_str()), Some(*kind));
    }
}

#[test]
fn test_transaction_type_parse_is_case_insensitive() {
    assert_eq!(TransactionType::parse("Income"), Some(TransactionType::Income));
    assert_eq!(TransactionType::parse("EXPENSE"), Some(TransactionType::Expense));
}

#[test]
fn test_transaction_type_parse_rejects_unknown() {
    assert_eq!(TransactionType::parse("withdrawal"), None);
    assert_eq!(TransactionType::parse(""), None);
}

// ── Payment method ────────────────────────────────────────────

#[test]
fn test_payment_method_display_round_trip() {
    // Display string -> variant -> display string, lossless for all six
    for method in PaymentMethod::all() {
        assert_eq!(PaymentMethod::parse(method.as_str()), Some(*method));
    }
}

#[test]
fn test_payment_method_symbolic_round_trip() {
    for method in PaymentMethod::all() {
        assert_eq!(PaymentMethod::parse(method.name()), Some(*method));
    }
}

#[test]
fn test_payment_method_has_six_members() {
    assert_eq!(PaymentMethod::all().len(), 6);
}

#[test]
fn test_payment_method_display_strings() {
    assert_eq!(PaymentMethod::Cash.as_str(), "Cash");
    assert_eq!(PaymentMethod::DebitCard.as_str(), "Debit Card");
    assert_eq!(PaymentMethod::Pix.as_str(), "PIX");
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_transaction_kind_helpers() {
    let expense = Transaction::new(
        dec!(4.50),
        "Coffee".into(),
        1,
        march_10(),
        TransactionType::Expense,
    );
    assert!(expense.is_expense());
    assert!(!expense.is_income());

    let income = Transaction::new(
        dec!(3000),
        "Salary".into(),
        8,
        march_10(),
        TransactionType::Income,
    );
    assert!(income.is_income());
    assert!(!income.is_expense());
}

#[test]
fn test_transaction_new_defaults() {
    let txn = Transaction::new(
        dec!(10),
        "Bus".into(),
        2,
        march_10(),
        TransactionType::Expense,
    );
    assert!(txn.id.is_none());
    assert!(txn.payment_method.is_none());
    assert!(txn.tags.is_empty());
    assert!(txn.notes.is_empty());
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_placeholder() {
    let cat = Category::placeholder();
    assert_eq!(cat.name, "Unknown");
    assert_eq!(cat.icon, DEFAULT_ICON);
    assert_eq!(cat.color, DEFAULT_COLOR);
}

#[test]
fn test_category_find_by_name() {
    let cats = vec![
        Category::new("Food".into(), "🍽️".into(), "#E74C3C".into()),
        Category::new("Transport".into(), "🚗".into(), "#3498DB".into()),
    ];
    assert!(Category::find_by_name(&cats, "food").is_some());
    assert!(Category::find_by_name(&cats, "TRANSPORT").is_some());
    assert!(Category::find_by_name(&cats, "Housing").is_none());
}

// ── Budget ────────────────────────────────────────────────────

#[test]
fn test_budget_new_defaults() {
    let budget = Budget::new(1, dec!(500), 3, 2024);
    assert!(budget.id.is_none());
    assert!(budget.is_active);
    assert_eq!(budget.alert_threshold, DEFAULT_ALERT_THRESHOLD);
}

// ── Patches ───────────────────────────────────────────────────

#[test]
fn test_patches_default_to_no_changes() {
    let txn_patch = TransactionPatch::default();
    assert!(txn_patch.amount.is_none());
    assert!(txn_patch.description.is_none());

    let cat_patch = CategoryPatch::default();
    assert!(cat_patch.name.is_none());

    let budget_patch = BudgetPatch::default();
    assert!(budget_patch.amount.is_none());
}
