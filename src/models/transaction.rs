use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Whether a transaction adds to or subtracts from the balance. Amounts are
/// always positive; the sign of a transaction is carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }

    pub fn all() -> &'static [TransactionType] {
        &[Self::Income, Self::Expense, Self::Transfer]
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed set of payment methods. Each has a symbolic name and a display
/// string; the store persists the display string, and either form parses
/// back losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    DebitCard,
    CreditCard,
    Pix,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    /// Display string, as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::DebitCard => "Debit Card",
            Self::CreditCard => "Credit Card",
            Self::Pix => "PIX",
            Self::BankTransfer => "Bank Transfer",
            Self::Other => "Other",
        }
    }

    /// Symbolic name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::DebitCard => "DEBIT_CARD",
            Self::CreditCard => "CREDIT_CARD",
            Self::Pix => "PIX",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::Other => "OTHER",
        }
    }

    /// Parses either the symbolic name or the display string, case-insensitive.
    /// Returns `None` for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', " ").as_str() {
            "cash" => Some(Self::Cash),
            "debit card" => Some(Self::DebitCard),
            "credit card" => Some(Self::CreditCard),
            "pix" => Some(Self::Pix),
            "bank transfer" => Some(Self::BankTransfer),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn all() -> &'static [PaymentMethod] {
        &[
            Self::Cash,
            Self::DebitCard,
            Self::CreditCard,
            Self::Pix,
            Self::BankTransfer,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    /// Always positive; sign is conveyed by `kind`.
    pub amount: Decimal,
    pub description: String,
    pub category_id: i64,
    pub date: NaiveDateTime,
    pub kind: TransactionType,
    pub payment_method: Option<PaymentMethod>,
    pub tags: Vec<String>,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    pub fn new(
        amount: Decimal,
        description: String,
        category_id: i64,
        date: NaiveDateTime,
        kind: TransactionType,
    ) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            id: None,
            amount,
            description,
            category_id,
            date,
            kind,
            payment_method: None,
            tags: Vec::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// Partial update for a transaction. `None` fields are left unchanged;
/// amount, description, and notes are re-validated on apply.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub date: Option<NaiveDateTime>,
    pub kind: Option<TransactionType>,
    pub payment_method: Option<PaymentMethod>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}
