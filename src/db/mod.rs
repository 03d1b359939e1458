mod schema;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;
use crate::validate;

const TRANSACTION_COLUMNS: &str =
    "id, amount, description, category_id, date, type, payment_method, tags, notes, created_at, updated_at";

const BUDGET_COLUMNS: &str =
    "id, category_id, amount, month, year, alert_threshold, is_active, created_at, updated_at";

const CATEGORY_COLUMNS: &str = "id, name, icon, color, is_active, created_at";

/// The single process-wide store. Construct once and pass by reference to the
/// report and budget modules; every write is its own atomic commit.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_default_categories()?;
        log::info!("opened database at {}", path.display());
        Ok(db)
    }

    /// In-memory store with the same schema and seed data. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            log::debug!("applied schema v{}", schema::CURRENT_VERSION);
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
                log::debug!("applied migration from schema v{from_version}");
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    /// Inserts the default category set, but only into an empty table.
    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let defaults = [
            ("Food", "🍽️", "#E74C3C"),
            ("Transport", "🚗", "#3498DB"),
            ("Housing", "🏠", "#9B59B6"),
            ("Health", "⚕️", "#1ABC9C"),
            ("Education", "📚", "#F39C12"),
            ("Leisure", "🎮", "#E67E22"),
            ("Clothing", "👔", "#95A5A6"),
            ("Salary", "💰", "#27AE60"),
            ("Other", "📦", "#34495E"),
        ];

        let now = Local::now().naive_local();
        let tx = self.conn.transaction()?;
        for (name, icon, color) in defaults {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name, icon, color, is_active, created_at)
                 VALUES (?1, ?2, ?3, 1, ?4)",
                params![name, icon, color, now],
            )?;
        }
        tx.commit()?;
        log::debug!("seeded {} default categories", defaults.len());
        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    /// Inserts a category and returns the stored row, id and timestamp
    /// assigned. Fails if the name is already taken, active or not.
    pub fn insert_category(&self, cat: &Category) -> Result<Category> {
        let now = Local::now().naive_local();
        self.conn
            .execute(
                "INSERT INTO categories (name, icon, color, is_active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![cat.name, cat.icon, cat.color, cat.is_active, now],
            )
            .with_context(|| format!("Failed to insert category '{}'", cat.name))?;
        Ok(Category {
            id: Some(self.conn.last_insert_rowid()),
            created_at: now,
            ..cat.clone()
        })
    }

    pub fn get_categories(&self, active_only: bool) -> Result<Vec<Category>> {
        let sql = if active_only {
            format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_active = 1 ORDER BY name")
        } else {
            format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name")
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_category)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Resolves a category by id regardless of its active flag, so references
    /// from transactions and budgets survive soft deletion.
    pub fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
            params![id],
            map_category,
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies a partial update; returns the updated row, or `None` if the id
    /// does not resolve.
    pub fn update_category(&self, id: i64, patch: &CategoryPatch) -> Result<Option<Category>> {
        if self.get_category_by_id(id)?.is_none() {
            return Ok(None);
        }

        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(name) = &patch.name {
            sets.push(format!("name = ?{}", values.len() + 1));
            values.push(Box::new(name.clone()));
        }
        if let Some(icon) = &patch.icon {
            sets.push(format!("icon = ?{}", values.len() + 1));
            values.push(Box::new(icon.clone()));
        }
        if let Some(color) = &patch.color {
            sets.push(format!("color = ?{}", values.len() + 1));
            values.push(Box::new(color.clone()));
        }
        if let Some(is_active) = patch.is_active {
            sets.push(format!("is_active = ?{}", values.len() + 1));
            values.push(Box::new(is_active));
        }

        if sets.is_empty() {
            return self.get_category_by_id(id);
        }

        let sql = format!(
            "UPDATE categories SET {} WHERE id = ?{}",
            sets.join(", "),
            values.len() + 1
        );
        values.push(Box::new(id));
        let refs: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| v.as_ref()).collect();
        self.conn
            .execute(&sql, refs.as_slice())
            .context("Failed to update category")?;
        self.get_category_by_id(id)
    }

    /// Soft delete: clears the active flag, keeping the row resolvable for
    /// historical transactions and budgets. Returns whether the id existed.
    pub fn deactivate_category(&self, id: i64) -> Result<bool> {
        let n = self.conn.execute(
            "UPDATE categories SET is_active = 0 WHERE id = ?1",
            params![id],
        )?;
        Ok(n > 0)
    }

    // ── Transactions ──────────────────────────────────────────

    /// Inserts a transaction and returns the stored row with id and
    /// timestamps assigned, so callers never need a second fetch.
    pub fn insert_transaction(&self, txn: &Transaction) -> Result<Transaction> {
        let now = Local::now().naive_local();
        self.conn
            .execute(
                "INSERT INTO transactions (amount, description, category_id, date, type, payment_method, tags, notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    txn.amount.to_string(),
                    txn.description,
                    txn.category_id,
                    txn.date,
                    txn.kind.as_str(),
                    txn.payment_method.map(|m| m.as_str()),
                    serde_json::to_string(&txn.tags)?,
                    txn.notes,
                    now,
                    now,
                ],
            )
            .context("Failed to insert transaction")?;
        Ok(Transaction {
            id: Some(self.conn.last_insert_rowid()),
            created_at: now,
            updated_at: now,
            ..txn.clone()
        })
    }

    /// All transactions, newest first.
    pub fn get_transactions(&self, limit: Option<u32>) -> Result<Vec<Transaction>> {
        let mut sql =
            format!("SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY date DESC, id DESC");
        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Transactions whose stored date falls in the given calendar month and
    /// year, newest first. Dates are compared as stored, in naive local time.
    pub fn get_transactions_by_period(&self, month: u32, year: i32) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions
             WHERE {} ORDER BY date DESC, id DESC",
            period_filter(1)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![month, year], map_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Transactions for one category, optionally narrowed to a period.
    pub fn get_transactions_by_category(
        &self,
        category_id: i64,
        period: Option<(u32, i32)>,
    ) -> Result<Vec<Transaction>> {
        let mut sql =
            format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE category_id = ?1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(category_id)];

        if let Some((month, year)) = period {
            sql.push_str(&format!(" AND {}", period_filter(2)));
            param_values.push(Box::new(month));
            param_values.push(Box::new(year));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        let refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|v| v.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(refs.as_slice(), map_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn get_transaction_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"),
            params![id],
            map_transaction,
        );
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies a partial update, re-validating amount, description, and notes.
    /// Returns the updated row, or `None` if the id does not resolve.
    pub fn update_transaction(
        &self,
        id: i64,
        patch: &TransactionPatch,
    ) -> Result<Option<Transaction>> {
        if self.get_transaction_by_id(id)?.is_none() {
            return Ok(None);
        }

        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(amount) = patch.amount {
            let amount = validate::amount_value(amount)?;
            sets.push(format!("amount = ?{}", values.len() + 1));
            values.push(Box::new(amount.to_string()));
        }
        if let Some(description) = &patch.description {
            let description = validate::description(description)?;
            sets.push(format!("description = ?{}", values.len() + 1));
            values.push(Box::new(description));
        }
        if let Some(category_id) = patch.category_id {
            sets.push(format!("category_id = ?{}", values.len() + 1));
            values.push(Box::new(category_id));
        }
        if let Some(date) = patch.date {
            sets.push(format!("date = ?{}", values.len() + 1));
            values.push(Box::new(date));
        }
        if let Some(kind) = patch.kind {
            sets.push(format!("type = ?{}", values.len() + 1));
            values.push(Box::new(kind.as_str()));
        }
        if let Some(method) = patch.payment_method {
            sets.push(format!("payment_method = ?{}", values.len() + 1));
            values.push(Box::new(method.as_str()));
        }
        if let Some(tags) = &patch.tags {
            sets.push(format!("tags = ?{}", values.len() + 1));
            values.push(Box::new(serde_json::to_string(tags)?));
        }
        if let Some(notes) = &patch.notes {
            let notes = validate::notes(notes)?;
            sets.push(format!("notes = ?{}", values.len() + 1));
            values.push(Box::new(notes));
        }

        if sets.is_empty() {
            return self.get_transaction_by_id(id);
        }

        sets.push(format!("updated_at = ?{}", values.len() + 1));
        values.push(Box::new(Local::now().naive_local()));

        let sql = format!(
            "UPDATE transactions SET {} WHERE id = ?{}",
            sets.join(", "),
            values.len() + 1
        );
        values.push(Box::new(id));
        let refs: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| v.as_ref()).collect();
        self.conn
            .execute(&sql, refs.as_slice())
            .context("Failed to update transaction")?;
        self.get_transaction_by_id(id)
    }

    /// Hard delete, unlike categories and budgets. Returns whether the id
    /// existed.
    pub fn delete_transaction(&self, id: i64) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Upsert-by-period: if an active budget exists for this exact
    /// (category, month, year), its amount, threshold, and active flag are
    /// overwritten in place; otherwise a new row is inserted. Returns the
    /// stored row either way.
    pub fn upsert_budget(
        &self,
        category_id: i64,
        amount: Decimal,
        month: u32,
        year: i32,
        alert_threshold: f64,
    ) -> Result<Budget> {
        let now = Local::now().naive_local();

        if let Some(existing) = self.get_budget(category_id, month, year)? {
            self.conn
                .execute(
                    "UPDATE budgets SET amount = ?1, alert_threshold = ?2, is_active = 1, updated_at = ?3
                     WHERE id = ?4",
                    params![amount.to_string(), alert_threshold, now, existing.id],
                )
                .context("Failed to update budget")?;
            return Ok(Budget {
                amount,
                alert_threshold,
                is_active: true,
                updated_at: now,
                ..existing
            });
        }

        self.conn
            .execute(
                "INSERT INTO budgets (category_id, amount, month, year, alert_threshold, is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7)",
                params![category_id, amount.to_string(), month, year, alert_threshold, now, now],
            )
            .context("Failed to insert budget")?;
        Ok(Budget {
            id: Some(self.conn.last_insert_rowid()),
            category_id,
            amount,
            month,
            year,
            alert_threshold,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// The active budget for a (category, month, year), if any.
    pub fn get_budget(&self, category_id: i64, month: u32, year: i32) -> Result<Option<Budget>> {
        let result = self.conn.query_row(
            &format!(
                "SELECT {BUDGET_COLUMNS} FROM budgets
                 WHERE category_id = ?1 AND month = ?2 AND year = ?3 AND is_active = 1"
            ),
            params![category_id, month, year],
            map_budget,
        );
        match result {
            Ok(b) => Ok(Some(b)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All active budgets in a period.
    pub fn get_budgets(&self, month: u32, year: i32) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets
             WHERE month = ?1 AND year = ?2 AND is_active = 1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![month, year], map_budget)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Lookup by id regardless of the active flag.
    pub fn get_budget_by_id(&self, id: i64) -> Result<Option<Budget>> {
        let result = self.conn.query_row(
            &format!("SELECT {BUDGET_COLUMNS} FROM budgets WHERE id = ?1"),
            params![id],
            map_budget,
        );
        match result {
            Ok(b) => Ok(Some(b)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies a partial update; returns the updated row, or `None` if the id
    /// does not resolve.
    pub fn update_budget(&self, id: i64, patch: &BudgetPatch) -> Result<Option<Budget>> {
        if self.get_budget_by_id(id)?.is_none() {
            return Ok(None);
        }

        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(amount) = patch.amount {
            sets.push(format!("amount = ?{}", values.len() + 1));
            values.push(Box::new(amount.to_string()));
        }
        if let Some(threshold) = patch.alert_threshold {
            sets.push(format!("alert_threshold = ?{}", values.len() + 1));
            values.push(Box::new(threshold));
        }
        if let Some(is_active) = patch.is_active {
            sets.push(format!("is_active = ?{}", values.len() + 1));
            values.push(Box::new(is_active));
        }

        if sets.is_empty() {
            return self.get_budget_by_id(id);
        }

        sets.push(format!("updated_at = ?{}", values.len() + 1));
        values.push(Box::new(Local::now().naive_local()));

        let sql = format!(
            "UPDATE budgets SET {} WHERE id = ?{}",
            sets.join(", "),
            values.len() + 1
        );
        values.push(Box::new(id));
        let refs: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| v.as_ref()).collect();
        self.conn
            .execute(&sql, refs.as_slice())
            .context("Failed to update budget")?;
        self.get_budget_by_id(id)
    }

    /// Soft delete: clears the active flag. Returns whether the id existed.
    pub fn deactivate_budget(&self, id: i64) -> Result<bool> {
        let n = self.conn.execute(
            "UPDATE budgets SET is_active = 0 WHERE id = ?1",
            params![id],
        )?;
        Ok(n > 0)
    }
}

/// Period filter clause with 1-based placeholders starting at `first`.
fn period_filter(first: usize) -> String {
    format!(
        "CAST(strftime('%m', date) AS INTEGER) = ?{} AND CAST(strftime('%Y', date) AS INTEGER) = ?{}",
        first,
        first + 1
    )
}

fn map_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        icon: row.get(2)?,
        color: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let amount_str: String = row.get(1)?;
    let kind_str: String = row.get(5)?;
    let kind = TransactionType::parse(&kind_str)
        .ok_or_else(|| bad_column(5, &kind_str, "transaction type"))?;
    let method_str: Option<String> = row.get(6)?;
    let payment_method = match method_str {
        Some(s) => Some(PaymentMethod::parse(&s).ok_or_else(|| bad_column(6, &s, "payment method"))?),
        None => None,
    };
    let tags_json: String = row.get(7)?;

    Ok(Transaction {
        id: Some(row.get(0)?),
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        description: row.get(2)?,
        category_id: row.get(3)?,
        date: row.get(4)?,
        kind,
        payment_method,
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        notes: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn map_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
    let amount_str: String = row.get(2)?;
    Ok(Budget {
        id: Some(row.get(0)?),
        category_id: row.get(1)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        month: row.get(3)?,
        year: row.get(4)?,
        alert_threshold: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn bad_column(idx: usize, value: &str, what: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("unrecognized {what}: {value}").into(),
    )
}
