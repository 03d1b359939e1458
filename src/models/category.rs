use chrono::NaiveDateTime;

/// Icon assigned to categories created without one, and to the placeholder.
pub const DEFAULT_ICON: &str = "📁";

/// Color assigned to categories created without one, and to the placeholder.
pub const DEFAULT_COLOR: &str = "#2E86AB";

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Category {
    pub fn new(name: String, icon: String, color: String) -> Self {
        Self {
            id: None,
            name,
            icon,
            color,
            is_active: true,
            created_at: chrono::Local::now().naive_local(),
        }
    }

    /// Stand-in shown when a referenced category cannot be resolved.
    pub fn placeholder() -> Self {
        Self::new(
            "Unknown".to_string(),
            DEFAULT_ICON.to_string(),
            DEFAULT_COLOR.to_string(),
        )
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon, self.name)
    }
}

/// Partial update for a category. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}
