use std::fmt;

/// Display metadata for an expense category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpenseCategory {
    Food,
    Groceries,
    Transportation,
    Housing,
    Travel,
    Entertainment,
    Health,
    Shopping,
    Utilities,
    Internet,
    Education,
    Medical,
    Gifts,
    #[default]
    Other,
}

const fn entry(id: &'static str, name: &'static str, color: &'static str) -> CategoryDescriptor {
    CategoryDescriptor { id, name, color }
}

// Indexed by discriminant; keep in declaration order.
static DESCRIPTORS: [CategoryDescriptor; 14] = [
    entry("food", "Food & Dining", "#F59E0B"),
    entry("groceries", "Groceries", "#10B981"),
    entry("transportation", "Transportation", "#3B82F6"),
    entry("housing", "Housing", "#8B5CF6"),
    entry("travel", "Travel", "#06B6D4"),
    entry("entertainment", "Entertainment", "#EC4899"),
    entry("health", "Health", "#EF4444"),
    entry("shopping", "Shopping", "#F97316"),
    entry("utilities", "Utilities", "#FBBF24"),
    entry("internet", "Internet", "#6366F1"),
    entry("education", "Education", "#8B5CF6"),
    entry("medical", "Medical", "#DC2626"),
    entry("gifts", "Gifts", "#DB2777"),
    entry("other", "Other", "#6B7280"),
];

impl ExpenseCategory {
    pub const ALL: [Self; 14] = [
        Self::Food,
        Self::Groceries,
        Self::Transportation,
        Self::Housing,
        Self::Travel,
        Self::Entertainment,
        Self::Health,
        Self::Shopping,
        Self::Utilities,
        Self::Internet,
        Self::Education,
        Self::Medical,
        Self::Gifts,
        Self::Other,
    ];

    pub fn descriptor(self) -> &'static CategoryDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.descriptor().id
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn color(self) -> &'static str {
        self.descriptor().color
    }

    /// Looks up a category by id, falling back to [`ExpenseCategory::Other`].
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.id().eq_ignore_ascii_case(id))
            .unwrap_or_default()
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::food("food", ExpenseCategory::Food)]
    #[case::case_insensitive("Groceries", ExpenseCategory::Groceries)]
    #[case::unknown("yachts", ExpenseCategory::Other)]
    #[case::empty("", ExpenseCategory::Other)]
    fn from_id_resolves_or_falls_back(#[case] id: &str, #[case] expected: ExpenseCategory) {
        assert_eq!(ExpenseCategory::from_id(id), expected);
    }

    #[test]
    fn descriptor_table_matches_declaration_order() {
        for category in ExpenseCategory::ALL {
            assert_eq!(ExpenseCategory::from_id(category.id()), category);
        }
        assert_eq!(ExpenseCategory::Food.color(), "#F59E0B");
        assert_eq!(ExpenseCategory::Other.name(), "Other");
    }
}
