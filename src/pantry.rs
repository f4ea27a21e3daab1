//! Pantry
//!
//! The user's declared ingredients: a set of normalized strings that keeps
//! insertion order for display stability.

use crate::models::IngredientCategory;

/// Trim and lower-case an ingredient name
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pantry {
    items: Vec<String>,
}

/// Outcome of a single toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
    /// Blank input, nothing changed
    Ignored,
}

impl Pantry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = normalize(name);
        self.items.iter().any(|i| *i == name)
    }

    pub fn toggle(&mut self, name: &str) -> Toggled {
        let name = normalize(name);
        if name.is_empty() {
            return Toggled::Ignored;
        }
        if let Some(pos) = self.items.iter().position(|i| *i == name) {
            self.items.remove(pos);
            Toggled::Removed
        } else {
            self.items.push(name);
            Toggled::Added
        }
    }

    /// Union with a batch of names; returns how many were new
    pub fn merge<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.items.len();
        for name in names {
            let name = normalize(name.as_ref());
            if !name.is_empty() && !self.items.contains(&name) {
                self.items.push(name);
            }
        }
        self.items.len() - before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Sidebar catalog search: keep items containing the query (case-insensitive)
/// and drop categories left empty.
pub fn filter_catalog(catalog: &[IngredientCategory], query: &str) -> Vec<IngredientCategory> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return catalog.to_vec();
    }
    catalog
        .iter()
        .filter_map(|cat| {
            let items: Vec<String> = cat
                .items
                .iter()
                .filter(|item| item.to_lowercase().contains(&query))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| IngredientCategory {
                category: cat.category.clone(),
                items,
            })
        })
        .collect()
}
