use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::entities::Table;

/// Ids of the tables picked for indexing. Always a subset of the tables that
/// were loaded for the current database.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableSelection {
    ids: BTreeSet<i64>,
}

impl TableSelection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all_of(tables: &[Table]) -> Self {
        Self {
            ids: tables.iter().map(|table| table.id).collect(),
        }
    }

    /// Builds a selection from explicit ids, dropping any that are not loaded.
    pub fn from_ids(ids: impl IntoIterator<Item = i64>, tables: &[Table]) -> Self {
        let mut selection = Self {
            ids: ids.into_iter().collect(),
        };
        selection.retain_known(tables);
        selection
    }

    pub fn toggle(&mut self, table_id: i64, tables: &[Table]) {
        if !tables.iter().any(|table| table.id == table_id) {
            return;
        }
        if !self.ids.remove(&table_id) {
            self.ids.insert(table_id);
        }
    }

    pub fn select_all(&mut self, tables: &[Table]) {
        *self = Self::all_of(tables);
    }

    pub fn unselect_all(&mut self) {
        self.ids.clear();
    }

    pub fn retain_known(&mut self, tables: &[Table]) {
        self.ids
            .retain(|id| tables.iter().any(|table| table.id == *id));
    }

    pub fn contains(&self, table_id: i64) -> bool {
        self.ids.contains(&table_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_all_of(&self, tables: &[Table]) -> bool {
        self.ids.len() == tables.len() && tables.iter().all(|table| self.contains(table.id))
    }

    pub fn ids(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }
}
