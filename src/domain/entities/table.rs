use serde::{Deserialize, Serialize};

/// Row of the table catalog. The catalog endpoint returns tables for every
/// database, so `db_id` is what ties a table to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: i64,
    pub db_id: i64,
    pub name: String,
}

impl Table {
    pub fn new(id: i64, db_id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            db_id,
            name: name.into(),
        }
    }

    pub fn belongs_to(&self, database_id: i64) -> bool {
        self.db_id == database_id
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    #[serde(default)]
    pub tables: Vec<TableMetadata>,
}

impl DatabaseMetadata {
    pub fn find_table(&self, table_id: i64) -> Option<&TableMetadata> {
        self.tables.iter().find(|table| table.id == table_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableMetadata {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldMetadata>,
}

impl TableMetadata {
    pub fn foreign_keys(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.fields.iter().filter(|field| field.is_foreign_key())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub name: String,
    #[serde(default)]
    pub base_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub semantic_type: Option<String>,
    #[serde(default)]
    pub target: Option<FieldTarget>,
}

impl FieldMetadata {
    pub fn new(name: impl Into<String>, base_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_type: Some(base_type.into()),
            ..Default::default()
        }
    }

    pub fn with_foreign_key(mut self, target_table_id: i64) -> Self {
        self.semantic_type = Some("type/FK".to_string());
        self.target = Some(FieldTarget {
            table_id: Some(target_table_id),
        });
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Accepts both the namespaced marker (`type/FK`) and the bare one (`FK`).
    pub fn is_foreign_key(&self) -> bool {
        matches!(
            self.semantic_type.as_deref(),
            Some(marker) if marker == "FK" || marker.ends_with("/FK")
        )
    }

    pub fn target_table_id(&self) -> Option<i64> {
        self.target.as_ref().and_then(|target| target.table_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldTarget {
    #[serde(default)]
    pub table_id: Option<i64>,
}
