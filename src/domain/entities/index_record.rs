use serde::{Deserialize, Serialize};

/// Namespace in the vector database, one per source database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorNamespace(String);

impl VectorNamespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name assumed when the provisioning service reports that the namespace
    /// already exists. Must stay in step with the server's naming scheme.
    pub fn fallback_for(database_id: i64) -> Self {
        Self(format!("metabase-index-{}", database_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VectorNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: i64,
    pub database_id: i64,
    pub description: String,
    pub selected_tables: Vec<i64>,
    pub namespace: VectorNamespace,
}

/// Body of a create-index request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIndexRecord {
    pub database_id: i64,
    pub description: String,
    pub selected_tables: Vec<i64>,
    #[serde(rename = "pinecone_index_id")]
    pub namespace: VectorNamespace,
}

impl NewIndexRecord {
    pub fn into_record(self, id: i64) -> IndexRecord {
        IndexRecord {
            id,
            database_id: self.database_id,
            description: self.description,
            selected_tables: self.selected_tables,
            namespace: self.namespace,
        }
    }
}
