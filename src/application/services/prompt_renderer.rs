use std::collections::HashMap;

use crate::domain::entities::TableMetadata;

const MISSING_DESCRIPTION: &str = "No description available";
const EXAMPLE_COLUMNS: usize = 3;
const EXAMPLE_ROW_LIMIT: usize = 5;

/// Foreign-key edge of a table, with the referenced table already resolved to
/// its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub field: String,
    pub target_table: String,
}

/// Output of rendering one table: the markdown body plus the short
/// description stored next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub name: String,
    pub description: String,
    pub content: String,
}

/// Renders table metadata into the markdown document consumed by the LLM
/// service. Sections always appear in the same order: description, schema,
/// relationships (only when there are any), example query.
#[derive(Debug, Clone, Default)]
pub struct PromptRenderer;

impl PromptRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Pairs every foreign-key field that has a target with the resolved name
    /// of that target. Fields whose target was not resolved are skipped.
    pub fn relationships(table: &TableMetadata, names: &HashMap<i64, String>) -> Vec<Relationship> {
        table
            .foreign_keys()
            .filter_map(|field| {
                let target = field.target_table_id()?;
                names.get(&target).map(|name| Relationship {
                    field: field.name.clone(),
                    target_table: name.clone(),
                })
            })
            .collect()
    }

    pub fn render(&self, table: &TableMetadata, relationships: &[Relationship]) -> RenderedPrompt {
        let description = table
            .description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_description(&table.name));

        let mut content = format!("# Table: {}\n\n## Description\n{}\n\n", table.name, description);
        content.push_str(&schema_section(table));

        if !relationships.is_empty() {
            content.push_str("\n## Relationships\n");
            for relationship in relationships {
                content.push_str(&format!(
                    "- `{}` → References **{}** table\n",
                    relationship.field, relationship.target_table
                ));
            }
        }

        content.push_str(&format!(
            "\n## Example Query\n```sql\n{}\n```\n",
            example_query(table)
        ));

        RenderedPrompt {
            name: table.name.clone(),
            description,
            content,
        }
    }
}

fn default_description(table_name: &str) -> String {
    format!("This table stores {} records.", table_name)
}

fn schema_section(table: &TableMetadata) -> String {
    let mut section = String::from(
        "## Schema Details\n| Column Name | Data Type | Description |\n|-------------|-----------|-------------|\n",
    );
    for field in &table.fields {
        let description = field
            .description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(MISSING_DESCRIPTION);
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&field.name),
            escape_cell(field.base_type.as_deref().unwrap_or("unknown")),
            escape_cell(description)
        ));
    }
    section
}

fn example_query(table: &TableMetadata) -> String {
    let columns: Vec<&str> = table
        .fields
        .iter()
        .take(EXAMPLE_COLUMNS)
        .map(|field| field.name.as_str())
        .collect();
    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    };
    format!(
        "SELECT {} FROM {} LIMIT {};",
        projection, table.name, EXAMPLE_ROW_LIMIT
    )
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
