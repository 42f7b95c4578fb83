use serde::{Deserialize, Serialize};

/// Payload that may or may not be wrapped in a `{"data": ...}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MaybeEnveloped<T> {
    Enveloped { data: T },
    Bare(T),
}

impl<T> MaybeEnveloped<T> {
    pub fn into_inner(self) -> T {
        match self {
            MaybeEnveloped::Enveloped { data } => data,
            MaybeEnveloped::Bare(value) => value,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProvisionNamespaceRequest {
    pub database_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProvisionedNamespace {
    pub index_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatedRecord {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TableNameResponse {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ProcessPromptResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateQueryRequest<'a> {
    pub question: &'a str,
    pub database_id: Option<i64>,
    pub table_ids: &'a [i64],
}

#[derive(Debug, Deserialize)]
pub struct GenerateQueryResponse {
    pub query: String,
}

/// Pulls a human-readable message out of an error response body. Checks
/// `errors.description`, then `message`, then `error`, then falls back to a
/// non-JSON body as-is.
pub fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return Some(body.to_string());
    };

    let candidates = [
        value.pointer("/errors/description"),
        value.get("message"),
        value.get("error"),
        value.get("errors"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|candidate| candidate.as_str().map(str::to_string))
}
