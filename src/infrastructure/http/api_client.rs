use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::application::ports::{
    CatalogService, IndexService, PromptService, QueryService, ServiceError,
};
use crate::domain::entities::{
    Database, DatabaseMetadata, NewIndexRecord, NewPrompt, PromptDocument, QueryDraft, Table,
    VectorNamespace,
};
use crate::infrastructure::config::ClientConfig;
use crate::infrastructure::http::dto::{
    CreatedRecord, GenerateQueryRequest, GenerateQueryResponse, MaybeEnveloped,
    ProcessPromptResponse, ProvisionNamespaceRequest, ProvisionedNamespace, TableNameResponse,
    error_message,
};

const SESSION_HEADER: &str = "X-Metabase-Session";

#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("Invalid base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// REST client for the BI application. One instance backs every port.
#[derive(Debug, Clone)]
pub struct MetabaseApiClient {
    client: Client,
    base_url: Url,
    session_token: Option<String>,
}

impl MetabaseApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        // Url::join drops the last path segment unless it ends with a slash.
        let mut raw = config.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|source| ClientBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;

        Ok(Self {
            client,
            base_url,
            session_token: config.session_token,
        })
    }

    pub fn from_env() -> Result<Self, ClientBuildError> {
        Self::new(ClientConfig::default())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ServiceError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ServiceError::Transport(format!("invalid path {}: {}", path, e)))?;

        tracing::debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        Ok(match &self.session_token {
            Some(token) => builder.header(SESSION_HEADER, token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ServiceError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        tracing::debug!("Request failed with {}: {}", status, body);
        Err(ServiceError::status(status, message))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ServiceError> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.without_url().to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        self.send_json(self.request(Method::GET, path)?).await
    }
}

#[async_trait]
impl CatalogService for MetabaseApiClient {
    async fn list_databases(&self) -> Result<Vec<Database>, ServiceError> {
        let databases: MaybeEnveloped<Vec<Database>> = self.get("/api/database").await?;
        Ok(databases.into_inner())
    }

    async fn list_tables(&self) -> Result<Vec<Table>, ServiceError> {
        let tables: MaybeEnveloped<Vec<Table>> = self.get("/api/table").await?;
        Ok(tables.into_inner())
    }

    async fn database_metadata(&self, database_id: i64) -> Result<DatabaseMetadata, ServiceError> {
        self.get(&format!("/api/database/{}/metadata", database_id))
            .await
    }

    async fn table_name(&self, table_id: i64) -> Result<String, ServiceError> {
        let table: TableNameResponse = self.get(&format!("/api/table/{}", table_id)).await?;
        Ok(table.name)
    }
}

#[async_trait]
impl IndexService for MetabaseApiClient {
    async fn provision_namespace(&self, database_id: i64) -> Result<VectorNamespace, ServiceError> {
        let request = self
            .request(Method::POST, "/api/llm/pinecone/index")?
            .json(&ProvisionNamespaceRequest { database_id });
        let response: MaybeEnveloped<ProvisionedNamespace> = self.send_json(request).await?;
        Ok(VectorNamespace::new(response.into_inner().index_name))
    }

    async fn create_index_record(&self, record: &NewIndexRecord) -> Result<i64, ServiceError> {
        let request = self.request(Method::POST, "/api/llm")?.json(record);
        let created: MaybeEnveloped<CreatedRecord> = self.send_json(request).await?;
        Ok(created.into_inner().id)
    }
}

#[async_trait]
impl PromptService for MetabaseApiClient {
    async fn create_prompt(&self, prompt: &NewPrompt) -> Result<PromptDocument, ServiceError> {
        let request = self.request(Method::POST, "/api/llm/prompt")?.json(prompt);
        let created: MaybeEnveloped<PromptDocument> = self.send_json(request).await?;
        Ok(created.into_inner())
    }

    async fn list_prompts(&self) -> Result<Vec<PromptDocument>, ServiceError> {
        let prompts: MaybeEnveloped<Vec<PromptDocument>> = self.get("/api/llm/prompt").await?;
        Ok(prompts.into_inner())
    }

    async fn process_prompt(&self, prompt_id: i64) -> Result<bool, ServiceError> {
        let request = self.request(Method::POST, &format!("/api/llm/prompt/{}/process", prompt_id))?;
        let response: ProcessPromptResponse = self.send_json(request).await?;
        Ok(response.success)
    }
}

#[async_trait]
impl QueryService for MetabaseApiClient {
    async fn generate_query(&self, draft: &QueryDraft) -> Result<String, ServiceError> {
        let request = self
            .request(Method::POST, "/api/llm/generate-query")?
            .json(&GenerateQueryRequest {
                question: &draft.text,
                database_id: draft.database_id,
                table_ids: &draft.table_ids,
            });
        let response: GenerateQueryResponse = self.send_json(request).await?;
        Ok(response.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::domain::value_objects::PromptStatus;

    fn client(server: &MockServer) -> MetabaseApiClient {
        MetabaseApiClient::new(ClientConfig::new(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_list_databases_accepts_both_shapes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/database"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 7, "name": "sales"}],
                "total": 1
            })))
            .mount(&server)
            .await;

        let databases = client(&server).list_databases().await.unwrap();
        assert_eq!(databases, vec![Database::new(7, "sales")]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/database"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 8, "name": "hr"}])),
            )
            .mount(&server)
            .await;

        let databases = client(&server).list_databases().await.unwrap();
        assert_eq!(databases, vec![Database::new(8, "hr")]);
    }

    #[tokio::test]
    async fn test_session_header_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/table"))
            .and(header(SESSION_HEADER, "token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "db_id": 7, "name": "orders"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig {
            session_token: Some("token-123".to_string()),
            ..ClientConfig::new(server.uri())
        };
        let tables = MetabaseApiClient::new(config)
            .unwrap()
            .list_tables()
            .await
            .unwrap();

        assert_eq!(tables, vec![Table::new(1, 7, "orders")]);
    }

    #[tokio::test]
    async fn test_provision_conflict_is_reported_as_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/llm/pinecone/index"))
            .and(body_json(json!({"database_id": 7})))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"message": "Index already exists"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).provision_namespace(7).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.server_message(), Some("Index already exists"));
    }

    #[tokio::test]
    async fn test_provision_reads_index_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/llm/pinecone/index"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"index_name": "ns-7"}})),
            )
            .mount(&server)
            .await;

        let namespace = client(&server).provision_namespace(7).await.unwrap();
        assert_eq!(namespace.as_str(), "ns-7");
    }

    #[tokio::test]
    async fn test_create_index_record_wire_contract() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/llm"))
            .and(body_json(json!({
                "database_id": 7,
                "description": "sales db",
                "selected_tables": [1, 2],
                "pinecone_index_id": "ns-7"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 42}})))
            .mount(&server)
            .await;

        let id = client(&server)
            .create_index_record(&NewIndexRecord {
                database_id: 7,
                description: "sales db".to_string(),
                selected_tables: vec![1, 2],
                namespace: VectorNamespace::new("ns-7"),
            })
            .await
            .unwrap();

        assert_eq!(id, 42);
    }

    #[tokio::test]
    async fn test_create_index_record_surfaces_error_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/llm"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": {"description": "value must be a non-blank string."}
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .create_index_record(&NewIndexRecord {
                database_id: 7,
                description: "x".to_string(),
                selected_tables: vec![],
                namespace: VectorNamespace::new("ns-7"),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.to_string(), "value must be a non-blank string.");
    }

    #[tokio::test]
    async fn test_metadata_and_table_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/database/7/metadata"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "tables": [{
                    "id": 1, "name": "orders", "schema": "public", "description": null,
                    "fields": [{"name": "cust_id", "base_type": "type/Integer",
                                "semantic_type": "type/FK", "target": {"table_id": 9}}]
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/table/9"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 9, "name": "customers"})),
            )
            .mount(&server)
            .await;

        let api = client(&server);
        let metadata = api.database_metadata(7).await.unwrap();
        let target = metadata.tables[0].fields[0].target_table_id().unwrap();

        assert_eq!(api.table_name(target).await.unwrap(), "customers");
    }

    #[tokio::test]
    async fn test_prompt_lifecycle_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/llm/prompt"))
            .and(body_json(json!({
                "name": "orders",
                "description": "Orders",
                "prompt": "# Table: orders",
                "index_database_llm_id": 42,
                "table_reference": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 100, "name": "orders", "description": "Orders",
                "prompt": "# Table: orders", "table_reference": 1,
                "index_database_llm_id": 42, "status": "pending"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/llm/prompt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 100, "table_reference": 1, "status": "completed"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/llm/prompt/100/process"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let api = client(&server);
        let created = api
            .create_prompt(&NewPrompt {
                name: "orders".to_string(),
                description: "Orders".to_string(),
                content: "# Table: orders".to_string(),
                index_database_llm_id: 42,
                table_reference: 1,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 100);
        assert_eq!(created.status, PromptStatus::Pending);

        let listed = api.list_prompts().await.unwrap();
        assert_eq!(listed[0].status, PromptStatus::Completed);

        assert!(!api.process_prompt(100).await.unwrap());
    }

    #[tokio::test]
    async fn test_generate_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/llm/generate-query"))
            .and(body_json(json!({
                "question": "how many orders?",
                "database_id": 7,
                "table_ids": [1]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"query": "SELECT count(*) FROM orders"})),
            )
            .mount(&server)
            .await;

        let sql = client(&server)
            .generate_query(&QueryDraft::new("how many orders?", Some(7), vec![1]))
            .await
            .unwrap();

        assert_eq!(sql, "SELECT count(*) FROM orders");
    }

    #[tokio::test]
    async fn test_base_url_with_path_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metabase/api/table/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "employees"})))
            .mount(&server)
            .await;

        let api =
            MetabaseApiClient::new(ClientConfig::new(format!("{}/metabase", server.uri()))).unwrap();

        assert_eq!(api.table_name(3).await.unwrap(), "employees");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let api = MetabaseApiClient::new(ClientConfig {
            timeout_secs: 1,
            ..ClientConfig::new("http://127.0.0.1:9")
        })
        .unwrap();

        let err = api.list_databases().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = MetabaseApiClient::new(ClientConfig::new("not a url"));
        assert!(matches!(result, Err(ClientBuildError::InvalidBaseUrl { .. })));
    }
}
