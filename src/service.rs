//! Request/response surface for the store and search engine.
//!
//! Requests are strongly typed and reject unknown fields. A JSON request is
//! tagged by `op`; the `vector_*` tool names are accepted as aliases:
//!
//! ```json
//! {"op": "store", "id": "d1", "text": "cat", "metadata": {"lang": "en"}}
//! {"op": "vector_search", "query_text": "cat", "top_k": 2}
//! ```
//!
//! Numeric arguments arrive as signed or floating values so that out-of-range
//! input is reported as `InvalidArgument` instead of a parse failure. Counts
//! such as `top_k` also accept an integral float (`2.0`).

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

use crate::config::Settings;
use crate::embedding::{create_provider, embed_checked};
use crate::error::{ErrorKind, VectorResult, VectorStoreError};
use crate::search::{SearchEngine, SearchHit, SearchQuery};
use crate::store::{Metadata, NewRecord, Record, RecordSummary, VectorStore};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreRequest {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Pre-computed vector; the text is embedded when absent
    #[serde(default, alias = "embedding", skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchRequest {
    #[serde(alias = "query")]
    pub query_text: String,
    #[serde(
        default,
        deserialize_with = "integral",
        skip_serializing_if = "Option::is_none"
    )]
    pub top_k: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbedRequest {
    pub text: String,
}

/// Used by both `get` and `delete`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ListRequest {
    #[serde(
        default,
        deserialize_with = "integral",
        skip_serializing_if = "Option::is_none"
    )]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InfoRequest {}

/// Accept a JSON integer or a float with no fractional part.
fn integral<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Number::Int(n)) => Ok(Some(n)),
        Some(Number::Float(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        Some(Number::Float(f)) => Err(serde::de::Error::custom(format!(
            "expected an integer, got {f}"
        ))),
    }
}

/// One operation against the service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    #[serde(alias = "vector_store")]
    Store(StoreRequest),
    #[serde(alias = "vector_search")]
    Search(SearchRequest),
    #[serde(alias = "vector_get_embedding", alias = "get_embedding")]
    Embed(EmbedRequest),
    Get(IdRequest),
    #[serde(alias = "vector_delete")]
    Delete(IdRequest),
    #[serde(alias = "vector_list")]
    List(ListRequest),
    Info(InfoRequest),
}

impl Request {
    /// Canonical operation name, used in logs.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Store(_) => "store",
            Self::Search(_) => "search",
            Self::Embed(_) => "embed",
            Self::Get(_) => "get",
            Self::Delete(_) => "delete",
            Self::List(_) => "list",
            Self::Info(_) => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Stored,
    Deleted,
    NotFound,
    Error,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StoreResponse {
    pub status: Status,
    pub id: String,
    pub dimension: usize,
    pub replaced: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
    pub dimension: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeleteResponse {
    pub status: Status,
    pub id: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ListResponse {
    pub documents: Vec<RecordSummary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InfoResponse {
    pub records: usize,
    pub dimension: usize,
    pub provider: String,
}

/// Machine-readable failure report.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub status: Status,
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl From<&VectorStoreError> for ErrorResponse {
    fn from(err: &VectorStoreError) -> Self {
        Self {
            status: Status::Error,
            kind: err.kind(),
            code: err.status_code(),
            message: err.to_string(),
            suggestions: err
                .recovery_suggestions()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Response {
    Store(StoreResponse),
    Search(SearchResponse),
    Embed(EmbedResponse),
    Get(Record),
    Delete(DeleteResponse),
    List(ListResponse),
    Info(InfoResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<VectorResult<Response>> for Response {
    fn from(result: VectorResult<Response>) -> Self {
        result.unwrap_or_else(|err| Self::Error(ErrorResponse::from(&err)))
    }
}

/// Defaults applied when a request omits an optional field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestDefaults {
    pub top_k: usize,
    pub threshold: f32,
    pub list_limit: usize,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            top_k: crate::search::DEFAULT_TOP_K,
            threshold: crate::search::DEFAULT_THRESHOLD,
            list_limit: 100,
        }
    }
}

/// The store, the search engine and request defaults behind one handle.
///
/// Cheap to clone; clones share the same store.
#[derive(Debug, Clone)]
pub struct VectorService {
    store: Arc<VectorStore>,
    engine: SearchEngine,
    defaults: RequestDefaults,
}

impl VectorService {
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self {
            engine: SearchEngine::new(Arc::clone(&store)),
            store,
            defaults: RequestDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: RequestDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Validate settings, build the configured provider and an empty store.
    pub fn from_settings(settings: &Settings) -> VectorResult<Self> {
        settings.validate()?;
        let provider = create_provider(&settings.embedding)?;
        let store = VectorStore::new(provider).with_preview_chars(settings.list.preview_chars);

        tracing::info!(
            provider = store.provider().name(),
            dimension = store.dimension().get(),
            "vector store ready"
        );

        Ok(Self::new(Arc::new(store)).with_defaults(RequestDefaults {
            top_k: settings.search.default_top_k,
            threshold: settings.search.default_threshold,
            list_limit: settings.list.default_limit,
        }))
    }

    pub fn store_handle(&self) -> &Arc<VectorStore> {
        &self.store
    }

    pub async fn store(&self, request: StoreRequest) -> VectorResult<StoreResponse> {
        let mut new = NewRecord::new(request.id, request.text)
            .with_metadata(request.metadata.unwrap_or_default());
        if let Some(vector) = request.vector {
            new = new.with_vector(vector);
        }

        let outcome = self.store.put(new).await?;
        Ok(StoreResponse {
            status: Status::Stored,
            id: outcome.record.id.clone(),
            dimension: outcome.record.vector.len(),
            replaced: outcome.replaced,
        })
    }

    pub async fn search(&self, request: SearchRequest) -> VectorResult<SearchResponse> {
        let top_k = match request.top_k {
            Some(k) if k <= 0 => {
                return Err(VectorStoreError::invalid_argument(format!(
                    "top_k must be a positive integer, got {k}"
                )));
            }
            Some(k) => usize::try_from(k)
                .map_err(|_| VectorStoreError::invalid_argument(format!("top_k {k} is too large")))?,
            None => self.defaults.top_k,
        };
        let threshold = match request.threshold {
            Some(t) if !(-1.0..=1.0).contains(&t) => {
                return Err(VectorStoreError::invalid_argument(format!(
                    "threshold must lie within [-1.0, 1.0], got {t}"
                )));
            }
            Some(t) => t as f32,
            None => self.defaults.threshold,
        };

        let query = SearchQuery::new(request.query_text)
            .with_top_k(top_k)
            .with_threshold(threshold);
        let results = self.engine.search(&query).await?;
        Ok(SearchResponse { results })
    }

    pub async fn embed(&self, request: EmbedRequest) -> VectorResult<EmbedResponse> {
        let embedding = embed_checked(
            self.store.provider().as_ref(),
            &request.text,
            self.store.dimension(),
        )
        .await?;
        Ok(EmbedResponse {
            dimension: embedding.len(),
            embedding,
        })
    }

    pub fn get(&self, request: IdRequest) -> VectorResult<Record> {
        self.store.get(&request.id).map(|record| record.as_ref().clone())
    }

    pub fn delete(&self, request: IdRequest) -> DeleteResponse {
        let deleted = self.store.delete(&request.id);
        DeleteResponse {
            status: if deleted { Status::Deleted } else { Status::NotFound },
            id: request.id,
            deleted,
        }
    }

    pub fn list(&self, request: ListRequest) -> VectorResult<ListResponse> {
        let limit = match request.limit {
            Some(l) if l < 0 => {
                return Err(VectorStoreError::invalid_argument(format!(
                    "limit must not be negative, got {l}"
                )));
            }
            Some(l) => usize::try_from(l).unwrap_or(usize::MAX),
            None => self.defaults.list_limit,
        };
        Ok(ListResponse {
            documents: self.store.list(limit),
        })
    }

    pub fn info(&self) -> InfoResponse {
        InfoResponse {
            records: self.store.len(),
            dimension: self.store.dimension().get(),
            provider: self.store.provider().name().to_string(),
        }
    }

    /// Execute one request.
    pub async fn dispatch(&self, request: Request) -> VectorResult<Response> {
        let op = request.op();
        let result = match request {
            Request::Store(r) => self.store(r).await.map(Response::Store),
            Request::Search(r) => self.search(r).await.map(Response::Search),
            Request::Embed(r) => self.embed(r).await.map(Response::Embed),
            Request::Get(r) => self.get(r).map(Response::Get),
            Request::Delete(r) => Ok(Response::Delete(self.delete(r))),
            Request::List(r) => self.list(r).map(Response::List),
            Request::Info(_) => Ok(Response::Info(self.info())),
        };
        if let Err(err) = &result {
            tracing::debug!(op, code = %err.status_code(), "request failed: {err}");
        }
        result
    }

    /// Parse and execute one JSON request. Never fails: errors, including
    /// malformed JSON, become an [`ErrorResponse`].
    pub async fn handle_json(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.dispatch(request).await.into(),
            Err(e) => {
                let err = VectorStoreError::invalid_argument(format!("malformed request: {e}"));
                Response::Error(ErrorResponse::from(&err))
            }
        }
    }
}
