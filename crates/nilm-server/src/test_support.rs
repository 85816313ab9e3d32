//! In-memory ports and request helpers for router tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use serde_json::Value;
use tower::ServiceExt;

use nilm::{
    ApplianceRecord, ChatRecord, ChatTranscriptStore, DomainError, GenerationOptions,
    GenerationService, MetricsQuery, MetricsRepository, UserScope,
};

use crate::application::DashboardService;
use crate::{build_router, AppState};

#[derive(Default)]
pub struct InMemoryMetrics {
    pub rows: Vec<ApplianceRecord>,
    pub queries: Mutex<Vec<MetricsQuery>>,
}

#[async_trait]
impl MetricsRepository for InMemoryMetrics {
    async fn fetch(&self, query: &MetricsQuery) -> Result<Vec<ApplianceRecord>, DomainError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self
            .rows
            .iter()
            .filter(|r| r.house_id == query.house_id)
            .filter(|r| match query.appliance {
                Some(kind) => r.appliance_name == kind.as_str(),
                None => true,
            })
            .take(query.limit as usize)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryTranscripts {
    pub records: Mutex<Vec<ChatRecord>>,
}

#[async_trait]
impl ChatTranscriptStore for InMemoryTranscripts {
    async fn append(
        &self,
        scope: &UserScope,
        message: &str,
        response: &str,
    ) -> Result<ChatRecord, DomainError> {
        let record = ChatRecord::new(scope, message, Some(response.to_string()));
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list(&self, scope: &UserScope, limit: i64) -> Result<Vec<ChatRecord>, DomainError> {
        let mine: Vec<ChatRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == scope.as_str())
            .cloned()
            .collect();
        let skip = mine.len().saturating_sub(limit as usize);
        Ok(mine.into_iter().skip(skip).collect())
    }
}

/// Generator answering with a fixed result and recording its calls
pub struct StubGenerator {
    pub reply: Result<String, String>,
    pub calls: Mutex<Vec<(String, GenerationOptions)>>,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GenerationService for StubGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), options.clone()));
        self.reply.clone().map_err(DomainError::ExternalService)
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_id(&self) -> &str {
        "stub-model"
    }
}

pub struct TestApp {
    pub router: Router,
    pub metrics: Arc<InMemoryMetrics>,
    pub transcripts: Arc<InMemoryTranscripts>,
}

pub fn test_app(
    rows: Vec<ApplianceRecord>,
    generator: Option<Arc<StubGenerator>>,
    api_key: Option<&str>,
) -> TestApp {
    let metrics = Arc::new(InMemoryMetrics {
        rows,
        ..InMemoryMetrics::default()
    });
    let transcripts = Arc::new(InMemoryTranscripts::default());

    let state = AppState {
        dashboard_service: Arc::new(DashboardService::new(
            metrics.clone() as Arc<dyn MetricsRepository>
        )),
        transcripts: transcripts.clone(),
        generator: generator.map(|g| g as Arc<dyn GenerationService>),
        api_key: api_key.map(Arc::<str>::from),
    };

    TestApp {
        router: build_router(state),
        metrics,
        transcripts,
    }
}

/// Send one request; non-JSON bodies come back as a JSON string
pub async fn send(router: &Router, request: Request<Body>) -> (u16, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
