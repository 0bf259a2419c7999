//! HTTP routing

pub mod health;
pub mod notes;
pub mod readings;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
///
/// CORS is wide open: the frontend is served from wherever the student runs
/// it.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/api/upload", post(readings::upload))
        .route("/api/readings", get(readings::list))
        .route(
            "/api/readings/:id",
            get(readings::get).delete(readings::delete),
        )
        .route("/api/readings/:id/notes", get(notes::list))
        .route(
            "/api/readings/:id/notes/:argument_index",
            put(notes::update).delete(notes::delete),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum_test::TestServer;

    use crate::analysis::{
        AnalysisError, Analyzer, Argument, Evidence, KeyTerm, ReadingAnalysis,
    };
    use crate::state::AppState;
    use crate::store::SqliteStore;

    /// Analyzer that returns a fixed analysis without any network call
    pub(crate) struct StubAnalyzer(pub ReadingAnalysis);

    #[async_trait]
    impl Analyzer for StubAnalyzer {
        async fn analyze(&self, _text: &str) -> Result<ReadingAnalysis, AnalysisError> {
            Ok(self.0.clone())
        }
    }

    /// Analyzer that always fails, for exercising the 500 path
    pub(crate) struct FailingAnalyzer;

    #[async_trait]
    impl Analyzer for FailingAnalyzer {
        async fn analyze(&self, _text: &str) -> Result<ReadingAnalysis, AnalysisError> {
            Err(AnalysisError::EmptyReply)
        }
    }

    pub(crate) fn sample_analysis() -> ReadingAnalysis {
        ReadingAnalysis {
            title: "The Making of the English Working Class".to_string(),
            author: Some("E. P. Thompson".to_string()),
            thesis: "Class is a historical relationship, made by its participants.".to_string(),
            key_terms: vec![KeyTerm {
                term: "moral economy".to_string(),
                definition: "Customary expectations governing market behavior".to_string(),
            }],
            arguments: vec![Argument {
                argument: "Artisan radicalism shaped class consciousness".to_string(),
                evidence: vec![Evidence {
                    text: "Corresponding societies spread through workshops".to_string(),
                    page: "p. 152".to_string(),
                    explanation: None,
                }],
            }],
            historical_context: "Industrializing England, 1780-1832.".to_string(),
            historiography: "Social history from below.".to_string(),
            significance: Some("Reframed labor history around agency.".to_string()),
        }
    }

    /// In-memory store plus stub analyzer, returning the store handle too so
    /// tests can seed and inspect it directly.
    pub(crate) async fn test_state() -> (AppState, Arc<SqliteStore>) {
        let store = Arc::new(SqliteStore::connect("sqlite::memory:").await.unwrap());
        let state = AppState::new(
            store.clone(),
            Arc::new(StubAnalyzer(sample_analysis())),
        );
        (state, store)
    }

    pub(crate) async fn failing_state() -> (AppState, Arc<SqliteStore>) {
        let store = Arc::new(SqliteStore::connect("sqlite::memory:").await.unwrap());
        let state = AppState::new(store.clone(), Arc::new(FailingAnalyzer));
        (state, store)
    }

    /// In-process test server for JSON routes
    pub(crate) fn test_server(state: AppState) -> TestServer {
        TestServer::new(super::router(state)).unwrap()
    }

    /// Real listener on an ephemeral port, for multipart uploads driven by
    /// reqwest.
    pub(crate) async fn spawn_server(state: AppState) -> String {
        let app = super::router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
