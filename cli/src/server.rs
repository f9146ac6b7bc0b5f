#[cfg(feature = "server")]
pub mod http {
    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::{get, post},
        Router,
    };
    use primeproof::{ProofReport, Prover};
    use serde::{Deserialize, Serialize};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tower_http::cors::CorsLayer;
    use tracing::{error, info};

    type SharedProver = Arc<Prover>;

    #[derive(Debug, Deserialize)]
    struct ProveRequest {
        lhs: Vec<String>,
        rhs: Vec<String>,
    }

    #[derive(Debug, Serialize)]
    struct AxiomJson {
        id: u64,
        lhs: Vec<String>,
        rhs: Vec<String>,
        was_swapped: bool,
    }

    #[derive(Debug, Serialize)]
    struct ErrorResponse {
        error: String,
    }

    type ApiError = (StatusCode, Json<ErrorResponse>);

    fn api_error(status: StatusCode, error: String) -> ApiError {
        (status, Json(ErrorResponse { error }))
    }

    pub fn router(prover: Prover) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/axioms", get(list_axioms))
            .route("/prove", post(prove))
            .layer(CorsLayer::permissive())
            .with_state(Arc::new(prover))
    }

    pub async fn start_server(prover: Prover, host: &str, port: u16) -> anyhow::Result<()> {
        let app = router(prover);

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        info!("Primeproof server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    async fn health_check() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "ok",
            "service": "primeproof",
            "version": env!("CARGO_PKG_VERSION")
        }))
    }

    async fn list_axioms(State(prover): State<SharedProver>) -> impl IntoResponse {
        let axioms: Vec<AxiomJson> = prover
            .axioms()
            .iter()
            .map(|rule| {
                let (lhs, rhs) = rule.original_orientation();
                AxiomJson {
                    id: rule.id,
                    lhs: lhs.to_vec(),
                    rhs: rhs.to_vec(),
                    was_swapped: rule.was_swapped,
                }
            })
            .collect();
        Json(axioms)
    }

    async fn prove(
        State(prover): State<SharedProver>,
        Json(payload): Json<ProveRequest>,
    ) -> Result<Json<ProofReport>, ApiError> {
        // Search is CPU bound; keep it off the async workers.
        let report = tokio::task::spawn_blocking(move || prover.prove(&payload.lhs, &payload.rhs))
            .await
            .map_err(|e| {
                error!("Proof task failed: {}", e);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Proof task failed: {}", e))
            })?
            .map_err(|e| {
                error!("Proof rejected: {}", e);
                api_error(StatusCode::BAD_REQUEST, e.to_string())
            })?;

        info!(
            status = ?report.status,
            steps = report.proof.len(),
            "Answered proof request"
        );
        Ok(Json(report))
    }

}

#[cfg(not(feature = "server"))]
pub mod http {
    pub async fn start_server(
        _prover: primeproof::Prover,
        _host: &str,
        _port: u16,
    ) -> anyhow::Result<()> {
        anyhow::bail!("Server feature not enabled. Recompile with --features server")
    }
}
