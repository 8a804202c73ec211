mod metrics;
mod models;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::gateway::GatewayClient;
use common::types::Address;
use models::{
    AgentStatsResponse, AggregateResponse, AuthorsResponse, BatchRequest, CreatorsResponse,
    DebateListResponse, ParticipantsResponse, PlatformStatsResponse, SummariesResponse,
};
use reader::sources::{DebateReads, FactoryReads};
use reader::BatchReader;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub struct AppState<S> {
    reader: BatchReader<S>,
    default_max_authors: usize,
    default_max_participants: usize,
}

/// Upstream read failures map to 502: the gateway (or the chain behind it)
/// failed, not this service. The full context chain goes into the body.
struct AppError(anyhow::Error);

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let detail = format!("{:#}", self.0);
        tracing::error!(error = %detail, "batch operation failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": detail })),
        )
            .into_response()
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn platform_stats<S>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<PlatformStatsResponse>, AppError>
where
    S: FactoryReads + DebateReads + Send + Sync + 'static,
{
    let stats = state.reader.platform_stats().await?;
    Ok(Json(PlatformStatsResponse { stats }))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    /// `all` (default) or `active`.
    #[serde(default)]
    set: Option<String>,
}

async fn list_debates<S>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<DebateListResponse>, AppError>
where
    S: FactoryReads + DebateReads + Send + Sync + 'static,
{
    let debates = match params.set.as_deref() {
        Some("active") => state.reader.active_debates().await?,
        _ => state.reader.all_debates().await?,
    };
    Ok(Json(DebateListResponse { debates }))
}

async fn debate_summaries<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<SummariesResponse>, AppError>
where
    S: FactoryReads + DebateReads + Send + Sync + 'static,
{
    let summaries = state.reader.debate_summaries(&req.addresses).await?;
    Ok(Json(SummariesResponse { summaries }))
}

async fn argument_authors<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<AuthorsResponse>, AppError>
where
    S: FactoryReads + DebateReads + Send + Sync + 'static,
{
    let max = req.max_results.unwrap_or(state.default_max_authors);
    let authors = state.reader.argument_authors(&req.addresses, max).await?;
    Ok(Json(AuthorsResponse { authors }))
}

async fn participant_details<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<ParticipantsResponse>, AppError>
where
    S: FactoryReads + DebateReads + Send + Sync + 'static,
{
    let max = req.max_results.unwrap_or(state.default_max_participants);
    let participants = state.reader.participant_details(&req.addresses, max).await?;
    Ok(Json(ParticipantsResponse { participants }))
}

async fn debate_creators<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<CreatorsResponse>, AppError>
where
    S: FactoryReads + DebateReads + Send + Sync + 'static,
{
    let creators = state.reader.debate_creators(&req.addresses).await?;
    Ok(Json(CreatorsResponse { creators }))
}

async fn aggregate_stats<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<AggregateResponse>, AppError>
where
    S: FactoryReads + DebateReads + Send + Sync + 'static,
{
    let aggregate = state.reader.aggregate_stats(&req.addresses).await?;
    Ok(Json(AggregateResponse { aggregate }))
}

async fn agent_stats<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<AgentStatsResponse>, AppError>
where
    S: FactoryReads + DebateReads + Send + Sync + 'static,
{
    let agents = state.reader.agent_stats_batch(&req.addresses).await?;
    Ok(Json(AgentStatsResponse { agents }))
}

fn build_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: FactoryReads + DebateReads + Send + Sync + 'static,
{
    Router::new()
        .route("/healthz", get(healthz))
        .route("/platform/stats", get(platform_stats::<S>))
        .route("/debates", get(list_debates::<S>))
        .route("/debates/summaries", post(debate_summaries::<S>))
        .route("/debates/authors", post(argument_authors::<S>))
        .route("/debates/participants", post(participant_details::<S>))
        .route("/debates/creators", post(debate_creators::<S>))
        .route("/debates/aggregate", post(aggregate_stats::<S>))
        .route("/agents/stats", post(agent_stats::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = common::config::Config::load()?;
    let _otel_guard = common::observability::init("web", &config.general.log_level)?;

    tracing::info!("debate reader web API starting");

    metrics::install_prometheus(config.observability.prometheus_port)?;

    let gateway = GatewayClient::new(
        &config.gateway.base_url,
        Duration::from_secs(config.gateway.request_timeout_secs),
    )?;
    let factory: Address = config.gateway.factory_address.parse()?;

    let state = Arc::new(AppState {
        reader: BatchReader::new(gateway, factory),
        default_max_authors: config.reader.max_authors,
        default_max_participants: config.reader.max_participants,
    });

    let web = config.web.clone().unwrap_or(common::config::Web {
        host: "0.0.0.0".to_string(),
        port: 8080,
    });
    let addr: SocketAddr = format!("{}:{}", web.host, web.port).parse()?;
    tracing::info!(%addr, factory = %factory, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use axum::body::Body;
    use axum::http::Request;
    use common::types::{
        AgentStats, Argument, DebateInfo, DebateStatus, PlatformStats, Side,
    };
    use std::collections::HashMap;
    use tower::ServiceExt;

    fn addr_n(n: u8) -> Address {
        let mut bytes = [0_u8; 20];
        bytes[19] = n;
        Address::from_bytes(bytes)
    }

    struct FakeDebate {
        info: DebateInfo,
        status: DebateStatus,
        side_a: Vec<Argument>,
        side_b: Vec<Argument>,
    }

    #[derive(Default)]
    struct FakeSrc {
        debates: HashMap<Address, FakeDebate>,
    }

    impl FactoryReads for FakeSrc {
        async fn factory_counts(&self, _factory: &Address) -> Result<PlatformStats> {
            Ok(PlatformStats {
                total_debates: self.debates.len() as u64,
                active_debates: 1,
                resolving_debates: 0,
                resolved_debates: 0,
                undetermined_debates: 0,
            })
        }

        async fn all_debates(&self, _factory: &Address) -> Result<Vec<Address>> {
            let mut list: Vec<Address> = self.debates.keys().copied().collect();
            list.sort();
            Ok(list)
        }

        async fn active_debates(&self, _factory: &Address) -> Result<Vec<Address>> {
            Ok(vec![])
        }

        async fn user_stats(&self, _factory: &Address, user: &Address) -> Result<AgentStats> {
            bail!("no ledger row for {user}")
        }
    }

    impl DebateReads for FakeSrc {
        async fn debate_info(&self, debate: &Address) -> Result<DebateInfo> {
            match self.debates.get(debate) {
                Some(d) => Ok(d.info.clone()),
                None => bail!("debate call reverted: {debate}"),
            }
        }

        async fn debate_status(&self, debate: &Address) -> Result<DebateStatus> {
            match self.debates.get(debate) {
                Some(d) => Ok(d.status),
                None => bail!("debate call reverted: {debate}"),
            }
        }

        async fn debate_arguments(&self, debate: &Address, side: Side) -> Result<Vec<Argument>> {
            let Some(d) = self.debates.get(debate) else {
                bail!("debate call reverted: {debate}")
            };
            Ok(match side {
                Side::A => d.side_a.clone(),
                Side::B => d.side_b.clone(),
            })
        }
    }

    fn test_app(default_max_participants: usize) -> Router {
        let mut src = FakeSrc::default();
        let alice = addr_n(0xa1);
        let bob = addr_n(0xb2);
        src.debates.insert(
            addr_n(1),
            FakeDebate {
                info: DebateInfo {
                    creator: addr_n(0xee),
                    statement: "s".to_string(),
                    description: String::new(),
                    side_a_name: "Yes".to_string(),
                    side_b_name: "No".to_string(),
                    creation_date: 0,
                    end_date: 10,
                    is_resolved: false,
                    is_side_a_winner: false,
                    locked_a: 10,
                    unlocked_a: 5,
                    locked_b: 3,
                    unlocked_b: 2,
                    winner_reasoning: String::new(),
                    content_bytes: 0,
                    max_content_bytes: 0,
                    bounty: 7,
                },
                status: DebateStatus::Active,
                side_a: vec![
                    Argument {
                        author: alice,
                        content: String::new(),
                        timestamp: 1,
                        amount: 5,
                    },
                    Argument {
                        author: bob,
                        content: String::new(),
                        timestamp: 2,
                        amount: 3,
                    },
                ],
                side_b: vec![Argument {
                    author: alice,
                    content: String::new(),
                    timestamp: 3,
                    amount: 2,
                }],
            },
        );
        build_router(Arc::new(AppState {
            reader: BatchReader::new(src, addr_n(0xfa)),
            default_max_authors: 100,
            default_max_participants,
        }))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let app = test_app(100);
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_summaries_endpoint_shapes_amounts() {
        let app = test_app(100);
        let body = format!(r#"{{"addresses":["{}"]}}"#, addr_n(1));
        let response = app
            .oneshot(
                Request::post("/debates/summaries")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let row = &json["summaries"][0];
        assert_eq!(row["total_side_a"], "15");
        assert_eq!(row["total_side_b"], "5");
        assert_eq!(row["status"], "active");
        assert_eq!(row["argument_count_a"], 2);
    }

    #[tokio::test]
    async fn test_participants_use_configured_default_cap() {
        // Default cap of 1: only the first-seen author gets a row, but she
        // still accrues her side-B stake.
        let app = test_app(1);
        let body = format!(r#"{{"addresses":["{}"]}}"#, addr_n(1));
        let response = app
            .oneshot(
                Request::post("/debates/participants")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let participants = json["participants"].as_array().unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0]["address"], addr_n(0xa1).to_string());
        assert_eq!(participants[0]["arguments_written"], 2);
        assert_eq!(participants[0]["amount_staked"], "7");
    }

    #[tokio::test]
    async fn test_unknown_debate_maps_to_bad_gateway() {
        let app = test_app(100);
        let body = format!(r#"{{"addresses":["{}"]}}"#, addr_n(9));
        let response = app
            .oneshot(
                Request::post("/debates/aggregate")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("reverted"));
    }

    #[tokio::test]
    async fn test_malformed_address_is_a_client_error() {
        let app = test_app(100);
        let response = app
            .oneshot(
                Request::post("/debates/creators")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"addresses":["0xnope"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
