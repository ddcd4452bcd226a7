use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::Path,
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, put},
};
use platform_authz::{Ability, Action, Subject, abilities_for};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    guard::{AuthRejection, CurrentUser},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "memberhub gateway listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/me", get(me_handler))
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/{id}", put(update_booking).delete(delete_booking))
        .route("/membership", get(list_membership).post(create_membership))
        .route("/membership/{id}", put(update_membership))
        .route("/users", get(list_users))
        .route("/users/{id}", delete(delete_user))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct MeResponse {
    user_id: Uuid,
    role: String,
    abilities: Vec<Ability>,
}

/// Authenticated-only: echoes the verified identity and what the role may do.
async fn me_handler(user: CurrentUser) -> Json<MeResponse> {
    let abilities = abilities_for(&user.role).abilities().to_vec();
    Json(MeResponse {
        user_id: user.user_id,
        role: user.role,
        abilities,
    })
}

// Resource handlers are stubs over the gate: each route declares the
// (action, subject) it requires, and the downstream operation stands in for
// whatever the deployment wires behind the gateway.

#[derive(Serialize)]
struct CollectionResponse {
    resource: &'static str,
    items: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct CreatedResponse {
    resource: &'static str,
    id: Uuid,
}

async fn list_bookings(user: CurrentUser) -> Result<Json<CollectionResponse>, AuthRejection> {
    user.require(Action::Read, Subject::Bookings)?;
    Ok(Json(CollectionResponse {
        resource: "bookings",
        items: Vec::new(),
    }))
}

async fn create_booking(user: CurrentUser) -> Result<impl IntoResponse, AuthRejection> {
    user.require(Action::Create, Subject::Bookings)?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            resource: "bookings",
            id: Uuid::new_v4(),
        }),
    ))
}

async fn update_booking(
    user: CurrentUser,
    Path(_id): Path<Uuid>,
) -> Result<StatusCode, AuthRejection> {
    user.require(Action::Update, Subject::Bookings)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_booking(
    user: CurrentUser,
    Path(_id): Path<Uuid>,
) -> Result<StatusCode, AuthRejection> {
    user.require(Action::Delete, Subject::Bookings)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_membership(user: CurrentUser) -> Result<Json<CollectionResponse>, AuthRejection> {
    user.require(Action::Read, Subject::Membership)?;
    Ok(Json(CollectionResponse {
        resource: "membership",
        items: Vec::new(),
    }))
}

async fn create_membership(user: CurrentUser) -> Result<impl IntoResponse, AuthRejection> {
    user.require(Action::Create, Subject::Membership)?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            resource: "membership",
            id: Uuid::new_v4(),
        }),
    ))
}

async fn update_membership(
    user: CurrentUser,
    Path(_id): Path<Uuid>,
) -> Result<StatusCode, AuthRejection> {
    user.require(Action::Update, Subject::Membership)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_users(user: CurrentUser) -> Result<Json<CollectionResponse>, AuthRejection> {
    user.require(Action::Read, Subject::Users)?;
    Ok(Json(CollectionResponse {
        resource: "users",
        items: Vec::new(),
    }))
}

async fn delete_user(
    user: CurrentUser,
    Path(_id): Path<Uuid>,
) -> Result<StatusCode, AuthRejection> {
    user.require(Action::Delete, Subject::Users)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
