//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Ask the route table where each request goes
//! - Forward requests to the chosen destination
//! - Refuse unrouted origin-form requests instead of looping back
//! - Observability (metrics, correlation IDs)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{uri::Authority, HeaderName, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::validation::ValidationError;
use crate::config::{ConfigError, RouterConfig};
use crate::http::request::{
    original_authority, propagate_request_id_layer, request_id, set_request_id_layer,
    virtual_port_key, with_destination,
};
use crate::observability::metrics;
use crate::routing::{Resolution, RouteTable, Target};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub client: Client<HttpConnector, Body>,
    /// Header carrying the virtual-port key.
    pub key_header: HeaderName,
    /// Fixed destination for requests no policy claims.
    pub passthrough: Option<Target>,
    /// Bounds requests handled at once.
    pub in_flight: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: &RouterConfig, table: Arc<RouteTable>) -> Result<Self, ConfigError> {
        let routing = &config.routing;
        let key_header = HeaderName::from_bytes(routing.target_port_header.as_bytes())
            .map_err(|_| {
                ConfigError::Validation(vec![ValidationError::InvalidHeader(
                    routing.target_port_header.clone(),
                )])
            })?;
        let passthrough = routing
            .passthrough_upstream
            .as_deref()
            .map(str::parse::<Target>)
            .transpose()?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            table,
            client,
            key_header,
            passthrough,
            in_flight: Arc::new(Semaphore::new(config.listener.max_in_flight)),
        })
    }
}

/// HTTP server for the router.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    in_flight: Arc<Semaphore>,
}

impl HttpServer {
    /// Create a new HTTP server routing with `table`.
    pub fn new(config: RouterConfig, table: Arc<RouteTable>) -> Result<Self, ConfigError> {
        let state = AppState::new(&config, table)?;
        let in_flight = state.in_flight.clone();
        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            in_flight,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            header = %self.config.routing.target_port_header,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let in_flight = self.in_flight;

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                // Requests still arriving on open connections get 503 while
                // the ones holding permits drain.
                in_flight.close();
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Main proxy handler.
/// Resolves the destination and forwards the request unchanged apart from it.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    let Ok(_permit) = state.in_flight.acquire().await else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Router shutting down").into_response();
    };

    let request_id = request_id(request.headers()).to_string();
    let key = virtual_port_key(request.headers(), &state.key_header);
    let path = request.uri().path();

    let resolution = state.table.resolve(key, path);
    // Without a pass-through upstream only absolute-form requests can pass
    // through. An origin-form request was addressed to the router itself.
    let destination: Option<Authority> = match resolution {
        Resolution::Forward(target) => Some(target.authority().clone()),
        Resolution::NoRoute => state
            .passthrough
            .as_ref()
            .map(|t| t.authority().clone())
            .or_else(|| original_authority(&request)),
    };

    tracing::debug!(
        request_id = %request_id,
        peer = %peer,
        method = %method,
        key = key.unwrap_or("-"),
        path = %path,
        decision = resolution.as_str(),
        destination = ?destination.as_ref().map(Authority::as_str),
        "Routing decision"
    );

    let decision = resolution.as_str();
    let Some(destination) = destination else {
        tracing::warn!(
            request_id = %request_id,
            key = key.unwrap_or("-"),
            "No route and no pass-through destination"
        );
        metrics::record_request(&method, 421, decision, start_time);
        return (StatusCode::MISDIRECTED_REQUEST, "No route for request").into_response();
    };

    let (mut parts, body) = request.into_parts();
    parts.uri = with_destination(&parts.uri, &destination);
    let outbound = Request::from_parts(parts, body);

    match state.client.request(outbound).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(&method, status.as_u16(), decision, start_time);

            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                destination = %destination,
                error = %e,
                "Upstream error"
            );
            metrics::record_request(&method, 502, decision, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
