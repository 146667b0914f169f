use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{auth, clients, dashboard, packages, payments, sessions};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Staff authentication: HTTP basic credentials are the e-mail and password
/// of a registered staff member. The matching [`engine::StaffUser`] is added
/// to the request extensions.
async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = match state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await
    {
        Ok(user) => user,
        Err(EngineError::Database(err)) => {
            tracing::error!("failed to check credentials: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        Err(_) => return Err(StatusCode::UNAUTHORIZED),
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/auth/session", get(auth::current))
        .route("/catalog", get(packages::catalog))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/clients", get(dashboard::clients))
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/{id}",
            get(clients::get)
                .put(clients::update)
                .delete(clients::delete),
        )
        .route("/clients/{id}/detail", get(clients::detail))
        .route("/clients/{id}/packages", get(clients::packages))
        .route("/clients/{id}/payments", get(clients::payments))
        .route("/clients/{id}/sessions", get(clients::sessions))
        .route("/clients/{id}/next-session", get(clients::next_session))
        .route("/packages", get(packages::list).post(packages::create))
        .route(
            "/packages/{id}",
            get(packages::get)
                .put(packages::update)
                .delete(packages::delete),
        )
        .route("/sessions", get(sessions::list).post(sessions::create))
        .route("/sessions/count", get(sessions::count))
        .route(
            "/sessions/{id}",
            get(sessions::get)
                .put(sessions::update)
                .delete(sessions::delete),
        )
        .route("/payments", get(payments::list).post(payments::create))
        .route("/payments/total", get(payments::total))
        .route(
            "/payments/{id}",
            get(payments::get)
                .put(payments::update)
                .delete(payments::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Builds the HTTP application around `engine`.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}
