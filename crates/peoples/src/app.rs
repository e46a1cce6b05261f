use std::time::Duration;

use axum::{extract::Request, http::StatusCode, routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::livez,
        peoples::{create_person, delete_person, get_person, list_people, update_person},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/peoples", get(list_people).post(create_person))
        .route(
            "/peoples/{id}",
            get(get_person).put(update_person).delete(delete_person),
        );

    let router = Router::new()
        .route("/livez", get(livez))
        .nest("/api/v1", api_routes);

    with_middleware(router).with_state(state)
}

/// Wraps `router` in the shared middleware stack.
///
/// From the outside in: assign an `x-request-id` unless the caller sent
/// one, echo it on the response, trace, time out after 10s, and turn
/// handler panics into 500 responses.
fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
