use axum::{
    extract::Request,
    http::HeaderValue,
    middleware,
    response::Response,
    Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::{campus, room, shared::AppState, utils};

/// Response header naming the route group that served the request
pub const API_GROUP_HEADER: &str = "x-api-group";

/// A sub-router's mount point and the tag it is documented under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteGroup {
    pub prefix: &'static str,
    pub tag: &'static str,
}

pub const UTILS: RouteGroup = RouteGroup {
    prefix: "/utils",
    tag: "utils",
};
pub const ROOMS: RouteGroup = RouteGroup {
    prefix: "/rooms",
    tag: "rooms",
};
pub const CAMPUSES: RouteGroup = RouteGroup {
    prefix: "/campuses",
    tag: "campuses",
};

/// Every group mounted by `api_router`, in mount order
pub const API_GROUPS: [RouteGroup; 3] = [UTILS, ROOMS, CAMPUSES];

/// Mounts `router` under the group's prefix, tagging its spans and responses
fn include_router(
    api: Router<AppState>,
    router: Router<AppState>,
    group: RouteGroup,
) -> Router<AppState> {
    let tagged = router
        .layer(middleware::map_response(move |mut response: Response| async move {
            response
                .headers_mut()
                .insert(API_GROUP_HEADER, HeaderValue::from_static(group.tag));
            response
        }))
        .layer(
            TraceLayer::new_for_http().make_span_with(move |request: &Request| {
                info_span!(
                    "api_group",
                    tag = group.tag,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        );

    api.nest(group.prefix, tagged)
}

/// Aggregates the utils, rooms and campuses sub-routers
pub fn api_router() -> Router<AppState> {
    let api = Router::new();
    let api = include_router(api, utils::router(), UTILS);
    let api = include_router(api, room::router(), ROOMS);
    include_router(api, campus::router(), CAMPUSES)
}

/// Full application: the API under `/api`, traced and bound to `state`
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
