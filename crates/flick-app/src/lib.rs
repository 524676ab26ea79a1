pub mod error;
pub mod health;
pub mod rest_api;
pub mod state;
pub mod validate;

use axum::routing::get;

use crate::state::AppState;

#[macro_export]
macro_rules! repository_from_request {
    ($repo:ty) => {
        impl axum::extract::FromRequestParts<$crate::state::AppState> for $repo {
            type Rejection = std::convert::Infallible;

            fn from_request_parts(
                _parts: &mut http::request::Parts,
                state: &$crate::state::AppState,
            ) -> impl std::future::Future<Output = std::result::Result<Self, Self::Rejection>>
                   + core::marker::Send {
                futures::future::ready(std::result::Result::Ok(
                    <$repo>::new(state.pool().clone()).with_timeout(state.config().query_timeout),
                ))
            }
        }
    };
}

/// All public API routes, without state and middleware.
pub fn api_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/v1/healthcheck", get(health::healthcheck))
        .nest("/v1/movies", rest_api::movie::router())
        .fallback(error::not_found)
        .method_not_allowed_fallback(error::method_not_allowed)
}
