use aide::{axum::ApiRouter, openapi::OpenApi, scalar::Scalar};
use axum::{routing::get, Extension, Json};

pub fn handler() -> ApiRouter {
    let scalar = Scalar::new("/openapi.json").with_title("Answer Service API");

    ApiRouter::new().route("/docs", scalar.axum_route()).route(
        "/openapi.json",
        get(|Extension(openapi): Extension<OpenApi>| async move { Json(openapi) }),
    )
}
