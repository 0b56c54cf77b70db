use api_shared::{require_valid_token, HealthRes, HealthService, UploadRes};
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{header, Method},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use intake_core::constants::IMAGE_FIELD_NAME;
use intake_files::UploadError;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::error::ApiError;
use crate::form::read_upload_form;
use crate::state::AppState;

/// Multipart body accepted by `POST /upload`.
#[derive(ToSchema)]
#[allow(dead_code)]
struct UploadReq {
    /// One-time code for the current 30 second step
    totp_token: String,
    /// JPEG, PNG or GIF image; the filename must carry an extension
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, upload),
    components(schemas(HealthRes, UploadRes, UploadReq))
)]
pub struct ApiDoc;

/// Builds the REST router.
///
/// Request bodies are capped at the pipeline's size limit. `GET /` and the CORS layer are
/// only added when enabled in [`crate::RestConfig`].
pub fn router(state: AppState) -> Router {
    let limit = state.pipeline().max_bytes();
    let rest = state.rest().clone();

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/api-docs/openapi.json", get(openapi));

    if rest.landing_page {
        app = app.route("/", get(landing_page));
    }

    let app = app.layer(DefaultBodyLimit::max(limit)).with_state(state);

    if rest.cors {
        app.layer(cors_layer())
    } else {
        app
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

#[axum::debug_handler]
async fn landing_page(State(state): State<AppState>) -> Html<String> {
    Html(state.landing_page().to_owned())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadReq, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadRes),
        (status = 400, description = "Missing file, unsupported format or missing extension", body = UploadRes),
        (status = 401, description = "Invalid or missing TOTP token", body = UploadRes),
        (status = 413, description = "Request body exceeds the size limit", body = UploadRes),
        (status = 500, description = "The file could not be stored", body = UploadRes)
    )
)]
/// Accept one image, gated by a one-time code
///
/// The form is read once. The token is checked before anything else about the form is
/// judged; a body that hits the size limit before any token was read is refused as too
/// large. A body that is not a multipart form has no token and is refused as unauthorised.
///
/// # Returns
/// * `Ok(Json<UploadRes>)` - the generated storage name
/// * `Err(ApiError)` - 400, 401, 413 or 500 with an empty filename
#[axum::debug_handler]
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadRes>, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!("Not a multipart upload: {}", rejection.body_text());
        ApiError::Unauthorized
    })?;

    let form = read_upload_form(multipart).await;
    let too_large = UploadError::PayloadTooLarge {
        limit: state.pipeline().max_bytes(),
    };

    // Limit hit before any token arrived: there is nothing to judge
    if form.too_large && form.token.is_none() {
        return Err(too_large.into());
    }

    require_valid_token(state.verifier(), form.token.as_deref())?;

    if form.too_large {
        return Err(too_large.into());
    }
    if let Some(reason) = form.malformed {
        return Err(UploadError::MalformedForm(reason).into());
    }
    let image = form
        .image
        .ok_or_else(|| UploadError::MissingFile(IMAGE_FIELD_NAME.into()))?;

    let pipeline = state.pipeline().clone();
    let asset = tokio::task::spawn_blocking(move || pipeline.accept(image))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    tracing::info!(
        "Stored {} ({}, {} bytes, sha256 {})",
        asset.storage_name,
        asset.media_type,
        asset.size_bytes,
        asset.sha256
    );

    Ok(Json(UploadRes::stored(asset.storage_name.to_string())))
}
