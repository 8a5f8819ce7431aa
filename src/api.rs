use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::certainty::{self, CfError};
use crate::engine;
use crate::evaluation::EvaluationResult;
use crate::features::FeatureVector;
use crate::metrics;
use crate::service::{PhotoService, Role, ServiceError, Upload, Viewer};
use crate::store::PhotoRecord;

#[derive(Clone)]
pub struct AppState {
    pub photos: PhotoService,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/evaluate", post(evaluate))
        .route("/combine", post(combine))
        .route("/photos", post(upload_photo).get(list_photos))
        .route("/photos/{id}", get(get_photo))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// ---- errors ----

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(what: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: what.into(),
        }
    }
}

impl From<CfError> for ApiError {
    fn from(e: CfError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let status = match &e {
            ServiceError::Evaluation(_) | ServiceError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ServiceError::Extraction(_) | ServiceError::Store(_) => {
                warn!(target: "photo", error = %e, "upload failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

// ---- handlers ----

async fn evaluate(Json(features): Json<FeatureVector>) -> Result<Json<EvaluationResult>, ApiError> {
    let result = engine::assess(&features)?;
    metrics::record_evaluation(&result);
    debug!(
        target: "evaluate",
        quality = result.quality.as_str(),
        score = result.score,
        cf = result.certainty_factor,
        normalized = features.is_normalized(),
        "evaluated features"
    );
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
struct CombineReq {
    cfs: Vec<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CombineResp {
    certainty_factor: f64,
}

async fn combine(Json(body): Json<CombineReq>) -> Result<Json<CombineResp>, ApiError> {
    let cf = certainty::combine(&body.cfs)?;
    Ok(Json(CombineResp {
        certainty_factor: cf,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadReq {
    owner_id: String,
    title: String,
    image_ref: String,
    #[serde(default)]
    features: Option<FeatureVector>,
}

async fn upload_photo(
    State(state): State<AppState>,
    Json(body): Json<UploadReq>,
) -> Result<(StatusCode, Json<PhotoRecord>), ApiError> {
    let record = state
        .photos
        .upload(Upload {
            owner_id: body.owner_id,
            title: body.title,
            image_ref: body.image_ref,
            features: body.features,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    viewer: String,
    #[serde(default)]
    role: Role,
}

async fn list_photos(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<PhotoRecord>>, ApiError> {
    let viewer = Viewer {
        user_id: q.viewer,
        role: q.role,
    };
    Ok(Json(state.photos.visible_photos(&viewer)?))
}

async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PhotoRecord>, ApiError> {
    state
        .photos
        .photo(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("photo '{id}' not found")))
}
