use crate::database::{places::validate_new_place, Database, NewPlace, Place};
use crate::search::{
    compile, parse_params, FilterTokens, RawSearchParams, SortDirection, SortField,
};
use poem::{
    handler,
    http::StatusCode,
    web::{Data, Json, Path, Query},
    Error as PoemError, IntoResponse, Result as PoemResult,
};
use serde::Serialize;
use std::sync::Arc;
use ts_rs::TS;

// Common response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub environment: String,
}

/// Matching places plus the parsed filters, so clients can show what is active
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PlaceSearchResponse {
    pub places: Vec<Place>,
    pub categories: Option<Vec<String>>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub platforms: Option<Vec<String>>,
    pub payment_methods: Option<Vec<String>>,
    pub search: Option<String>,
    pub sort_data: SortField,
    pub sort_status: Option<SortDirection>,
}

impl PlaceSearchResponse {
    fn new(places: Vec<Place>, tokens: FilterTokens) -> Self {
        Self {
            places,
            categories: tokens.categories,
            price_min: tokens.price_min,
            price_max: tokens.price_max,
            platforms: tokens.platforms,
            payment_methods: tokens.payment_methods,
            search: tokens.search,
            sort_data: tokens.sort_field,
            sort_status: tokens.sort_direction,
        }
    }
}

fn json_error(status: StatusCode, msg: String) -> PoemError {
    PoemError::from_response((status, Json(ApiResponse::<()>::error(msg))).into_response())
}

fn internal_error(err: anyhow::Error) -> PoemError {
    tracing::error!(error = %err, "store operation failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

#[handler]
pub async fn health() -> Json<HealthResponse> {
    let environment =
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    Json(HealthResponse {
        success: true,
        message: "Places API is running".to_string(),
        environment,
    })
}

// ============ Place Endpoints ============

#[handler]
pub async fn search_places(
    db: Data<&Arc<Database>>,
    Path(region): Path<String>,
    Query(params): Query<RawSearchParams>,
) -> PoemResult<Json<ApiResponse<PlaceSearchResponse>>> {
    let tokens = parse_params(&params, &region)?;
    let spec = compile(&tokens);
    let places = db.search_places(&spec).await.map_err(internal_error)?;

    tracing::info!(
        region = %tokens.region,
        unfiltered = spec.is_unfiltered(),
        results = places.len(),
        "place search completed"
    );
    Ok(Json(ApiResponse::success(PlaceSearchResponse::new(
        places, tokens,
    ))))
}

#[handler]
pub async fn get_place(
    db: Data<&Arc<Database>>,
    Path(id): Path<i64>,
) -> PoemResult<Json<ApiResponse<Place>>> {
    match db.get_place(id).await.map_err(internal_error)? {
        Some(place) => Ok(Json(ApiResponse::success(place))),
        None => Err(json_error(
            StatusCode::NOT_FOUND,
            format!("Place {} not found", id),
        )),
    }
}

#[handler]
pub async fn create_place(
    db: Data<&Arc<Database>>,
    Json(params): Json<NewPlace>,
) -> PoemResult<Json<ApiResponse<Place>>> {
    validate_new_place(&params)
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let place = db.create_place(params).await.map_err(internal_error)?;
    Ok(Json(ApiResponse::success(place)))
}

#[handler]
pub async fn delete_place(
    db: Data<&Arc<Database>>,
    Path(id): Path<i64>,
) -> PoemResult<Json<ApiResponse<String>>> {
    if db.delete_place(id).await.map_err(internal_error)? {
        Ok(Json(ApiResponse::success(format!("Place {} deleted", id))))
    } else {
        Err(json_error(
            StatusCode::NOT_FOUND,
            format!("Place {} not found", id),
        ))
    }
}
