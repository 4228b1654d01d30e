use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::checkout::{CheckoutList, CreateCheckoutRequest, UpdateStatusRequest},
    error::{AppResult, ErrorData},
    models::Checkout,
    response::ApiResponse,
    routes::{
        extract::{ApiJson, ApiQuery, CheckoutId, OwnerId},
        params::{CheckoutListQuery, SummaryQuery},
    },
    services::{checkout_service, summary_service},
    state::AppState,
    summary::Summary,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_checkouts).post(create_checkout))
        .route("/summary", get(checkout_summary))
        .route("/user/{user_id}", get(list_user_checkouts))
        .route("/{id}", get(get_checkout).delete(delete_checkout))
        .route("/{id}/status", patch(update_checkout_status))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CreateCheckoutRequest,
    responses(
        (status = 201, description = "Checkout created with status Pending; the user's cart is cleared", body = ApiResponse<Checkout>),
        (status = 400, description = "Malformed items or missing field", body = ApiResponse<ErrorData>),
        (status = 500, description = "Store failure", body = ApiResponse<ErrorData>),
    ),
    tag = "Checkout"
)]
pub async fn create_checkout(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCheckoutRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Checkout>>)> {
    let resp = checkout_service::create_checkout(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/checkout",
    params(CheckoutListQuery),
    responses(
        (status = 200, description = "All checkouts, possibly empty", body = ApiResponse<CheckoutList>),
        (status = 400, description = "Unknown status filter", body = ApiResponse<ErrorData>),
    ),
    tag = "Checkout"
)]
pub async fn list_checkouts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CheckoutListQuery>,
) -> AppResult<Json<ApiResponse<CheckoutList>>> {
    let resp = checkout_service::list_checkouts(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/checkout/user/{user_id}",
    params(("user_id" = uuid::Uuid, Path, description = "Owner ID")),
    responses(
        (status = 200, description = "Checkouts of one user", body = ApiResponse<CheckoutList>),
        (status = 404, description = "The user has no checkouts", body = ApiResponse<ErrorData>),
    ),
    tag = "Checkout"
)]
pub async fn list_user_checkouts(
    State(state): State<AppState>,
    OwnerId(user_id): OwnerId,
) -> AppResult<Json<ApiResponse<CheckoutList>>> {
    let resp = checkout_service::list_user_checkouts(&state, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/checkout/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Revenue metrics, daily series and rankings over all checkouts", body = ApiResponse<Summary>),
        (status = 400, description = "Offset out of range", body = ApiResponse<ErrorData>),
    ),
    tag = "Checkout"
)]
pub async fn checkout_summary(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SummaryQuery>,
) -> AppResult<Json<ApiResponse<Summary>>> {
    let resp = summary_service::checkout_summary(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/checkout/{id}",
    params(("id" = uuid::Uuid, Path, description = "Checkout ID")),
    responses(
        (status = 200, description = "Checkout detail", body = ApiResponse<Checkout>),
        (status = 404, description = "Checkout not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Checkout"
)]
pub async fn get_checkout(
    State(state): State<AppState>,
    CheckoutId(id): CheckoutId,
) -> AppResult<Json<ApiResponse<Checkout>>> {
    let resp = checkout_service::get_checkout(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/checkout/{id}/status",
    params(("id" = uuid::Uuid, Path, description = "Checkout ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated; a refund confirmation is sent when moving to Refund", body = ApiResponse<Checkout>),
        (status = 400, description = "Invalid status", body = ApiResponse<ErrorData>),
        (status = 404, description = "Checkout not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Checkout"
)]
pub async fn update_checkout_status(
    State(state): State<AppState>,
    CheckoutId(id): CheckoutId,
    ApiJson(payload): ApiJson<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<Checkout>>> {
    let resp = checkout_service::update_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/checkout/{id}",
    params(("id" = uuid::Uuid, Path, description = "Checkout ID")),
    responses(
        (status = 200, description = "Checkout permanently deleted", body = ApiResponse<Checkout>),
        (status = 404, description = "Checkout not found", body = ApiResponse<ErrorData>),
    ),
    tag = "Checkout"
)]
pub async fn delete_checkout(
    State(state): State<AppState>,
    CheckoutId(id): CheckoutId,
) -> AppResult<Json<ApiResponse<Checkout>>> {
    let resp = checkout_service::delete_checkout(&state, id).await?;
    Ok(Json(resp))
}
