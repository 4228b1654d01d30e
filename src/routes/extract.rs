//! Extractors whose rejections are `AppError`s, so malformed requests get the
//! same JSON error body as every other failure.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    error::AppError,
    services::checkout_service::{CHECKOUT_NOT_FOUND, NO_USER_CHECKOUTS},
};

/// JSON body; any rejection is a validation error.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string; any rejection is a validation error.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// `{id}` of a checkout. Ids are opaque: one that is not a UUID matches no
/// checkout.
pub struct CheckoutId(pub Uuid);

impl<S> FromRequestParts<S> for CheckoutId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        path_uuid(parts, state, CHECKOUT_NOT_FOUND).await.map(Self)
    }
}

/// `{user_id}` of a checkout owner.
pub struct OwnerId(pub Uuid);

impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        path_uuid(parts, state, NO_USER_CHECKOUTS).await.map(Self)
    }
}

async fn path_uuid<S>(parts: &mut Parts, state: &S, missing: &'static str) -> Result<Uuid, AppError>
where
    S: Send + Sync,
{
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
        .await
        .map_err(|_| AppError::NotFound(missing))?;
    Uuid::parse_str(&raw).map_err(|_| AppError::NotFound(missing))
}
