use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    dto::checkout::{
        CheckoutItemInput, CheckoutList, CreateCheckoutRequest, ItemsPayload, UpdateStatusRequest,
    },
    error::{AppError, AppResult},
    models::{Checkout, CheckoutStatus, NewCheckout, NewCheckoutItem},
    response::{ApiResponse, Meta},
    routes::params::CheckoutListQuery,
    state::AppState,
    store::CheckoutFilter,
};

pub const CHECKOUT_NOT_FOUND: &str = "Checkout not found";
pub const NO_USER_CHECKOUTS: &str = "No checkouts found for this user";

// Money columns are NUMERIC(12, 2).
const MONEY_SCALE: u32 = 2;
const MONEY_MAX_CENTS: i64 = 999_999_999_999;

pub async fn create_checkout(
    state: &AppState,
    payload: CreateCheckoutRequest,
) -> AppResult<ApiResponse<Checkout>> {
    let new = validate_new_checkout(payload)?;
    let checkout = state.store.create_and_clear_cart(new).await?;

    tracing::info!(
        checkout_id = %checkout.id,
        user_id = ?checkout.user_id,
        items = checkout.items.len(),
        total = %checkout.total_price,
        "checkout created"
    );

    Ok(ApiResponse::success(
        "Checkout created successfully",
        checkout,
        Some(Meta::empty()),
    ))
}

pub async fn list_checkouts(
    state: &AppState,
    query: CheckoutListQuery,
) -> AppResult<ApiResponse<CheckoutList>> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<CheckoutStatus>)
        .transpose()?;
    let filter = CheckoutFilter {
        user_id: None,
        status,
        sort_order: query.sort_order.unwrap_or_default(),
    };

    let mut checkouts = state.store.list(&filter).await?;
    if let Some(term) = query.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let term = term.to_lowercase();
        checkouts.retain(|c| matches_search(c, &term));
    }

    let total = checkouts.len() as i64;
    let pagination = query.pagination();
    let meta = if pagination.is_requested() {
        let (page, per_page, offset) = pagination.normalize();
        checkouts = checkouts
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(per_page as usize)
            .collect();
        Meta::new(page, per_page, total)
    } else {
        Meta::total(total)
    };

    Ok(ApiResponse::success(
        "Checkouts",
        CheckoutList { items: checkouts },
        Some(meta),
    ))
}

pub async fn list_user_checkouts(
    state: &AppState,
    user_id: Uuid,
) -> AppResult<ApiResponse<CheckoutList>> {
    let checkouts = state.store.list(&CheckoutFilter::for_user(user_id)).await?;
    if checkouts.is_empty() {
        return Err(AppError::NotFound(NO_USER_CHECKOUTS));
    }

    let meta = Meta::total(checkouts.len() as i64);
    Ok(ApiResponse::success(
        "Checkouts",
        CheckoutList { items: checkouts },
        Some(meta),
    ))
}

pub async fn get_checkout(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Checkout>> {
    let checkout = match state.store.find(id).await? {
        Some(c) => c,
        None => return Err(AppError::NotFound(CHECKOUT_NOT_FOUND)),
    };

    Ok(ApiResponse::success("Checkout found", checkout, Some(Meta::empty())))
}

/// Apply `payload.status` to the checkout regardless of its current status.
///
/// Moving to `Refund` sends a refund confirmation before returning. A failed
/// send is logged and does not affect the result.
pub async fn update_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateStatusRequest,
) -> AppResult<ApiResponse<Checkout>> {
    let status: CheckoutStatus = payload.status.parse()?;

    let checkout = match state.store.update_status(id, status).await? {
        Some(c) => c,
        None => return Err(AppError::NotFound(CHECKOUT_NOT_FOUND)),
    };
    tracing::info!(checkout_id = %checkout.id, %status, "checkout status updated");

    if status == CheckoutStatus::Refund {
        match state.notifier.send_refund_confirmation(&checkout).await {
            Ok(()) => tracing::info!(checkout_id = %checkout.id, to = %checkout.email, "refund confirmation sent"),
            Err(err) => tracing::warn!(
                checkout_id = %checkout.id,
                to = %checkout.email,
                error = %err,
                "refund confirmation failed"
            ),
        }
    }

    Ok(ApiResponse::success(
        "Checkout status updated successfully",
        checkout,
        Some(Meta::empty()),
    ))
}

pub async fn delete_checkout(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Checkout>> {
    let checkout = match state.store.delete(id).await? {
        Some(c) => c,
        None => return Err(AppError::NotFound(CHECKOUT_NOT_FOUND)),
    };
    tracing::info!(checkout_id = %checkout.id, "checkout deleted");

    Ok(ApiResponse::success(
        "Checkout deleted successfully",
        checkout,
        Some(Meta::empty()),
    ))
}

fn validate_new_checkout(payload: CreateCheckoutRequest) -> AppResult<NewCheckout> {
    let email = payload
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("email is required".into()))?;

    let total_price = payload
        .total_price
        .ok_or_else(|| AppError::Validation("total_price is required".into()))?;
    if total_price.is_sign_negative() {
        return Err(AppError::Validation("total_price must not be negative".into()));
    }
    check_money("total_price", total_price)?;

    let items = match payload.items {
        Some(items) => parse_items(items)?,
        None => return Err(AppError::Validation("items are required".into())),
    };

    Ok(NewCheckout {
        user_id: payload.user_id,
        address: payload.address,
        phone_number: payload.phone_number,
        email,
        items,
        total_price,
        receipt: payload.receipt.filter(|r| !r.is_empty()),
    })
}

fn parse_items(payload: ItemsPayload) -> AppResult<Vec<NewCheckoutItem>> {
    let raw: Vec<Value> = match payload {
        ItemsPayload::Encoded(encoded) => serde_json::from_str(&encoded)
            .map_err(|e| AppError::Validation(format!("items must be a JSON array: {e}")))?,
        ItemsPayload::List(list) => list,
    };
    if raw.is_empty() {
        return Err(AppError::Validation("items must not be empty".into()));
    }

    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            let input: CheckoutItemInput = serde_json::from_value(value)
                .map_err(|e| AppError::Validation(format!("item {index}: {e}")))?;
            if input.quantity <= 0 {
                return Err(AppError::Validation(format!(
                    "item {index}: quantity must be greater than 0"
                )));
            }
            if input.price < Decimal::ZERO {
                return Err(AppError::Validation(format!(
                    "item {index}: price must not be negative"
                )));
            }
            check_money(&format!("item {index}: price"), input.price)?;
            Ok(NewCheckoutItem {
                product_id: input.product_id,
                quantity: input.quantity,
                price: input.price,
            })
        })
        .collect()
}

/// Reject amounts the store cannot hold exactly: more than two decimal
/// places, or above 9,999,999,999.99.
fn check_money(field: &str, amount: Decimal) -> AppResult<()> {
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(AppError::Validation(format!(
            "{field} must have at most {MONEY_SCALE} decimal places"
        )));
    }
    if amount > Decimal::new(MONEY_MAX_CENTS, MONEY_SCALE) {
        return Err(AppError::Validation(format!(
            "{field} must not exceed {}",
            Decimal::new(MONEY_MAX_CENTS, MONEY_SCALE)
        )));
    }
    Ok(())
}

fn matches_search(checkout: &Checkout, term: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(term);
    checkout.username().is_some_and(contains)
        || contains(&checkout.email)
        || contains(&checkout.phone_number)
        || contains(checkout.status.as_str())
}
