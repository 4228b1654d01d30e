use chrono::FixedOffset;

use crate::{
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    routes::params::SummaryQuery,
    state::AppState,
    store::CheckoutFilter,
    summary::{Summary, summarize},
};

// Real-world UTC offsets stay within ±14h.
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

pub async fn checkout_summary(
    state: &AppState,
    query: SummaryQuery,
) -> AppResult<ApiResponse<Summary>> {
    let offset = viewer_offset(query.tz_offset_minutes.unwrap_or(0))?;
    let checkouts = state.store.list(&CheckoutFilter::default()).await?;
    let summary = summarize(&checkouts, &state.revenue_policy, offset);

    Ok(ApiResponse::success(
        "Checkout summary",
        summary,
        Some(Meta::total(checkouts.len() as i64)),
    ))
}

fn viewer_offset(minutes: i32) -> AppResult<FixedOffset> {
    if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
        return Err(AppError::Validation(format!(
            "tz_offset_minutes must be within ±{MAX_OFFSET_MINUTES}"
        )));
    }
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| AppError::Validation("tz_offset_minutes is out of range".into()))
}
