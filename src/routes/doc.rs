use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::checkout::{
        CheckoutItemInput, CheckoutList, CreateCheckoutRequest, ItemsPayload, UpdateStatusRequest,
    },
    error::ErrorData,
    models::{Checkout, CheckoutItem, CheckoutStatus, ProductRef, UserRef},
    response::{ApiResponse, Meta},
    routes::{checkout, health, params},
    summary::{
        CustomerSpend, DailyRevenue, FinancialMetrics, ProductRevenue, RevenuePolicy,
        StatusAmounts, StatusTotal, Summary,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        checkout::create_checkout,
        checkout::list_checkouts,
        checkout::list_user_checkouts,
        checkout::checkout_summary,
        checkout::get_checkout,
        checkout::update_checkout_status,
        checkout::delete_checkout,
    ),
    components(
        schemas(
            Checkout,
            CheckoutItem,
            CheckoutStatus,
            UserRef,
            ProductRef,
            CreateCheckoutRequest,
            ItemsPayload,
            CheckoutItemInput,
            UpdateStatusRequest,
            CheckoutList,
            Summary,
            FinancialMetrics,
            StatusTotal,
            StatusAmounts,
            DailyRevenue,
            ProductRevenue,
            CustomerSpend,
            RevenuePolicy,
            params::SortOrder,
            health::HealthData,
            ErrorData,
            Meta,
            ApiResponse<Checkout>,
            ApiResponse<CheckoutList>,
            ApiResponse<Summary>,
            ApiResponse<ErrorData>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Checkout", description = "Checkout lifecycle, listing and financial summary"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
