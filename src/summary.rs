//! Financial summary over a list of checkouts.
//!
//! Every function here is pure: the result depends only on the arguments, and
//! nothing is cached between calls.

use std::collections::{BTreeMap, HashMap};

use chrono::{FixedOffset, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Checkout, CheckoutStatus};

/// Length of the product and customer rankings.
pub const TOP_N: usize = 5;

/// Statuses whose order totals count toward net revenue.
///
/// The default counts everything except `Refund` and `Cancelled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RevenuePolicy {
    pub counted: Vec<CheckoutStatus>,
}

impl Default for RevenuePolicy {
    fn default() -> Self {
        Self {
            counted: CheckoutStatus::ALL
                .into_iter()
                .filter(|s| !matches!(s, CheckoutStatus::Refund | CheckoutStatus::Cancelled))
                .collect(),
        }
    }
}

impl RevenuePolicy {
    pub fn new(counted: Vec<CheckoutStatus>) -> Self {
        Self { counted }
    }

    /// Only orders currently `Processing` count as net revenue.
    pub fn processing_only() -> Self {
        Self::new(vec![CheckoutStatus::Processing])
    }

    pub fn counts(&self, status: CheckoutStatus) -> bool {
        self.counted.contains(&status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusTotal {
    pub status: CheckoutStatus,
    pub value: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FinancialMetrics {
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub net_revenue: Decimal,
    /// Rounded to cents; zero when there are no orders.
    pub average_order_value: Decimal,
    /// One entry per status, in lifecycle order, zeros included.
    pub by_status: Vec<StatusTotal>,
}

/// Per-status subtotals of one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct StatusAmounts {
    pub pending: Decimal,
    pub processing: Decimal,
    pub shipped: Decimal,
    pub delivered: Decimal,
    pub cancelled: Decimal,
    pub refund: Decimal,
}

impl StatusAmounts {
    fn slot(&mut self, status: CheckoutStatus) -> &mut Decimal {
        match status {
            CheckoutStatus::Pending => &mut self.pending,
            CheckoutStatus::Processing => &mut self.processing,
            CheckoutStatus::Shipped => &mut self.shipped,
            CheckoutStatus::Delivered => &mut self.delivered,
            CheckoutStatus::Cancelled => &mut self.cancelled,
            CheckoutStatus::Refund => &mut self.refund,
        }
    }

    pub fn add(&mut self, status: CheckoutStatus, amount: Decimal) {
        let slot = self.slot(status);
        *slot = slot.saturating_add(amount);
    }

    pub fn get(&self, status: CheckoutStatus) -> Decimal {
        match status {
            CheckoutStatus::Pending => self.pending,
            CheckoutStatus::Processing => self.processing,
            CheckoutStatus::Shipped => self.shipped,
            CheckoutStatus::Delivered => self.delivered,
            CheckoutStatus::Cancelled => self.cancelled,
            CheckoutStatus::Refund => self.refund,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub total: Decimal,
    #[serde(flatten)]
    pub by_status: StatusAmounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductRevenue {
    pub product_id: Uuid,
    pub name: String,
    pub revenue: Decimal,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CustomerSpend {
    pub username: String,
    pub spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Summary {
    pub policy: RevenuePolicy,
    pub metrics: FinancialMetrics,
    /// Statuses with a non-zero total only.
    pub revenue_by_status: Vec<StatusTotal>,
    pub daily_revenue: Vec<DailyRevenue>,
    pub top_products: Vec<ProductRevenue>,
    pub top_customers: Vec<CustomerSpend>,
}

pub fn summarize(orders: &[Checkout], policy: &RevenuePolicy, viewer_offset: FixedOffset) -> Summary {
    Summary {
        policy: policy.clone(),
        metrics: financial_metrics(orders, policy),
        revenue_by_status: revenue_by_status(orders),
        daily_revenue: daily_revenue(orders, viewer_offset),
        top_products: top_products(orders, TOP_N),
        top_customers: top_customers(orders, TOP_N),
    }
}

pub fn financial_metrics(orders: &[Checkout], policy: &RevenuePolicy) -> FinancialMetrics {
    let total_orders = orders.len();
    let total_revenue = money_sum(orders.iter().map(|o| o.total_price));
    let net_revenue = money_sum(
        orders
            .iter()
            .filter(|o| policy.counts(o.status))
            .map(|o| o.total_price),
    );
    let average_order_value = if total_orders == 0 {
        Decimal::ZERO
    } else {
        (total_revenue / Decimal::from(total_orders))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };

    FinancialMetrics {
        total_orders,
        total_revenue,
        net_revenue,
        average_order_value,
        by_status: status_totals(orders),
    }
}

// Saturates at `Decimal::MAX` instead of panicking on overflow.
fn money_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn status_totals(orders: &[Checkout]) -> Vec<StatusTotal> {
    CheckoutStatus::ALL
        .into_iter()
        .map(|status| {
            let (value, count) = orders
                .iter()
                .filter(|o| o.status == status)
                .fold((Decimal::ZERO, 0), |(value, count), o| {
                    (value.saturating_add(o.total_price), count + 1)
                });
            StatusTotal {
                status,
                value,
                count,
            }
        })
        .collect()
}

pub fn revenue_by_status(orders: &[Checkout]) -> Vec<StatusTotal> {
    status_totals(orders)
        .into_iter()
        .filter(|t| !t.value.is_zero())
        .collect()
}

/// Buckets orders by the calendar date of their creation time as seen at
/// `viewer_offset`, oldest first.
pub fn daily_revenue(orders: &[Checkout], viewer_offset: FixedOffset) -> Vec<DailyRevenue> {
    let mut buckets: BTreeMap<NaiveDate, (Decimal, StatusAmounts)> = BTreeMap::new();
    for order in orders {
        let date = order.created_at.with_timezone(&viewer_offset).date_naive();
        let (total, by_status) = buckets.entry(date).or_default();
        *total = total.saturating_add(order.total_price);
        by_status.add(order.status, order.total_price);
    }

    buckets
        .into_iter()
        .map(|(date, (total, by_status))| DailyRevenue {
            date,
            total,
            by_status,
        })
        .collect()
}

/// Products ranked by `price * quantity` summed over all items, highest
/// first. Equal revenues keep first-seen order.
pub fn top_products(orders: &[Checkout], limit: usize) -> Vec<ProductRevenue> {
    let mut ranking: Vec<ProductRevenue> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for item in orders.iter().flat_map(|o| o.items.iter()) {
        let slot = *index.entry(item.product_id).or_insert_with(|| {
            ranking.push(ProductRevenue {
                product_id: item.product_id,
                name: item.product_name().unwrap_or("Unknown product").to_string(),
                revenue: Decimal::ZERO,
                quantity: 0,
            });
            ranking.len() - 1
        });
        let entry = &mut ranking[slot];
        entry.revenue = entry.revenue.saturating_add(item.subtotal());
        entry.quantity = entry.quantity.saturating_add(i64::from(item.quantity));
    }

    ranking.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranking.truncate(limit);
    ranking
}

/// Customers ranked by summed order totals. Orders without a resolvable
/// username are skipped.
pub fn top_customers(orders: &[Checkout], limit: usize) -> Vec<CustomerSpend> {
    let mut ranking: Vec<CustomerSpend> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for order in orders {
        let Some(username) = order.username().filter(|u| !u.is_empty()) else {
            continue;
        };
        let slot = *index.entry(username).or_insert_with(|| {
            ranking.push(CustomerSpend {
                username: username.to_string(),
                spent: Decimal::ZERO,
            });
            ranking.len() - 1
        });
        let entry = &mut ranking[slot];
        entry.spent = entry.spent.saturating_add(order.total_price);
    }

    ranking.sort_by(|a, b| b.spent.cmp(&a.spent));
    ranking.truncate(limit);
    ranking
}
