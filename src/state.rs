use std::sync::Arc;

use crate::{notify::NotificationSender, store::CheckoutStore, summary::RevenuePolicy};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CheckoutStore>,
    pub notifier: Arc<dyn NotificationSender>,
    pub revenue_policy: RevenuePolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn CheckoutStore>, notifier: Arc<dyn NotificationSender>) -> Self {
        Self {
            store,
            notifier,
            revenue_policy: RevenuePolicy::default(),
        }
    }

    pub fn with_revenue_policy(mut self, policy: RevenuePolicy) -> Self {
        self.revenue_policy = policy;
        self
    }
}
