use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use checkout_service::{
    models::{Checkout, CheckoutItem, CheckoutStatus, ProductRef, UserRef},
    summary::{
        RevenuePolicy, daily_revenue, financial_metrics, revenue_by_status, summarize,
        top_customers, top_products,
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn order(total: Decimal, status: CheckoutStatus) -> Checkout {
    let at = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
    Checkout {
        id: Uuid::new_v4(),
        user_id: None,
        user: None,
        address: String::new(),
        phone_number: String::new(),
        email: "someone@example.com".into(),
        items: Vec::new(),
        total_price: total,
        status,
        receipt: None,
        created_at: at,
        updated_at: at,
    }
}

fn at(order: Checkout, created_at: DateTime<Utc>) -> Checkout {
    Checkout { created_at, ..order }
}

fn by(order: Checkout, username: &str) -> Checkout {
    let id = Uuid::new_v4();
    Checkout {
        user_id: Some(id),
        user: Some(UserRef {
            id,
            username: username.into(),
            email: format!("{username}@example.com"),
        }),
        ..order
    }
}

fn line(product: &ProductRef, quantity: i32, price: Decimal) -> CheckoutItem {
    CheckoutItem {
        product_id: product.id,
        product: Some(product.clone()),
        quantity,
        price,
    }
}

fn product(name: &str) -> ProductRef {
    ProductRef {
        id: Uuid::new_v4(),
        name: name.into(),
        price: dec!(1),
    }
}

#[test]
fn metrics_for_mixed_statuses() {
    let orders = vec![
        order(dec!(10), CheckoutStatus::Processing),
        order(dec!(20), CheckoutStatus::Cancelled),
        order(dec!(5), CheckoutStatus::Processing),
    ];

    let metrics = financial_metrics(&orders, &RevenuePolicy::default());

    assert_eq!(metrics.total_orders, 3);
    assert_eq!(metrics.total_revenue, dec!(35));
    assert_eq!(metrics.net_revenue, dec!(15));
    assert_eq!(metrics.average_order_value, dec!(11.67));

    let breakdown: Vec<(CheckoutStatus, Decimal, usize)> = revenue_by_status(&orders)
        .into_iter()
        .map(|t| (t.status, t.value, t.count))
        .collect();
    assert_eq!(
        breakdown,
        vec![
            (CheckoutStatus::Processing, dec!(15), 2),
            (CheckoutStatus::Cancelled, dec!(20), 1),
        ]
    );
    assert_eq!(metrics.by_status.len(), 6);
}

#[test]
fn net_revenue_follows_the_policy() {
    let orders = vec![
        order(dec!(10), CheckoutStatus::Processing),
        order(dec!(7), CheckoutStatus::Delivered),
        order(dec!(3), CheckoutStatus::Refund),
        order(dec!(2), CheckoutStatus::Pending),
    ];

    let default = financial_metrics(&orders, &RevenuePolicy::default());
    let processing = financial_metrics(&orders, &RevenuePolicy::processing_only());

    assert_eq!(default.net_revenue, dec!(19));
    assert_eq!(processing.net_revenue, dec!(10));
}

#[test]
fn empty_input_yields_zeros() {
    let summary = summarize(&[], &RevenuePolicy::default(), FixedOffset::east_opt(0).unwrap());

    assert_eq!(summary.metrics.total_orders, 0);
    assert_eq!(summary.metrics.total_revenue, Decimal::ZERO);
    assert_eq!(summary.metrics.net_revenue, Decimal::ZERO);
    assert_eq!(summary.metrics.average_order_value, Decimal::ZERO);
    assert!(summary.revenue_by_status.is_empty());
    assert!(summary.daily_revenue.is_empty());
    assert!(summary.top_products.is_empty());
    assert!(summary.top_customers.is_empty());
}

#[test]
fn daily_buckets_are_sorted_and_split_by_status() {
    let day2 = Utc.with_ymd_and_hms(2025, 3, 11, 9, 0, 0).unwrap();
    let day1 = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let orders = vec![
        at(order(dec!(4), CheckoutStatus::Shipped), day2),
        at(order(dec!(6), CheckoutStatus::Refund), day1),
        at(order(dec!(1), CheckoutStatus::Shipped), day1),
    ];

    let days = daily_revenue(&orders, FixedOffset::east_opt(0).unwrap());

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    assert_eq!(days[0].total, dec!(7));
    assert_eq!(days[0].by_status.refund, dec!(6));
    assert_eq!(days[0].by_status.get(CheckoutStatus::Shipped), dec!(1));
    assert_eq!(days[1].total, dec!(4));
}

#[test]
fn daily_buckets_use_the_viewer_calendar() {
    // 23:30 UTC is already the next day at UTC+07:00.
    let late = Utc.with_ymd_and_hms(2025, 3, 10, 23, 30, 0).unwrap();
    let orders = vec![at(order(dec!(9), CheckoutStatus::Pending), late)];

    let utc = daily_revenue(&orders, FixedOffset::east_opt(0).unwrap());
    let bangkok = daily_revenue(&orders, FixedOffset::east_opt(7 * 3600).unwrap());

    assert_eq!(utc[0].date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    assert_eq!(bangkok[0].date, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
}

#[test]
fn top_products_truncate_to_five_in_descending_revenue() {
    let products: Vec<ProductRef> = (1..=7).map(|n| product(&format!("P{n}"))).collect();
    let mut o = order(dec!(0), CheckoutStatus::Delivered);
    o.items = products
        .iter()
        .enumerate()
        .map(|(i, p)| line(p, 1, Decimal::from(i as i64 + 1)))
        .collect();
    // P7 appears twice: 7 + 7 * 2
    o.items.push(line(&products[6], 2, dec!(7)));

    let top = top_products(&[o], 5);

    let names: Vec<&str> = top.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["P7", "P6", "P5", "P4", "P3"]);
    assert_eq!(top[0].revenue, dec!(21));
    assert_eq!(top[0].quantity, 3);
}

#[test]
fn top_products_keep_first_seen_order_on_ties() {
    let a = product("A");
    let b = product("B");
    let mut first = order(dec!(0), CheckoutStatus::Pending);
    first.items = vec![line(&b, 1, dec!(5))];
    let mut second = order(dec!(0), CheckoutStatus::Pending);
    second.items = vec![line(&a, 1, dec!(5))];

    let top = top_products(&[first, second], 5);

    assert_eq!(top[0].name, "B");
    assert_eq!(top[1].name, "A");
}

#[test]
fn top_customers_skip_guests_and_rank_by_spend() {
    let orders = vec![
        by(order(dec!(10), CheckoutStatus::Delivered), "ana"),
        order(dec!(500), CheckoutStatus::Delivered),
        by(order(dec!(30), CheckoutStatus::Refund), "ben"),
        by(order(dec!(25), CheckoutStatus::Pending), "ana"),
    ];

    let top = top_customers(&orders, 5);

    let ranked: Vec<(&str, Decimal)> = top.iter().map(|c| (c.username.as_str(), c.spent)).collect();
    assert_eq!(ranked, vec![("ana", dec!(35)), ("ben", dec!(30))]);
}

#[test]
fn summarize_is_repeatable() {
    let orders = vec![
        by(order(dec!(12.5), CheckoutStatus::Shipped), "cy"),
        order(dec!(3), CheckoutStatus::Cancelled),
    ];
    let offset = FixedOffset::east_opt(-5 * 3600).unwrap();

    let first = summarize(&orders, &RevenuePolicy::default(), offset);
    let second = summarize(&orders, &RevenuePolicy::default(), offset);

    assert_eq!(first, second);
}

#[test]
fn aggregation_saturates_instead_of_overflowing() {
    let coat = product("Coat");
    let huge = Checkout {
        items: vec![line(&coat, i32::MAX, Decimal::MAX)],
        ..by(order(Decimal::MAX, CheckoutStatus::Processing), "dee")
    };
    let orders = vec![huge.clone(), huge];

    let summary = summarize(&orders, &RevenuePolicy::default(), FixedOffset::east_opt(0).unwrap());

    assert_eq!(summary.metrics.total_revenue, Decimal::MAX);
    assert_eq!(summary.metrics.net_revenue, Decimal::MAX);
    assert_eq!(summary.daily_revenue[0].total, Decimal::MAX);
    assert_eq!(summary.top_products[0].revenue, Decimal::MAX);
    assert_eq!(summary.top_products[0].quantity, 2 * i64::from(i32::MAX));
    assert_eq!(summary.top_customers[0].spent, Decimal::MAX);
}
