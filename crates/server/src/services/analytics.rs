//! Seller analytics.
//!
//! Stats are computed over the orders that contain at least one of the
//! seller's products, and every revenue figure counts only the seller's own
//! line items within those orders, not the full order total.
//!
//! Each order lands in exactly one bucket, checked in this precedence:
//! delivered when every item is delivered (order-level status), shipped when
//! the order is shipped, cancelled when cancelled, otherwise pending. The
//! all-time totals (`total_revenue`, `total_items_sold`) intentionally
//! include cancelled orders.

use std::collections::{BTreeMap, HashSet};

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use novamart_core::{OrderStatus, ProductId};

use crate::models::{Order, OrderItem};

/// Order counts per status bucket.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct OrderCounts {
    pub total: u64,
    pub delivered: u64,
    pub shipped: u64,
    pub pending: u64,
    pub cancelled: u64,
}

/// Aggregated figures for one seller.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SellerStats {
    /// Revenue across all buckets, cancelled included.
    pub total_revenue: Decimal,
    pub delivered_revenue: Decimal,
    pub shipped_revenue: Decimal,
    pub pending_revenue: Decimal,
    /// Item quantity across all buckets, cancelled included.
    pub total_items_sold: u64,
    pub orders: OrderCounts,
}

/// One point of the monthly revenue series.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlyRevenue {
    /// Calendar month in `YYYY-MM` form.
    pub month: String,
    /// Seller revenue for that month, rounded to whole units.
    pub revenue: i64,
}

/// Sum of the seller's own line items within an order.
#[must_use]
pub fn seller_subtotal(order: &Order, seller_products: &HashSet<ProductId>) -> Decimal {
    order
        .items
        .iter()
        .filter(|item| seller_products.contains(&item.product_id))
        .map(OrderItem::subtotal)
        .sum()
}

/// Quantity of the seller's own items within an order.
#[must_use]
pub fn seller_item_count(order: &Order, seller_products: &HashSet<ProductId>) -> u64 {
    order
        .items
        .iter()
        .filter(|item| seller_products.contains(&item.product_id))
        .map(|item| u64::try_from(item.qty).unwrap_or(0))
        .sum()
}

/// Compute a seller's stats from the orders containing their products.
///
/// Orders with none of the seller's items contribute nothing, so callers may
/// pass a pre-filtered list or the full order set interchangeably.
#[must_use]
pub fn compute_stats(orders: &[Order], seller_products: &HashSet<ProductId>) -> SellerStats {
    let mut stats = SellerStats::default();

    for order in orders {
        if !order.contains_any_product(seller_products) {
            continue;
        }

        let subtotal = seller_subtotal(order, seller_products);

        stats.total_revenue += subtotal;
        stats.total_items_sold += seller_item_count(order, seller_products);
        stats.orders.total += 1;

        match order.status {
            OrderStatus::Delivered => {
                stats.delivered_revenue += subtotal;
                stats.orders.delivered += 1;
            }
            OrderStatus::Shipped => {
                stats.shipped_revenue += subtotal;
                stats.orders.shipped += 1;
            }
            OrderStatus::Cancelled => {
                stats.orders.cancelled += 1;
            }
            OrderStatus::Pending => {
                stats.pending_revenue += subtotal;
                stats.orders.pending += 1;
            }
        }
    }

    stats
}

/// Monthly seller revenue, ascending by calendar month.
///
/// Every order containing seller items contributes to its month regardless
/// of status, so the series sums to `total_revenue`.
#[must_use]
pub fn monthly_revenue(orders: &[Order], seller_products: &HashSet<ProductId>) -> Vec<MonthlyRevenue> {
    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();

    for order in orders {
        if !order.contains_any_product(seller_products) {
            continue;
        }

        let month = format!(
            "{:04}-{:02}",
            order.created_at.year(),
            order.created_at.month()
        );
        *buckets.entry(month).or_default() += seller_subtotal(order, seller_products);
    }

    buckets
        .into_iter()
        .map(|(month, revenue)| MonthlyRevenue {
            month,
            revenue: revenue.round().to_i64().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use novamart_core::{OrderId, UserId};

    use crate::models::ShippingAddress;

    fn item(product_id: i32, qty: i32, price: i64) -> OrderItem {
        OrderItem {
            product_id: ProductId::new(product_id),
            qty,
            price: Decimal::from(price),
            name: format!("Product {product_id}"),
            image: String::new(),
        }
    }

    fn order(status: OrderStatus, created_at: DateTime<Utc>, items: Vec<OrderItem>) -> Order {
        let total = items.iter().map(OrderItem::subtotal).sum();
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            items,
            address: ShippingAddress::default(),
            total,
            status,
            created_at,
            updated_at: created_at,
        }
    }

    fn at(year: i32, month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap()
    }

    fn seller() -> HashSet<ProductId> {
        [ProductId::new(1), ProductId::new(2)].into_iter().collect()
    }

    #[test]
    fn test_seller_subtotal_ignores_other_sellers_items() {
        // Items 1 and 2 are ours, item 9 belongs to someone else
        let order = order(
            OrderStatus::Pending,
            at(2026, 1),
            vec![item(1, 2, 100), item(2, 1, 50), item(9, 3, 1000)],
        );
        assert_eq!(seller_subtotal(&order, &seller()), Decimal::from(250));
        assert_eq!(seller_item_count(&order, &seller()), 3);
    }

    #[test]
    fn test_compute_stats_buckets_by_status() {
        let orders = vec![
            order(OrderStatus::Delivered, at(2026, 1), vec![item(1, 1, 100)]),
            order(OrderStatus::Shipped, at(2026, 1), vec![item(1, 2, 100)]),
            order(OrderStatus::Pending, at(2026, 2), vec![item(2, 1, 50)]),
            order(OrderStatus::Cancelled, at(2026, 2), vec![item(2, 4, 50)]),
        ];

        let stats = compute_stats(&orders, &seller());

        assert_eq!(stats.orders.total, 4);
        assert_eq!(stats.orders.delivered, 1);
        assert_eq!(stats.orders.shipped, 1);
        assert_eq!(stats.orders.pending, 1);
        assert_eq!(stats.orders.cancelled, 1);

        assert_eq!(stats.delivered_revenue, Decimal::from(100));
        assert_eq!(stats.shipped_revenue, Decimal::from(200));
        assert_eq!(stats.pending_revenue, Decimal::from(50));
        // Cancelled orders count toward the all-time totals
        assert_eq!(stats.total_revenue, Decimal::from(550));
        assert_eq!(stats.total_items_sold, 8);
    }

    #[test]
    fn test_compute_stats_skips_unrelated_orders() {
        let orders = vec![order(
            OrderStatus::Delivered,
            at(2026, 1),
            vec![item(9, 5, 100)],
        )];
        let stats = compute_stats(&orders, &seller());
        assert_eq!(stats, SellerStats::default());
    }

    #[test]
    fn test_monthly_revenue_sorted_and_includes_cancelled() {
        let orders = vec![
            order(OrderStatus::Delivered, at(2026, 3), vec![item(1, 1, 300)]),
            order(OrderStatus::Pending, at(2026, 1), vec![item(1, 1, 100)]),
            order(OrderStatus::Shipped, at(2026, 1), vec![item(2, 2, 25)]),
            order(OrderStatus::Cancelled, at(2026, 2), vec![item(1, 1, 999)]),
        ];

        let series = monthly_revenue(&orders, &seller());

        // Cancelled orders land in their month like any other
        assert_eq!(
            series,
            vec![
                MonthlyRevenue {
                    month: "2026-01".to_string(),
                    revenue: 150,
                },
                MonthlyRevenue {
                    month: "2026-02".to_string(),
                    revenue: 999,
                },
                MonthlyRevenue {
                    month: "2026-03".to_string(),
                    revenue: 300,
                },
            ]
        );
    }

    #[test]
    fn test_monthly_revenue_rounds_to_whole_units() {
        let orders = vec![order(
            OrderStatus::Delivered,
            at(2026, 5),
            vec![item(1, 1, 0)],
        )];
        // Replace the zero-price item with a fractional one
        let mut orders = orders;
        orders[0].items[0].price = Decimal::new(9950, 2); // 99.50
        let series = monthly_revenue(&orders, &seller());
        assert_eq!(series[0].revenue, 100);
    }
}
