use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

/// Placed order line, one per consumed cart line
///
/// Lines placed together share the same `reference`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderDetail {
    pub order_id: i64,
    pub reference: Uuid,
    pub cart_id: i64,
    pub user_id: i64,
    pub food_id: i64,
    pub food_name: String,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub quantity: i32,
    pub amount: f64,
    pub address_id: i64,
    pub placed_at: DateTime<Utc>,
}

/// Request to turn cart lines into orders.
///
/// An empty `cart_ids` orders the whole active cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlaceOrder {
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[validate(range(min = 1))]
    pub address_id: i64,
    #[serde(default)]
    pub cart_ids: Vec<i64>,
}

const ORDER_DETAIL_SELECT: &str = r#"
    SELECT o.id AS order_id, o.reference, c.id AS cart_id, o.user_id,
           f.id AS food_id, f.name AS food_name,
           r.id AS restaurant_id, r.name AS restaurant_name,
           c.quantity, c.total_amount AS amount, o.address_id, o.placed_at
    FROM orders o
    JOIN cart c ON c.id = o.cart_id
    JOIN food f ON f.id = c.food_id
    JOIN restaurant r ON r.id = c.restaurant_id
"#;

impl OrderDetail {
    /// Insert the order row for one cart line
    pub async fn insert(
        conn: &mut PgConnection,
        reference: Uuid,
        user_id: i64,
        cart_id: i64,
        address_id: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO orders (reference, user_id, cart_id, address_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(reference)
        .bind(user_id)
        .bind(cart_id)
        .bind(address_id)
        .fetch_one(conn)
        .await
    }

    pub async fn list_by_reference(
        conn: &mut PgConnection,
        reference: Uuid,
    ) -> Result<Vec<OrderDetail>, sqlx::Error> {
        sqlx::query_as::<_, OrderDetail>(&format!(
            "{ORDER_DETAIL_SELECT} WHERE o.reference = $1 ORDER BY o.id"
        ))
        .bind(reference)
        .fetch_all(conn)
        .await
    }

    /// Placed orders of a user, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<OrderDetail>, sqlx::Error> {
        sqlx::query_as::<_, OrderDetail>(&format!(
            "{ORDER_DETAIL_SELECT} WHERE o.user_id = $1 ORDER BY o.placed_at DESC, o.id DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
