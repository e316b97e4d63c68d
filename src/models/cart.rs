use crate::constants::CartStatus;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use validator::Validate;

/// Cart line as presented to the customer, joined with food and restaurant names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub food_id: i64,
    pub food_name: String,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub quantity: i32,
    pub amount: f64,
    pub status: CartStatus,
}

/// Raw `cart` row used by the order and cart rules
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CartLine {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub food_id: i64,
    pub quantity: i32,
    #[sqlx(rename = "total_amount")]
    pub amount: f64,
}

/// Request to put a food into a user's cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AddToCart {
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[validate(range(min = 1))]
    pub restaurant_id: i64,
    #[validate(range(min = 1))]
    pub food_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

const CART_ITEM_SELECT: &str = r#"
    SELECT c.id, c.user_id, f.id AS food_id, f.name AS food_name,
           r.id AS restaurant_id, r.name AS restaurant_name,
           c.quantity, c.total_amount AS amount, c.status
    FROM cart c
    JOIN food f ON f.id = c.food_id
    JOIN restaurant r ON r.id = c.restaurant_id
"#;

impl CartItem {
    /// Active cart of a user
    pub async fn active_for_user(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        sqlx::query_as::<_, CartItem>(&format!(
            "{CART_ITEM_SELECT} WHERE c.user_id = $1 AND c.status = $2 ORDER BY c.id"
        ))
        .bind(user_id)
        .bind(CartStatus::InCart)
        .fetch_all(pool)
        .await
    }

    pub async fn find(conn: &mut PgConnection, cart_id: i64) -> Result<CartItem, sqlx::Error> {
        sqlx::query_as::<_, CartItem>(&format!("{CART_ITEM_SELECT} WHERE c.id = $1"))
            .bind(cart_id)
            .fetch_one(conn)
            .await
    }
}

impl CartLine {
    /// Active lines of a user, locked until the transaction ends
    pub async fn lock_active(
        conn: &mut PgConnection,
        user_id: i64,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        sqlx::query_as::<_, CartLine>(
            r#"
            SELECT id, user_id, restaurant_id, food_id, quantity, total_amount
            FROM cart
            WHERE user_id = $1 AND status = $2
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(CartStatus::InCart)
        .fetch_all(conn)
        .await
    }

    pub async fn insert(
        conn: &mut PgConnection,
        request: &AddToCart,
        amount: f64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO cart (user_id, restaurant_id, food_id, quantity, total_amount, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(request.user_id)
        .bind(request.restaurant_id)
        .bind(request.food_id)
        .bind(request.quantity)
        .bind(amount)
        .bind(CartStatus::InCart)
        .fetch_one(conn)
        .await
    }

    pub async fn update_quantity(
        conn: &mut PgConnection,
        cart_id: i64,
        quantity: i32,
        amount: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE cart SET quantity = $1, total_amount = $2 WHERE id = $3")
            .bind(quantity)
            .bind(amount)
            .bind(cart_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Flip lines to `OrderPlaced`
    pub async fn mark_placed(
        conn: &mut PgConnection,
        cart_ids: &[i64],
    ) -> Result<u64, sqlx::Error> {
        sqlx::query("UPDATE cart SET status = $1 WHERE id = ANY($2) AND status = $3")
            .bind(CartStatus::OrderPlaced)
            .bind(cart_ids)
            .bind(CartStatus::InCart)
            .execute(conn)
            .await
            .map(|result| result.rows_affected())
    }

    pub async fn remove_active(pool: &PgPool, cart_id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query("DELETE FROM cart WHERE id = $1 AND status = $2")
            .bind(cart_id)
            .bind(CartStatus::InCart)
            .execute(pool)
            .await
            .map(|result| result.rows_affected() > 0)
    }

    pub async fn clear_active(pool: &PgPool, user_id: i64) -> Result<u64, sqlx::Error> {
        sqlx::query("DELETE FROM cart WHERE user_id = $1 AND status = $2")
            .bind(user_id)
            .bind(CartStatus::InCart)
            .execute(pool)
            .await
            .map(|result| result.rows_affected())
    }
}
