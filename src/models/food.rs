use crate::constants::{CartStatus, FoodType, MenuFilter};
use crate::validation::validate_name;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use validator::Validate;

/// Food represents a dish on a restaurant's menu card
/// Maps to `food` table, linked to its restaurant through `restaurant_food`
///
/// `quantity` is the inventory still available for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub rate: f64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub food_type: FoodType,
    pub quantity: i32,
}

/// New Food for creation (without generated fields)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewFood {
    #[validate(length(min = 3, max = 21), custom(function = "validate_name"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0))]
    pub rate: f64,
    #[serde(rename = "type")]
    pub food_type: FoodType,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Food row joined with its owning restaurant
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RestaurantFood {
    pub id: i64,
    pub name: String,
    pub rate: f64,
    #[sqlx(rename = "type")]
    pub food_type: FoodType,
    pub quantity: i32,
    pub restaurant_id: i64,
}

impl Food {
    /// Insert a food and map it to its restaurant inside an open transaction
    pub async fn insert_for_restaurant(
        conn: &mut PgConnection,
        restaurant_id: i64,
        new_food: &NewFood,
    ) -> Result<Food, sqlx::Error> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            INSERT INTO food (name, rate, type, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, rate, type, quantity
            "#,
        )
        .bind(&new_food.name)
        .bind(new_food.rate)
        .bind(new_food.food_type)
        .bind(new_food.quantity)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query("INSERT INTO restaurant_food (food_id, restaurant_id) VALUES ($1, $2)")
            .bind(food.id)
            .bind(restaurant_id)
            .execute(&mut *conn)
            .await?;

        Ok(food)
    }

    /// Available quantity of a food that is still on a menu
    pub async fn available_quantity(
        pool: &PgPool,
        food_id: i64,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM food WHERE id = $1 AND removed_at IS NULL",
        )
        .bind(food_id)
        .fetch_optional(pool)
        .await
    }

    /// Menu card of a restaurant filtered by food type
    pub async fn menu_card(
        pool: &PgPool,
        restaurant_id: i64,
        filter: MenuFilter,
    ) -> Result<Vec<Food>, sqlx::Error> {
        sqlx::query_as::<_, Food>(
            r#"
            SELECT f.id, f.name, f.rate, f.type, f.quantity
            FROM food f
            JOIN restaurant_food rf ON rf.food_id = f.id
            WHERE rf.restaurant_id = $1
              AND f.removed_at IS NULL
              AND f.type = ANY($2)
            ORDER BY f.id
            "#,
        )
        .bind(restaurant_id)
        .bind(filter.type_ids())
        .fetch_all(pool)
        .await
    }

    /// Find a food still on the menu, together with its restaurant
    pub async fn find_on_menu(
        conn: &mut PgConnection,
        food_id: i64,
    ) -> Result<Option<RestaurantFood>, sqlx::Error> {
        sqlx::query_as::<_, RestaurantFood>(
            r#"
            SELECT f.id, f.name, f.rate, f.type, f.quantity, rf.restaurant_id
            FROM food f
            JOIN restaurant_food rf ON rf.food_id = f.id
            WHERE f.id = $1 AND f.removed_at IS NULL
            "#,
        )
        .bind(food_id)
        .fetch_optional(conn)
        .await
    }

    /// Decrement inventory only when enough stock remains.
    ///
    /// Returns the remaining quantity, or `None` when the guard rejected the
    /// update (insufficient stock or food removed).
    pub async fn decrement_stock(
        conn: &mut PgConnection,
        food_id: i64,
        quantity: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE food
            SET quantity = quantity - $1
            WHERE id = $2 AND quantity >= $1 AND removed_at IS NULL
            RETURNING quantity
            "#,
        )
        .bind(quantity)
        .bind(food_id)
        .fetch_optional(conn)
        .await
    }

    /// Current stock of a food still on a menu, `None` once it has been removed
    pub async fn stock(conn: &mut PgConnection, food_id: i64) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM food WHERE id = $1 AND removed_at IS NULL",
        )
        .bind(food_id)
        .fetch_optional(conn)
        .await
    }

    /// Take a food off the menu and out of every active cart.
    ///
    /// The row is kept so placed orders still resolve their food name.
    pub async fn remove(pool: &PgPool, food_id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query(
            "UPDATE food SET removed_at = NOW() WHERE id = $1 AND removed_at IS NULL",
        )
        .bind(food_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if removed {
            sqlx::query("DELETE FROM cart WHERE food_id = $1 AND status = $2")
                .bind(food_id)
                .bind(CartStatus::InCart)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_food_validation() {
        let food = NewFood {
            name: "Veg Puff".to_string(),
            rate: 25.0,
            food_type: FoodType::Veg,
            quantity: 40,
        };
        assert!(food.validate().is_ok());

        let free = NewFood { rate: 0.0, ..food.clone() };
        assert!(free.validate().is_err());

        let sold_out = NewFood { quantity: 0, ..food };
        assert!(sold_out.validate().is_err());
    }

    #[test]
    fn test_food_type_serialized_as_type() {
        let json = r#"{"name":"Chicken Roll","rate":90.0,"type":"non_veg","quantity":5}"#;
        let food: NewFood = serde_json::from_str(json).unwrap();
        assert_eq!(food.food_type, FoodType::NonVeg);
    }
}
