use crate::constants::{LoginField, ProfileField};
use crate::validation::{validate_name, validate_password, validate_phone_number};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

/// Restaurant represents a partner kitchen listed in the catalog
/// Maps to `restaurant` table
///
/// Restaurants loaded by the catalog seeder only carry a name; contact details
/// and credentials are filled in when the restaurant creates its profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub phone_number: Option<String>,
    pub email_id: Option<String>,
    #[serde(skip_serializing, default)]
    #[sqlx(rename = "password")]
    pub password_hash: Option<String>,
}

/// New Restaurant profile (plaintext password, hashed before storage)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRestaurant {
    #[validate(length(min = 3, max = 21), custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
    #[validate(email, length(max = 128))]
    pub email_id: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

const RESTAURANT_COLUMNS: &str = "id, name, phone_number, email_id, password";

impl Restaurant {
    /// Create a restaurant profile with an already hashed password
    pub async fn create(
        pool: &PgPool,
        new_restaurant: &NewRestaurant,
        password_hash: &str,
    ) -> Result<Restaurant, sqlx::Error> {
        sqlx::query_as::<_, Restaurant>(
            r#"
            INSERT INTO restaurant (name, phone_number, email_id, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, phone_number, email_id, password
            "#,
        )
        .bind(&new_restaurant.name)
        .bind(&new_restaurant.phone_number)
        .bind(&new_restaurant.email_id)
        .bind(password_hash)
        .fetch_one(pool)
        .await
    }

    /// Insert name-only restaurants in a single transaction
    pub async fn create_named_batch(
        pool: &PgPool,
        names: &[String],
    ) -> Result<Vec<Restaurant>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut restaurants = Vec::with_capacity(names.len());

        for name in names {
            let restaurant = sqlx::query_as::<_, Restaurant>(
                r#"
                INSERT INTO restaurant (name)
                VALUES ($1)
                RETURNING id, name, phone_number, email_id, password
                "#,
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;
            restaurants.push(restaurant);
        }

        tx.commit().await?;
        Ok(restaurants)
    }

    /// Find a restaurant by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Restaurant>, sqlx::Error> {
        sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurant WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Find a restaurant by its login identifier
    pub async fn find_by_login(
        pool: &PgPool,
        field: LoginField,
        value: &str,
    ) -> Result<Option<Restaurant>, sqlx::Error> {
        let query = match field {
            LoginField::PhoneNumber => {
                "SELECT id, name, phone_number, email_id, password FROM restaurant
                 WHERE phone_number = $1"
            }
            LoginField::EmailId => {
                "SELECT id, name, phone_number, email_id, password FROM restaurant
                 WHERE email_id = $1"
            }
        };

        sqlx::query_as::<_, Restaurant>(query)
            .bind(value)
            .fetch_optional(pool)
            .await
    }

    /// List all restaurants
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Restaurant>, sqlx::Error> {
        sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurant ORDER BY id"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restaurant")
            .fetch_one(pool)
            .await
    }

    /// Update a single profile column. `value` must already be hashed when
    /// the field is the password.
    pub async fn update_field(
        pool: &PgPool,
        id: i64,
        field: ProfileField,
        value: &str,
    ) -> Result<Option<Restaurant>, sqlx::Error> {
        let query = match field {
            ProfileField::Name => {
                "UPDATE restaurant SET name = $1
                 WHERE id = $2 RETURNING id, name, phone_number, email_id, password"
            }
            ProfileField::PhoneNumber => {
                "UPDATE restaurant SET phone_number = $1
                 WHERE id = $2 RETURNING id, name, phone_number, email_id, password"
            }
            ProfileField::EmailId => {
                "UPDATE restaurant SET email_id = $1
                 WHERE id = $2 RETURNING id, name, phone_number, email_id, password"
            }
            ProfileField::Password => {
                "UPDATE restaurant SET password = $1
                 WHERE id = $2 RETURNING id, name, phone_number, email_id, password"
            }
        };

        sqlx::query_as::<_, Restaurant>(query)
            .bind(value)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check restaurant existence inside an open transaction
    pub async fn exists(conn: &mut sqlx::PgConnection, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM restaurant WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> NewRestaurant {
        NewRestaurant {
            name: "Adyar Bakery".to_string(),
            phone_number: "9876543210".to_string(),
            email_id: "adyar@bakery.com".to_string(),
            password: "Secret@123".to_string(),
        }
    }

    #[test]
    fn test_new_restaurant_validation() {
        assert!(profile().validate().is_ok());

        let mut bad = profile();
        bad.name = "A1".to_string();
        bad.email_id = "not-an-email".to_string();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email_id"));
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let restaurant = Restaurant {
            id: 1,
            name: "Adyar Bakery".to_string(),
            phone_number: None,
            email_id: None,
            password_hash: Some("$argon2id$secret".to_string()),
        };
        let json = serde_json::to_value(&restaurant).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["name"], "Adyar Bakery");
    }
}
