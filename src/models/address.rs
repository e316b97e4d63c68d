use crate::constants::AddressType;
use crate::validation::{validate_name, validate_pincode};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use validator::Validate;

/// Delivery address belonging to a user
/// Maps to `address` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub house_number: String,
    pub street_name: String,
    pub area_name: String,
    pub city_name: String,
    pub pincode: String,
    pub address_type: AddressType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewAddress {
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[validate(length(min = 1, max = 10))]
    pub house_number: String,
    #[validate(length(min = 4, max = 21), custom(function = "validate_name"))]
    pub street_name: String,
    #[validate(length(min = 4, max = 21), custom(function = "validate_name"))]
    pub area_name: String,
    #[validate(length(min = 4, max = 21), custom(function = "validate_name"))]
    pub city_name: String,
    #[validate(custom(function = "validate_pincode"))]
    pub pincode: String,
    pub address_type: AddressType,
}

impl Address {
    pub async fn create(pool: &PgPool, new_address: &NewAddress) -> Result<Address, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO address
                (user_id, house_number, street_name, area_name, city_name, pincode, address_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, house_number, street_name, area_name, city_name, pincode,
                      address_type
            "#,
        )
        .bind(new_address.user_id)
        .bind(&new_address.house_number)
        .bind(&new_address.street_name)
        .bind(&new_address.area_name)
        .bind(&new_address.city_name)
        .bind(&new_address.pincode)
        .bind(new_address.address_type)
        .fetch_one(pool)
        .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Address>, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            r#"
            SELECT id, user_id, house_number, street_name, area_name, city_name, pincode,
                   address_type
            FROM address
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Whether the address exists and belongs to the user
    pub async fn belongs_to(
        conn: &mut PgConnection,
        address_id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM address WHERE id = $1 AND user_id = $2)",
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_one(conn)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_address_validation() {
        let address = NewAddress {
            user_id: 1,
            house_number: "12A".to_string(),
            street_name: "Gandhi Street".to_string(),
            area_name: "Adyar".to_string(),
            city_name: "Chennai".to_string(),
            pincode: "600020".to_string(),
            address_type: AddressType::Home,
        };
        assert!(address.validate().is_ok());

        let far = NewAddress {
            house_number: "12345678901".to_string(),
            pincode: "06002".to_string(),
            ..address
        };
        let errors = far.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("house_number"));
        assert!(fields.contains_key("pincode"));
    }
}
