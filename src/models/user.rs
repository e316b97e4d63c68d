use crate::constants::{LoginField, ProfileField};
use crate::validation::{validate_name, validate_password, validate_phone_number};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use validator::Validate;

/// User represents a customer account
/// Maps to `users` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    pub email_id: String,
    #[serde(skip_serializing, default)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

/// New User profile (plaintext password, hashed before storage)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 3, max = 21), custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
    #[validate(email, length(max = 128))]
    pub email_id: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

impl User {
    pub async fn create(
        pool: &PgPool,
        new_user: &NewUser,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, phone_number, email_id, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, phone_number, email_id, password
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.phone_number)
        .bind(&new_user.email_id)
        .bind(password_hash)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, phone_number, email_id, password FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_login(
        pool: &PgPool,
        field: LoginField,
        value: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = match field {
            LoginField::PhoneNumber => {
                "SELECT id, name, phone_number, email_id, password FROM users
                 WHERE phone_number = $1"
            }
            LoginField::EmailId => {
                "SELECT id, name, phone_number, email_id, password FROM users WHERE email_id = $1"
            }
        };

        sqlx::query_as::<_, User>(query)
            .bind(value)
            .fetch_optional(pool)
            .await
    }

    /// Update a single profile column (password already hashed)
    pub async fn update_field(
        pool: &PgPool,
        id: i64,
        field: ProfileField,
        value: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = match field {
            ProfileField::Name => {
                "UPDATE users SET name = $1
                 WHERE id = $2 RETURNING id, name, phone_number, email_id, password"
            }
            ProfileField::PhoneNumber => {
                "UPDATE users SET phone_number = $1
                 WHERE id = $2 RETURNING id, name, phone_number, email_id, password"
            }
            ProfileField::EmailId => {
                "UPDATE users SET email_id = $1
                 WHERE id = $2 RETURNING id, name, phone_number, email_id, password"
            }
            ProfileField::Password => {
                "UPDATE users SET password = $1
                 WHERE id = $2 RETURNING id, name, phone_number, email_id, password"
            }
        };

        sqlx::query_as::<_, User>(query)
            .bind(value)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock the user row for the rest of the transaction.
    ///
    /// Cart and order writes for one user serialize on this lock. Returns
    /// false when the user does not exist.
    pub async fn lock(conn: &mut PgConnection, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map(|row| row.is_some())
    }

    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_validation() {
        let user = NewUser {
            name: "Muthu Kumar".to_string(),
            phone_number: "9876543210".to_string(),
            email_id: "muthu@example.com".to_string(),
            password: "Secret@123".to_string(),
        };
        assert!(user.validate().is_ok());

        let weak = NewUser {
            password: "password".to_string(),
            ..user
        };
        let errors = weak.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
