use super::profile_value;
use crate::constants::{LoginField, ProfileField};
use crate::error::{SwiggyError, SwiggyResult};
use crate::logging::log_database_operation;
use crate::models::{NewUser, User};
use crate::password::{hash_password, verify_password};
use crate::store::UserStore;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Customer accounts
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create_profile(&self, new_user: &NewUser) -> SwiggyResult<User> {
        new_user.validate()?;
        let password_hash = hash_password(&new_user.password)?;

        let user = self.store.create_user(new_user, &password_hash).await?;
        log_database_operation("create_profile", Some("users"), Some(user.id), "created", None);
        Ok(user)
    }

    pub async fn login(
        &self,
        field: LoginField,
        value: &str,
        password: &str,
    ) -> SwiggyResult<User> {
        match self.store.user_by_login(field, value).await? {
            Some(user) if verify_password(password, &user.password_hash) => {
                info!(user_id = user.id, "User logged in");
                Ok(user)
            }
            _ => {
                warn!(field = ?field, "User login rejected");
                Err(SwiggyError::AuthenticationFailed)
            }
        }
    }

    pub async fn get_by_id(&self, id: i64) -> SwiggyResult<User> {
        self.store
            .user_by_id(id)
            .await?
            .ok_or_else(|| SwiggyError::not_found("user", id))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        field: ProfileField,
        value: &str,
    ) -> SwiggyResult<User> {
        let stored_value = profile_value(field, value)?;

        let user = self
            .store
            .update_user_field(user_id, field, &stored_value)
            .await?
            .ok_or_else(|| SwiggyError::not_found("user", user_id))?;
        log_database_operation(
            "update_profile",
            Some("users"),
            Some(user_id),
            "updated",
            Some(field.as_str()),
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()))
    }

    fn new_user() -> NewUser {
        NewUser {
            name: "Karthik".to_string(),
            phone_number: "919876543210".to_string(),
            email_id: "karthik@example.com".to_string(),
            password: "Karthik@12".to_string(),
        }
    }

    #[tokio::test]
    async fn test_profile_lifecycle() {
        let service = service();
        let user = service.create_profile(&new_user()).await.unwrap();
        assert_eq!(service.get_by_id(user.id).await.unwrap(), user);

        let updated = service
            .update_profile(user.id, ProfileField::Name, "Karthik Raja")
            .await
            .unwrap();
        assert_eq!(updated.name, "Karthik Raja");

        let logged_in = service
            .login(LoginField::EmailId, "karthik@example.com", "Karthik@12")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let service = service();
        service.create_profile(&new_user()).await.unwrap();
        let err = service
            .login(LoginField::PhoneNumber, "919876543210", "Karthik@13")
            .await
            .unwrap_err();
        assert_eq!(err, SwiggyError::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let service = service();
        service.create_profile(&new_user()).await.unwrap();
        let other = service
            .create_profile(&NewUser {
                phone_number: "9123456789".to_string(),
                email_id: "meena@example.com".to_string(),
                name: "Meena".to_string(),
                password: "Meena@1234".to_string(),
            })
            .await
            .unwrap();

        let err = service
            .update_profile(other.id, ProfileField::EmailId, "karthik@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, SwiggyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found_even_when_value_taken() {
        let service = service();
        let existing = service.create_profile(&new_user()).await.unwrap();

        let err = service
            .update_profile(9_999, ProfileField::PhoneNumber, &existing.phone_number)
            .await
            .unwrap_err();
        assert_eq!(err, SwiggyError::not_found("user", 9_999));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        assert_eq!(
            service().get_by_id(12).await.unwrap_err(),
            SwiggyError::not_found("user", 12)
        );
    }
}
