use super::profile_value;
use crate::constants::{LoginField, MenuFilter, ProfileField};
use crate::error::{SwiggyError, SwiggyResult};
use crate::logging::log_database_operation;
use crate::models::{Food, NewFood, NewRestaurant, Restaurant};
use crate::password::{hash_password, verify_password};
use crate::store::RestaurantStore;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

/// Restaurant profiles and their menu cards
#[derive(Clone)]
pub struct RestaurantService {
    store: Arc<dyn RestaurantStore>,
}

impl RestaurantService {
    pub fn new(store: Arc<dyn RestaurantStore>) -> Self {
        Self { store }
    }

    pub async fn create_profile(&self, new_restaurant: &NewRestaurant) -> SwiggyResult<Restaurant> {
        new_restaurant.validate()?;
        let password_hash = hash_password(&new_restaurant.password)?;

        let restaurant = self
            .store
            .create_restaurant(new_restaurant, &password_hash)
            .await?;
        log_database_operation(
            "create_profile",
            Some("restaurant"),
            Some(restaurant.id),
            "created",
            None,
        );
        Ok(restaurant)
    }

    /// Unknown identifiers and wrong passwords fail the same way
    pub async fn login(
        &self,
        field: LoginField,
        value: &str,
        password: &str,
    ) -> SwiggyResult<Restaurant> {
        let restaurant = self.store.restaurant_by_login(field, value).await?;

        match restaurant {
            Some(restaurant)
                if restaurant
                    .password_hash
                    .as_deref()
                    .is_some_and(|hash| verify_password(password, hash)) =>
            {
                info!(restaurant_id = restaurant.id, "Restaurant logged in");
                Ok(restaurant)
            }
            _ => {
                warn!(field = ?field, "Restaurant login rejected");
                Err(SwiggyError::AuthenticationFailed)
            }
        }
    }

    pub async fn get_by_id(&self, id: i64) -> SwiggyResult<Restaurant> {
        self.store
            .restaurant_by_id(id)
            .await?
            .ok_or_else(|| SwiggyError::not_found("restaurant", id))
    }

    pub async fn list(&self) -> SwiggyResult<Vec<Restaurant>> {
        self.store.list_restaurants().await
    }

    pub async fn count(&self) -> SwiggyResult<i64> {
        self.store.count_restaurants().await
    }

    /// Bulk insert of name-only restaurants
    pub async fn load_restaurant_list(&self, names: &[String]) -> SwiggyResult<Vec<Restaurant>> {
        if let Some(blank) = names.iter().position(|name| name.trim().is_empty()) {
            return Err(SwiggyError::Validation(format!(
                "names[{blank}]: must not be empty"
            )));
        }

        let restaurants = self.store.insert_named_restaurants(names).await?;
        log_database_operation(
            "load_restaurant_list",
            Some("restaurant"),
            None,
            "created",
            Some(&format!("{} restaurants", restaurants.len())),
        );
        Ok(restaurants)
    }

    pub async fn add_food(&self, restaurant_id: i64, new_food: &NewFood) -> SwiggyResult<Food> {
        new_food.validate()?;

        let food = self.store.add_food(restaurant_id, new_food).await?;
        debug!(restaurant_id = restaurant_id, food_id = food.id, "Food added to menu");
        Ok(food)
    }

    /// Add foods across restaurants; either all are added or none
    pub async fn load_menu_card(&self, entries: &[(i64, NewFood)]) -> SwiggyResult<Vec<Food>> {
        for (index, (_, new_food)) in entries.iter().enumerate() {
            new_food.validate().map_err(|errors| {
                SwiggyError::Validation(format!(
                    "entries[{index}]: {}",
                    crate::validation::describe(&errors)
                ))
            })?;
        }

        self.store.load_menu_card(entries).await
    }

    pub async fn food_quantity(&self, food_id: i64) -> SwiggyResult<i32> {
        self.store
            .food_quantity(food_id)
            .await?
            .ok_or_else(|| SwiggyError::not_found("food", food_id))
    }

    pub async fn menu_card(
        &self,
        restaurant_id: i64,
        filter: MenuFilter,
    ) -> SwiggyResult<Vec<Food>> {
        self.store.menu_card(restaurant_id, filter).await
    }

    /// Take a food off the menu and out of active carts
    pub async fn remove_food(&self, food_id: i64) -> SwiggyResult<bool> {
        let removed = self.store.remove_food(food_id).await?;
        log_database_operation(
            "remove_food",
            Some("food"),
            Some(food_id),
            if removed { "removed" } else { "unchanged" },
            None,
        );
        Ok(removed)
    }

    pub async fn update_profile(
        &self,
        restaurant_id: i64,
        field: ProfileField,
        value: &str,
    ) -> SwiggyResult<Restaurant> {
        let stored_value = profile_value(field, value)?;

        let restaurant = self
            .store
            .update_restaurant_field(restaurant_id, field, &stored_value)
            .await?
            .ok_or_else(|| SwiggyError::not_found("restaurant", restaurant_id))?;
        log_database_operation(
            "update_profile",
            Some("restaurant"),
            Some(restaurant_id),
            "updated",
            Some(field.as_str()),
        );
        Ok(restaurant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FoodType;
    use crate::store::MemoryStore;

    fn service() -> RestaurantService {
        RestaurantService::new(Arc::new(MemoryStore::new()))
    }

    fn profile() -> NewRestaurant {
        NewRestaurant {
            name: "Adyar Bakery".to_string(),
            phone_number: "9876543210".to_string(),
            email_id: "adyar@example.com".to_string(),
            password: "Bakery@2024".to_string(),
        }
    }

    fn food(name: &str, food_type: FoodType) -> NewFood {
        NewFood {
            name: name.to_string(),
            rate: 25.0,
            food_type,
            quantity: 40,
        }
    }

    #[tokio::test]
    async fn test_create_profile_and_login() {
        let service = service();
        let created = service.create_profile(&profile()).await.unwrap();
        assert_ne!(created.password_hash.as_deref(), Some("Bakery@2024"));

        let by_phone = service
            .login(LoginField::PhoneNumber, "9876543210", "Bakery@2024")
            .await
            .unwrap();
        assert_eq!(by_phone.id, created.id);

        let by_email = service
            .login(LoginField::EmailId, "adyar@example.com", "Bakery@2024")
            .await
            .unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service();
        service.create_profile(&profile()).await.unwrap();

        let wrong_password = service
            .login(LoginField::PhoneNumber, "9876543210", "Wrong@2024")
            .await
            .unwrap_err();
        let unknown = service
            .login(LoginField::PhoneNumber, "9000000000", "Bakery@2024")
            .await
            .unwrap_err();
        assert_eq!(wrong_password, SwiggyError::AuthenticationFailed);
        assert_eq!(unknown, SwiggyError::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_seeded_restaurant_cannot_log_in() {
        let service = service();
        let seeded = service
            .load_restaurant_list(&["Hotel Saravana".to_string()])
            .await
            .unwrap();
        service
            .update_profile(seeded[0].id, ProfileField::PhoneNumber, "9123456789")
            .await
            .unwrap();

        let err = service
            .login(LoginField::PhoneNumber, "9123456789", "anything")
            .await
            .unwrap_err();
        assert_eq!(err, SwiggyError::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_duplicate_profile_conflicts() {
        let service = service();
        service.create_profile(&profile()).await.unwrap();
        let err = service.create_profile(&profile()).await.unwrap_err();
        assert!(matches!(err, SwiggyError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_invalid_profile_rejected() {
        let mut bad = profile();
        bad.password = "short".to_string();
        let err = service().create_profile(&bad).await.unwrap_err();
        assert!(matches!(err, SwiggyError::Validation(ref m) if m.contains("password")));
    }

    #[tokio::test]
    async fn test_menu_card_and_quantity() {
        let service = service();
        let restaurant = service.create_profile(&profile()).await.unwrap();
        let puff = service
            .add_food(restaurant.id, &food("Veg Puff", FoodType::Veg))
            .await
            .unwrap();
        service
            .add_food(restaurant.id, &food("Egg Puff", FoodType::NonVeg))
            .await
            .unwrap();

        let veg = service
            .menu_card(restaurant.id, MenuFilter::from_id(1))
            .await
            .unwrap();
        assert_eq!(veg, vec![puff.clone()]);
        let all = service
            .menu_card(restaurant.id, MenuFilter::from_id(7))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        assert_eq!(service.food_quantity(puff.id).await.unwrap(), 40);
        assert!(service.remove_food(puff.id).await.unwrap());
        assert!(service.food_quantity(puff.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_add_food_to_unknown_restaurant() {
        let err = service()
            .add_food(404, &food("Veg Puff", FoodType::Veg))
            .await
            .unwrap_err();
        assert_eq!(err, SwiggyError::not_found("restaurant", 404));
    }

    #[tokio::test]
    async fn test_load_menu_card_validates_every_entry() {
        let service = service();
        let restaurant = service.create_profile(&profile()).await.unwrap();
        let mut free = food("Free Tea", FoodType::Veg);
        free.rate = 0.0;

        let err = service
            .load_menu_card(&[
                (restaurant.id, food("Veg Puff", FoodType::Veg)),
                (restaurant.id, free),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, SwiggyError::Validation(ref m) if m.starts_with("entries[1]")));
        assert!(service
            .menu_card(restaurant.id, MenuFilter::All)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_rehashes_password() {
        let service = service();
        let restaurant = service.create_profile(&profile()).await.unwrap();

        service
            .update_profile(restaurant.id, ProfileField::Password, "Newpass@99")
            .await
            .unwrap();
        assert!(service
            .login(LoginField::EmailId, "adyar@example.com", "Newpass@99")
            .await
            .is_ok());

        let err = service
            .update_profile(999, ProfileField::Name, "Ghost Kitchen")
            .await
            .unwrap_err();
        assert_eq!(err, SwiggyError::not_found("restaurant", 999));
    }
}
