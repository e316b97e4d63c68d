//! # Data Access Layer
//!
//! Storage traits for the four subsystems and the two backends that
//! implement them:
//!
//! - [`PgStore`] - PostgreSQL through sqlx, every multi-statement write in a
//!   transaction
//! - [`MemoryStore`] - in-process tables behind a single lock, used for local
//!   runs and service tests
//!
//! Services only see the traits, so the backend is a configuration choice.

pub mod memory;
pub mod postgres;

use crate::constants::{LoginField, MenuFilter, ProfileField};
use crate::error::SwiggyResult;
use crate::models::{
    AddToCart, Address, CartItem, Food, NewAddress, NewFood, NewRestaurant, NewUser, OrderDetail,
    PlaceOrder, Restaurant, User,
};
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait RestaurantStore: Send + Sync {
    async fn create_restaurant(
        &self,
        new_restaurant: &NewRestaurant,
        password_hash: &str,
    ) -> SwiggyResult<Restaurant>;

    async fn restaurant_by_id(&self, id: i64) -> SwiggyResult<Option<Restaurant>>;

    async fn restaurant_by_login(
        &self,
        field: LoginField,
        value: &str,
    ) -> SwiggyResult<Option<Restaurant>>;

    async fn list_restaurants(&self) -> SwiggyResult<Vec<Restaurant>>;

    async fn count_restaurants(&self) -> SwiggyResult<i64>;

    /// Insert name-only restaurants, all or nothing
    async fn insert_named_restaurants(&self, names: &[String]) -> SwiggyResult<Vec<Restaurant>>;

    /// Add one food to a restaurant's menu; `NotFound` for an unknown restaurant
    async fn add_food(&self, restaurant_id: i64, new_food: &NewFood) -> SwiggyResult<Food>;

    /// Add many foods across restaurants, all or nothing
    async fn load_menu_card(&self, entries: &[(i64, NewFood)]) -> SwiggyResult<Vec<Food>>;

    async fn food_quantity(&self, food_id: i64) -> SwiggyResult<Option<i32>>;

    async fn menu_card(&self, restaurant_id: i64, filter: MenuFilter) -> SwiggyResult<Vec<Food>>;

    async fn remove_food(&self, food_id: i64) -> SwiggyResult<bool>;

    async fn update_restaurant_field(
        &self,
        id: i64,
        field: ProfileField,
        value: &str,
    ) -> SwiggyResult<Option<Restaurant>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, new_user: &NewUser, password_hash: &str) -> SwiggyResult<User>;

    async fn user_by_id(&self, id: i64) -> SwiggyResult<Option<User>>;

    async fn user_by_login(&self, field: LoginField, value: &str) -> SwiggyResult<Option<User>>;

    async fn update_user_field(
        &self,
        id: i64,
        field: ProfileField,
        value: &str,
    ) -> SwiggyResult<Option<User>>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Apply a cart add atomically, enforcing the rules in [`crate::rules`]
    async fn add_to_cart(&self, request: &AddToCart) -> SwiggyResult<CartItem>;

    async fn active_cart(&self, user_id: i64) -> SwiggyResult<Vec<CartItem>>;

    async fn remove_cart_item(&self, cart_id: i64) -> SwiggyResult<bool>;

    async fn clear_cart(&self, user_id: i64) -> SwiggyResult<u64>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn add_address(&self, new_address: &NewAddress) -> SwiggyResult<Address>;

    async fn addresses(&self, user_id: i64) -> SwiggyResult<Vec<Address>>;

    /// The cart-to-order transition. Either every selected line becomes an
    /// order and its stock is taken, or nothing changes.
    async fn place_order(&self, request: &PlaceOrder) -> SwiggyResult<Vec<OrderDetail>>;

    async fn orders(&self, user_id: i64) -> SwiggyResult<Vec<OrderDetail>>;
}

/// Everything a backend must provide
pub trait MarketplaceStore: RestaurantStore + UserStore + CartStore + OrderStore {}

impl<T> MarketplaceStore for T where T: RestaurantStore + UserStore + CartStore + OrderStore {}
