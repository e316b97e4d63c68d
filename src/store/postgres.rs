//! PostgreSQL backend.
//!
//! Single-statement reads go straight to the pool. Every write that touches
//! more than one row runs in a transaction; cart and order writes first lock
//! the user row so concurrent requests for the same customer serialize.

use super::{CartStore, OrderStore, RestaurantStore, UserStore};
use crate::constants::{LoginField, MenuFilter, ProfileField};
use crate::error::{SwiggyError, SwiggyResult};
use crate::logging::{log_database_operation, log_order_operation};
use crate::models::{
    AddToCart, Address, CartItem, CartLine, Food, NewAddress, NewFood, NewRestaurant, NewUser,
    OrderDetail, PlaceOrder, Restaurant, User,
};
use crate::rules::{self, CartMutation};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RestaurantStore for PgStore {
    async fn create_restaurant(
        &self,
        new_restaurant: &NewRestaurant,
        password_hash: &str,
    ) -> SwiggyResult<Restaurant> {
        Ok(Restaurant::create(&self.pool, new_restaurant, password_hash).await?)
    }

    async fn restaurant_by_id(&self, id: i64) -> SwiggyResult<Option<Restaurant>> {
        Ok(Restaurant::find_by_id(&self.pool, id).await?)
    }

    async fn restaurant_by_login(
        &self,
        field: LoginField,
        value: &str,
    ) -> SwiggyResult<Option<Restaurant>> {
        Ok(Restaurant::find_by_login(&self.pool, field, value).await?)
    }

    async fn list_restaurants(&self) -> SwiggyResult<Vec<Restaurant>> {
        Ok(Restaurant::list_all(&self.pool).await?)
    }

    async fn count_restaurants(&self) -> SwiggyResult<i64> {
        Ok(Restaurant::count(&self.pool).await?)
    }

    async fn insert_named_restaurants(&self, names: &[String]) -> SwiggyResult<Vec<Restaurant>> {
        Ok(Restaurant::create_named_batch(&self.pool, names).await?)
    }

    async fn add_food(&self, restaurant_id: i64, new_food: &NewFood) -> SwiggyResult<Food> {
        let mut tx = self.pool.begin().await?;

        if !Restaurant::exists(&mut *tx, restaurant_id).await? {
            return Err(SwiggyError::not_found("restaurant", restaurant_id));
        }
        let food = Food::insert_for_restaurant(&mut *tx, restaurant_id, new_food).await?;

        tx.commit().await?;
        Ok(food)
    }

    async fn load_menu_card(&self, entries: &[(i64, NewFood)]) -> SwiggyResult<Vec<Food>> {
        let mut tx = self.pool.begin().await?;
        let mut foods = Vec::with_capacity(entries.len());

        for (restaurant_id, new_food) in entries {
            if !Restaurant::exists(&mut *tx, *restaurant_id).await? {
                // Dropping the transaction rolls back the foods inserted so far
                return Err(SwiggyError::not_found("restaurant", *restaurant_id));
            }
            foods.push(Food::insert_for_restaurant(&mut *tx, *restaurant_id, new_food).await?);
        }

        tx.commit().await?;
        log_database_operation(
            "load_menu_card",
            Some("food"),
            None,
            "committed",
            Some(&format!("{} foods", foods.len())),
        );
        Ok(foods)
    }

    async fn food_quantity(&self, food_id: i64) -> SwiggyResult<Option<i32>> {
        Ok(Food::available_quantity(&self.pool, food_id).await?)
    }

    async fn menu_card(&self, restaurant_id: i64, filter: MenuFilter) -> SwiggyResult<Vec<Food>> {
        Ok(Food::menu_card(&self.pool, restaurant_id, filter).await?)
    }

    async fn remove_food(&self, food_id: i64) -> SwiggyResult<bool> {
        Ok(Food::remove(&self.pool, food_id).await?)
    }

    async fn update_restaurant_field(
        &self,
        id: i64,
        field: ProfileField,
        value: &str,
    ) -> SwiggyResult<Option<Restaurant>> {
        Ok(Restaurant::update_field(&self.pool, id, field, value).await?)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: &NewUser, password_hash: &str) -> SwiggyResult<User> {
        Ok(User::create(&self.pool, new_user, password_hash).await?)
    }

    async fn user_by_id(&self, id: i64) -> SwiggyResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn user_by_login(&self, field: LoginField, value: &str) -> SwiggyResult<Option<User>> {
        Ok(User::find_by_login(&self.pool, field, value).await?)
    }

    async fn update_user_field(
        &self,
        id: i64,
        field: ProfileField,
        value: &str,
    ) -> SwiggyResult<Option<User>> {
        Ok(User::update_field(&self.pool, id, field, value).await?)
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn add_to_cart(&self, request: &AddToCart) -> SwiggyResult<CartItem> {
        let mut tx = self.pool.begin().await?;

        if !User::lock(&mut *tx, request.user_id).await? {
            return Err(SwiggyError::not_found("user", request.user_id));
        }

        let food = Food::find_on_menu(&mut *tx, request.food_id)
            .await?
            .ok_or_else(|| SwiggyError::not_found("food", request.food_id))?;
        let active_lines = CartLine::lock_active(&mut *tx, request.user_id).await?;

        let cart_id = match rules::plan_cart_add(request, &food, &active_lines)? {
            CartMutation::Insert { amount } => CartLine::insert(&mut *tx, request, amount).await?,
            CartMutation::Merge {
                cart_id,
                quantity,
                amount,
            } => {
                CartLine::update_quantity(&mut *tx, cart_id, quantity, amount).await?;
                cart_id
            }
        };
        let item = CartItem::find(&mut *tx, cart_id).await?;

        tx.commit().await?;
        debug!(
            user_id = request.user_id,
            cart_id = cart_id,
            quantity = item.quantity,
            "Cart line saved"
        );
        Ok(item)
    }

    async fn active_cart(&self, user_id: i64) -> SwiggyResult<Vec<CartItem>> {
        Ok(CartItem::active_for_user(&self.pool, user_id).await?)
    }

    async fn remove_cart_item(&self, cart_id: i64) -> SwiggyResult<bool> {
        Ok(CartLine::remove_active(&self.pool, cart_id).await?)
    }

    async fn clear_cart(&self, user_id: i64) -> SwiggyResult<u64> {
        Ok(CartLine::clear_active(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn add_address(&self, new_address: &NewAddress) -> SwiggyResult<Address> {
        if !User::exists(&self.pool, new_address.user_id).await? {
            return Err(SwiggyError::not_found("user", new_address.user_id));
        }
        Ok(Address::create(&self.pool, new_address).await?)
    }

    async fn addresses(&self, user_id: i64) -> SwiggyResult<Vec<Address>> {
        Ok(Address::list_for_user(&self.pool, user_id).await?)
    }

    async fn place_order(&self, request: &PlaceOrder) -> SwiggyResult<Vec<OrderDetail>> {
        let mut tx = self.pool.begin().await?;

        if !User::lock(&mut *tx, request.user_id).await? {
            return Err(SwiggyError::not_found("user", request.user_id));
        }
        if !Address::belongs_to(&mut *tx, request.address_id, request.user_id).await? {
            return Err(SwiggyError::not_found("address", request.address_id));
        }

        let active_lines = CartLine::lock_active(&mut *tx, request.user_id).await?;
        let lines = rules::select_order_lines(&request.cart_ids, active_lines)?;

        for (food_id, requested) in rules::stock_demand(&lines) {
            if Food::decrement_stock(&mut *tx, food_id, requested).await?.is_none() {
                let stock = Food::stock(&mut *tx, food_id).await?;
                tx.rollback().await?;
                let Some(available) = stock else {
                    warn!(
                        user_id = request.user_id,
                        food_id = food_id,
                        "Order rolled back on removed food"
                    );
                    return Err(SwiggyError::not_found("food", food_id));
                };
                warn!(
                    user_id = request.user_id,
                    food_id = food_id,
                    requested = requested,
                    available = available,
                    "Order rolled back on insufficient stock"
                );
                return Err(SwiggyError::InsufficientStock {
                    food_id,
                    requested,
                    available,
                });
            }
        }

        let reference = Uuid::new_v4();
        for line in &lines {
            OrderDetail::insert(&mut *tx, reference, request.user_id, line.id, request.address_id)
                .await?;
        }

        let cart_ids: Vec<i64> = lines.iter().map(|line| line.id).collect();
        CartLine::mark_placed(&mut *tx, &cart_ids).await?;
        let orders = OrderDetail::list_by_reference(&mut *tx, reference).await?;

        tx.commit().await?;
        log_order_operation(
            "place_order",
            request.user_id,
            Some(&reference.to_string()),
            "committed",
            Some(&format!("{} lines", orders.len())),
        );
        Ok(orders)
    }

    async fn orders(&self, user_id: i64) -> SwiggyResult<Vec<OrderDetail>> {
        Ok(OrderDetail::list_for_user(&self.pool, user_id).await?)
    }
}
