//! In-process backend.
//!
//! All tables live behind one mutex, so every operation is atomic with
//! respect to every other. Uniqueness and foreign-key checks mirror the
//! constraints in the PostgreSQL schema, and the cart and order decisions
//! come from [`crate::rules`] exactly as in [`super::PgStore`].

use super::{CartStore, OrderStore, RestaurantStore, UserStore};
use crate::constants::{CartStatus, LoginField, MenuFilter, ProfileField};
use crate::error::{SwiggyError, SwiggyResult};
use crate::logging::log_order_operation;
use crate::models::{
    AddToCart, Address, CartItem, CartLine, Food, NewAddress, NewFood, NewRestaurant, NewUser,
    OrderDetail, PlaceOrder, Restaurant, RestaurantFood, User,
};
use crate::rules::{self, CartMutation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct FoodRow {
    food: Food,
    restaurant_id: i64,
    removed: bool,
}

#[derive(Debug, Clone)]
struct CartRow {
    line: CartLine,
    status: CartStatus,
}

#[derive(Debug, Clone)]
struct OrderRow {
    id: i64,
    reference: Uuid,
    user_id: i64,
    cart_id: i64,
    address_id: i64,
    placed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    restaurants: BTreeMap<i64, Restaurant>,
    foods: BTreeMap<i64, FoodRow>,
    users: BTreeMap<i64, User>,
    addresses: BTreeMap<i64, Address>,
    cart: BTreeMap<i64, CartRow>,
    orders: Vec<OrderRow>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn restaurant_contact_taken(&self, field: ProfileField, value: &str, except: i64) -> bool {
        self.restaurants.values().any(|restaurant| {
            let current = match field {
                ProfileField::PhoneNumber => restaurant.phone_number.as_deref(),
                ProfileField::EmailId => restaurant.email_id.as_deref(),
                _ => None,
            };
            restaurant.id != except && current == Some(value)
        })
    }

    fn user_contact_taken(&self, field: ProfileField, value: &str, except: i64) -> bool {
        self.users.values().any(|user| {
            let current = match field {
                ProfileField::PhoneNumber => user.phone_number.as_str(),
                ProfileField::EmailId => user.email_id.as_str(),
                _ => return false,
            };
            user.id != except && current == value
        })
    }

    fn menu_food(&self, food_id: i64) -> Option<RestaurantFood> {
        self.foods
            .get(&food_id)
            .filter(|row| !row.removed)
            .map(|row| RestaurantFood {
                id: row.food.id,
                name: row.food.name.clone(),
                rate: row.food.rate,
                food_type: row.food.food_type,
                quantity: row.food.quantity,
                restaurant_id: row.restaurant_id,
            })
    }

    fn active_lines(&self, user_id: i64) -> Vec<CartLine> {
        self.cart
            .values()
            .filter(|row| row.status == CartStatus::InCart && row.line.user_id == user_id)
            .map(|row| row.line.clone())
            .collect()
    }

    fn cart_item(&self, row: &CartRow) -> CartItem {
        CartItem {
            id: row.line.id,
            user_id: row.line.user_id,
            food_id: row.line.food_id,
            food_name: self.food_name(row.line.food_id),
            restaurant_id: row.line.restaurant_id,
            restaurant_name: self.restaurant_name(row.line.restaurant_id),
            quantity: row.line.quantity,
            amount: row.line.amount,
            status: row.status,
        }
    }

    fn order_detail(&self, order: &OrderRow) -> Option<OrderDetail> {
        let line = &self.cart.get(&order.cart_id)?.line;
        Some(OrderDetail {
            order_id: order.id,
            reference: order.reference,
            cart_id: line.id,
            user_id: order.user_id,
            food_id: line.food_id,
            food_name: self.food_name(line.food_id),
            restaurant_id: line.restaurant_id,
            restaurant_name: self.restaurant_name(line.restaurant_id),
            quantity: line.quantity,
            amount: line.amount,
            address_id: order.address_id,
            placed_at: order.placed_at,
        })
    }

    fn food_name(&self, food_id: i64) -> String {
        self.foods
            .get(&food_id)
            .map(|row| row.food.name.clone())
            .unwrap_or_default()
    }

    fn restaurant_name(&self, restaurant_id: i64) -> String {
        self.restaurants
            .get(&restaurant_id)
            .map(|restaurant| restaurant.name.clone())
            .unwrap_or_default()
    }

    fn insert_food(&mut self, restaurant_id: i64, new_food: &NewFood) -> SwiggyResult<Food> {
        if !self.restaurants.contains_key(&restaurant_id) {
            return Err(SwiggyError::not_found("restaurant", restaurant_id));
        }
        if new_food.rate <= 0.0 || new_food.quantity < 0 {
            return Err(SwiggyError::Validation(format!(
                "food {}: rate must be positive and quantity non-negative",
                new_food.name
            )));
        }

        let food = Food {
            id: self.next_id(),
            name: new_food.name.clone(),
            rate: new_food.rate,
            food_type: new_food.food_type,
            quantity: new_food.quantity,
        };
        self.foods.insert(
            food.id,
            FoodRow {
                food: food.clone(),
                restaurant_id,
                removed: false,
            },
        );
        Ok(food)
    }
}

/// Backend that keeps every table in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate(table: &str, field: ProfileField) -> SwiggyError {
    SwiggyError::Conflict(format!("duplicate value violates {table}_{field}_key"))
}

#[async_trait]
impl RestaurantStore for MemoryStore {
    async fn create_restaurant(
        &self,
        new_restaurant: &NewRestaurant,
        password_hash: &str,
    ) -> SwiggyResult<Restaurant> {
        let mut tables = self.tables.lock();

        for (field, value) in [
            (ProfileField::PhoneNumber, &new_restaurant.phone_number),
            (ProfileField::EmailId, &new_restaurant.email_id),
        ] {
            if tables.restaurant_contact_taken(field, value, 0) {
                return Err(duplicate("restaurant", field));
            }
        }

        let restaurant = Restaurant {
            id: tables.next_id(),
            name: new_restaurant.name.clone(),
            phone_number: Some(new_restaurant.phone_number.clone()),
            email_id: Some(new_restaurant.email_id.clone()),
            password_hash: Some(password_hash.to_string()),
        };
        tables.restaurants.insert(restaurant.id, restaurant.clone());
        Ok(restaurant)
    }

    async fn restaurant_by_id(&self, id: i64) -> SwiggyResult<Option<Restaurant>> {
        Ok(self.tables.lock().restaurants.get(&id).cloned())
    }

    async fn restaurant_by_login(
        &self,
        field: LoginField,
        value: &str,
    ) -> SwiggyResult<Option<Restaurant>> {
        let tables = self.tables.lock();
        Ok(tables
            .restaurants
            .values()
            .find(|restaurant| match field {
                LoginField::PhoneNumber => restaurant.phone_number.as_deref() == Some(value),
                LoginField::EmailId => restaurant.email_id.as_deref() == Some(value),
            })
            .cloned())
    }

    async fn list_restaurants(&self) -> SwiggyResult<Vec<Restaurant>> {
        Ok(self.tables.lock().restaurants.values().cloned().collect())
    }

    async fn count_restaurants(&self) -> SwiggyResult<i64> {
        Ok(self.tables.lock().restaurants.len() as i64)
    }

    async fn insert_named_restaurants(&self, names: &[String]) -> SwiggyResult<Vec<Restaurant>> {
        let mut tables = self.tables.lock();
        let mut restaurants = Vec::with_capacity(names.len());

        for name in names {
            let restaurant = Restaurant {
                id: tables.next_id(),
                name: name.clone(),
                phone_number: None,
                email_id: None,
                password_hash: None,
            };
            tables.restaurants.insert(restaurant.id, restaurant.clone());
            restaurants.push(restaurant);
        }
        Ok(restaurants)
    }

    async fn add_food(&self, restaurant_id: i64, new_food: &NewFood) -> SwiggyResult<Food> {
        self.tables.lock().insert_food(restaurant_id, new_food)
    }

    async fn load_menu_card(&self, entries: &[(i64, NewFood)]) -> SwiggyResult<Vec<Food>> {
        let mut tables = self.tables.lock();

        // Check every entry up front so a failure leaves the tables untouched
        if let Some((restaurant_id, _)) = entries
            .iter()
            .find(|(restaurant_id, _)| !tables.restaurants.contains_key(restaurant_id))
        {
            return Err(SwiggyError::not_found("restaurant", *restaurant_id));
        }
        if let Some((_, food)) = entries
            .iter()
            .find(|(_, food)| food.rate <= 0.0 || food.quantity < 0)
        {
            return Err(SwiggyError::Validation(format!(
                "food {}: rate must be positive and quantity non-negative",
                food.name
            )));
        }

        entries
            .iter()
            .map(|(restaurant_id, new_food)| tables.insert_food(*restaurant_id, new_food))
            .collect()
    }

    async fn food_quantity(&self, food_id: i64) -> SwiggyResult<Option<i32>> {
        Ok(self
            .tables
            .lock()
            .foods
            .get(&food_id)
            .filter(|row| !row.removed)
            .map(|row| row.food.quantity))
    }

    async fn menu_card(&self, restaurant_id: i64, filter: MenuFilter) -> SwiggyResult<Vec<Food>> {
        Ok(self
            .tables
            .lock()
            .foods
            .values()
            .filter(|row| {
                row.restaurant_id == restaurant_id
                    && !row.removed
                    && filter.matches(row.food.food_type)
            })
            .map(|row| row.food.clone())
            .collect())
    }

    async fn remove_food(&self, food_id: i64) -> SwiggyResult<bool> {
        let mut tables = self.tables.lock();

        match tables.foods.get_mut(&food_id) {
            Some(row) if !row.removed => row.removed = true,
            _ => return Ok(false),
        }
        tables
            .cart
            .retain(|_, row| !(row.line.food_id == food_id && row.status == CartStatus::InCart));
        Ok(true)
    }

    async fn update_restaurant_field(
        &self,
        id: i64,
        field: ProfileField,
        value: &str,
    ) -> SwiggyResult<Option<Restaurant>> {
        let mut tables = self.tables.lock();

        if !tables.restaurants.contains_key(&id) {
            return Ok(None);
        }
        if tables.restaurant_contact_taken(field, value, id) {
            return Err(duplicate("restaurant", field));
        }
        let Some(restaurant) = tables.restaurants.get_mut(&id) else {
            return Ok(None);
        };
        match field {
            ProfileField::Name => restaurant.name = value.to_string(),
            ProfileField::PhoneNumber => restaurant.phone_number = Some(value.to_string()),
            ProfileField::EmailId => restaurant.email_id = Some(value.to_string()),
            ProfileField::Password => restaurant.password_hash = Some(value.to_string()),
        }
        Ok(Some(restaurant.clone()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: &NewUser, password_hash: &str) -> SwiggyResult<User> {
        let mut tables = self.tables.lock();

        for (field, value) in [
            (ProfileField::PhoneNumber, &new_user.phone_number),
            (ProfileField::EmailId, &new_user.email_id),
        ] {
            if tables.user_contact_taken(field, value, 0) {
                return Err(duplicate("users", field));
            }
        }

        let user = User {
            id: tables.next_id(),
            name: new_user.name.clone(),
            phone_number: new_user.phone_number.clone(),
            email_id: new_user.email_id.clone(),
            password_hash: password_hash.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: i64) -> SwiggyResult<Option<User>> {
        Ok(self.tables.lock().users.get(&id).cloned())
    }

    async fn user_by_login(&self, field: LoginField, value: &str) -> SwiggyResult<Option<User>> {
        let tables = self.tables.lock();
        Ok(tables
            .users
            .values()
            .find(|user| match field {
                LoginField::PhoneNumber => user.phone_number == value,
                LoginField::EmailId => user.email_id == value,
            })
            .cloned())
    }

    async fn update_user_field(
        &self,
        id: i64,
        field: ProfileField,
        value: &str,
    ) -> SwiggyResult<Option<User>> {
        let mut tables = self.tables.lock();

        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        if tables.user_contact_taken(field, value, id) {
            return Err(duplicate("users", field));
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        match field {
            ProfileField::Name => user.name = value.to_string(),
            ProfileField::PhoneNumber => user.phone_number = value.to_string(),
            ProfileField::EmailId => user.email_id = value.to_string(),
            ProfileField::Password => user.password_hash = value.to_string(),
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn add_to_cart(&self, request: &AddToCart) -> SwiggyResult<CartItem> {
        let mut tables = self.tables.lock();

        if !tables.users.contains_key(&request.user_id) {
            return Err(SwiggyError::not_found("user", request.user_id));
        }
        let food = tables
            .menu_food(request.food_id)
            .ok_or_else(|| SwiggyError::not_found("food", request.food_id))?;
        let active_lines = tables.active_lines(request.user_id);

        let cart_id = match rules::plan_cart_add(request, &food, &active_lines)? {
            CartMutation::Insert { amount } => {
                let id = tables.next_id();
                let row = CartRow {
                    line: CartLine {
                        id,
                        user_id: request.user_id,
                        restaurant_id: request.restaurant_id,
                        food_id: request.food_id,
                        quantity: request.quantity,
                        amount,
                    },
                    status: CartStatus::InCart,
                };
                tables.cart.insert(id, row);
                id
            }
            CartMutation::Merge {
                cart_id,
                quantity,
                amount,
            } => {
                if let Some(row) = tables.cart.get_mut(&cart_id) {
                    row.line.quantity = quantity;
                    row.line.amount = amount;
                }
                cart_id
            }
        };

        let row = tables
            .cart
            .get(&cart_id)
            .ok_or_else(|| SwiggyError::not_found("cart item", cart_id))?;
        Ok(tables.cart_item(row))
    }

    async fn active_cart(&self, user_id: i64) -> SwiggyResult<Vec<CartItem>> {
        let tables = self.tables.lock();
        Ok(tables
            .cart
            .values()
            .filter(|row| row.status == CartStatus::InCart && row.line.user_id == user_id)
            .map(|row| tables.cart_item(row))
            .collect())
    }

    async fn remove_cart_item(&self, cart_id: i64) -> SwiggyResult<bool> {
        let mut tables = self.tables.lock();
        let active = tables
            .cart
            .get(&cart_id)
            .is_some_and(|row| row.status == CartStatus::InCart);
        if active {
            tables.cart.remove(&cart_id);
        }
        Ok(active)
    }

    async fn clear_cart(&self, user_id: i64) -> SwiggyResult<u64> {
        let mut tables = self.tables.lock();
        let before = tables.cart.len();
        tables
            .cart
            .retain(|_, row| !(row.line.user_id == user_id && row.status == CartStatus::InCart));
        Ok((before - tables.cart.len()) as u64)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn add_address(&self, new_address: &NewAddress) -> SwiggyResult<Address> {
        let mut tables = self.tables.lock();

        if !tables.users.contains_key(&new_address.user_id) {
            return Err(SwiggyError::not_found("user", new_address.user_id));
        }

        let address = Address {
            id: tables.next_id(),
            user_id: new_address.user_id,
            house_number: new_address.house_number.clone(),
            street_name: new_address.street_name.clone(),
            area_name: new_address.area_name.clone(),
            city_name: new_address.city_name.clone(),
            pincode: new_address.pincode.clone(),
            address_type: new_address.address_type,
        };
        tables.addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn addresses(&self, user_id: i64) -> SwiggyResult<Vec<Address>> {
        Ok(self
            .tables
            .lock()
            .addresses
            .values()
            .filter(|address| address.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn place_order(&self, request: &PlaceOrder) -> SwiggyResult<Vec<OrderDetail>> {
        let mut tables = self.tables.lock();

        if !tables.users.contains_key(&request.user_id) {
            return Err(SwiggyError::not_found("user", request.user_id));
        }
        let owns_address = tables
            .addresses
            .get(&request.address_id)
            .is_some_and(|address| address.user_id == request.user_id);
        if !owns_address {
            return Err(SwiggyError::not_found("address", request.address_id));
        }

        let active_lines = tables.active_lines(request.user_id);
        let lines = rules::select_order_lines(&request.cart_ids, active_lines)?;
        let demand = rules::stock_demand(&lines);

        // Nothing is written until every food has enough stock
        for (food_id, requested) in &demand {
            let available = tables
                .foods
                .get(food_id)
                .filter(|row| !row.removed)
                .map(|row| row.food.quantity)
                .ok_or_else(|| SwiggyError::not_found("food", *food_id))?;
            if available < *requested {
                return Err(SwiggyError::InsufficientStock {
                    food_id: *food_id,
                    requested: *requested,
                    available,
                });
            }
        }

        for (food_id, requested) in &demand {
            if let Some(row) = tables.foods.get_mut(food_id) {
                row.food.quantity -= requested;
            }
        }

        let reference = Uuid::new_v4();
        let placed_at = Utc::now();
        let mut orders = Vec::with_capacity(lines.len());
        for line in &lines {
            if let Some(row) = tables.cart.get_mut(&line.id) {
                row.status = CartStatus::OrderPlaced;
            }
            let order = OrderRow {
                id: tables.next_id(),
                reference,
                user_id: request.user_id,
                cart_id: line.id,
                address_id: request.address_id,
                placed_at,
            };
            orders.extend(tables.order_detail(&order));
            tables.orders.push(order);
        }

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
        let tables = self.tables.lock();
        Ok(tables
            .orders
            .iter()
            .rev()
            .filter(|order| order.user_id == user_id)
            .filter_map(|order| tables.order_detail(order))
            .collect())
    }
}
