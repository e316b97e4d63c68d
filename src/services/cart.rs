use crate::error::SwiggyResult;
use crate::logging::log_order_operation;
use crate::models::{AddToCart, CartItem};
use crate::store::CartStore;
use std::sync::Arc;
use validator::Validate;

/// A customer's active cart
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn CartStore>,
}

impl CartService {
    pub fn new(store: Arc<dyn CartStore>) -> Self {
        Self { store }
    }

    /// Add a food, merging into an existing line for the same food.
    ///
    /// The cart may only hold foods from one restaurant at a time and the
    /// line amount is always priced from the current rate.
    pub async fn add_food(&self, request: &AddToCart) -> SwiggyResult<CartItem> {
        request.validate()?;

        let item = self.store.add_to_cart(request).await?;
        log_order_operation(
            "add_food",
            request.user_id,
            None,
            "in_cart",
            Some(&format!("food {} x{}", item.food_id, item.quantity)),
        );
        Ok(item)
    }

    pub async fn get_cart(&self, user_id: i64) -> SwiggyResult<Vec<CartItem>> {
        self.store.active_cart(user_id).await
    }

    /// Remove one active line; placed lines are never touched
    pub async fn remove_item(&self, cart_id: i64) -> SwiggyResult<bool> {
        self.store.remove_cart_item(cart_id).await
    }

    pub async fn clear(&self, user_id: i64) -> SwiggyResult<u64> {
        let removed = self.store.clear_cart(user_id).await?;
        log_order_operation(
            "clear_cart",
            user_id,
            None,
            "cleared",
            Some(&format!("{removed} lines")),
        );
        Ok(removed)
    }
}
