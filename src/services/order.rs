use crate::error::{SwiggyError, SwiggyResult};
use crate::logging::{log_error, log_order_operation};
use crate::models::{Address, NewAddress, OrderDetail, PlaceOrder};
use crate::store::OrderStore;
use std::sync::Arc;
use validator::Validate;

/// Delivery addresses and the cart-to-order transition
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn add_address(&self, new_address: &NewAddress) -> SwiggyResult<Address> {
        new_address.validate()?;
        self.store.add_address(new_address).await
    }

    pub async fn addresses(&self, user_id: i64) -> SwiggyResult<Vec<Address>> {
        self.store.addresses(user_id).await
    }

    /// Turn cart lines into orders, taking their stock.
    ///
    /// Either every selected line is ordered or nothing changes.
    pub async fn place_order(&self, request: &PlaceOrder) -> SwiggyResult<Vec<OrderDetail>> {
        request.validate()?;
        if let Some(bad) = request.cart_ids.iter().find(|id| **id <= 0) {
            return Err(SwiggyError::Validation(format!(
                "cart_ids: {bad} is not a valid id"
            )));
        }

        match self.store.place_order(request).await {
            Ok(orders) => Ok(orders),
            Err(e) => {
                log_error(
                    "order_service",
                    "place_order",
                    &e.to_string(),
                    Some(&format!("user {}", request.user_id)),
                );
                log_order_operation("place_order", request.user_id, None, "rejected", None);
                Err(e)
            }
        }
    }

    /// Placed orders, newest first
    pub async fn orders(&self, user_id: i64) -> SwiggyResult<Vec<OrderDetail>> {
        self.store.orders(user_id).await
    }
}
