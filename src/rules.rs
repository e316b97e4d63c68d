//! # Cart and Order Rules
//!
//! Pure decision functions shared by both store backends. Each backend loads
//! the current rows inside its own transaction (or lock), asks these
//! functions what to do, and applies the answer. Keeping the decisions here
//! means the PostgreSQL and in-memory stores cannot drift apart.

use crate::error::{SwiggyError, SwiggyResult};
use crate::models::{AddToCart, CartLine, RestaurantFood};
use std::collections::{BTreeMap, HashSet};

/// What adding a food to a cart should do to the `cart` table
#[derive(Debug, Clone, PartialEq)]
pub enum CartMutation {
    /// New line with the computed amount
    Insert { amount: f64 },
    /// Existing line for the same food grows to `quantity`
    Merge {
        cart_id: i64,
        quantity: i32,
        amount: f64,
    },
}

/// Decide how a cart add applies to the user's active lines.
///
/// `food` must be the non-removed food the request names; `active_lines` are
/// the user's lines currently in `InCart` status.
pub fn plan_cart_add(
    request: &AddToCart,
    food: &RestaurantFood,
    active_lines: &[CartLine],
) -> SwiggyResult<CartMutation> {
    if request.quantity <= 0 {
        return Err(SwiggyError::Validation(
            "quantity: must be at least 1".to_string(),
        ));
    }

    if food.restaurant_id != request.restaurant_id {
        return Err(SwiggyError::not_found("food", request.food_id));
    }

    if let Some(other) = active_lines
        .iter()
        .find(|line| line.restaurant_id != request.restaurant_id)
    {
        return Err(SwiggyError::Conflict(format!(
            "cart already holds items from restaurant {}; \
             clear it before ordering from restaurant {}",
            other.restaurant_id, request.restaurant_id
        )));
    }

    let existing = active_lines.iter().find(|line| line.food_id == request.food_id);
    let quantity = existing
        .map(|line| line.quantity)
        .unwrap_or(0)
        .checked_add(request.quantity)
        .ok_or_else(|| SwiggyError::Validation("quantity: too large".to_string()))?;

    if quantity > food.quantity {
        return Err(SwiggyError::InsufficientStock {
            food_id: food.id,
            requested: quantity,
            available: food.quantity,
        });
    }

    let amount = line_amount(food.rate, quantity);
    Ok(match existing {
        Some(line) => CartMutation::Merge {
            cart_id: line.id,
            quantity,
            amount,
        },
        None => CartMutation::Insert { amount },
    })
}

/// Price of `quantity` units, rounded to paise
pub fn line_amount(rate: f64, quantity: i32) -> f64 {
    (rate * f64::from(quantity) * 100.0).round() / 100.0
}

/// Pick the cart lines an order consumes.
///
/// An empty request selects every active line. Otherwise each requested id
/// must be one of the user's active lines; duplicates are ignored and the
/// active-cart order is kept.
pub fn select_order_lines(
    requested: &[i64],
    active_lines: Vec<CartLine>,
) -> SwiggyResult<Vec<CartLine>> {
    if requested.is_empty() {
        if active_lines.is_empty() {
            return Err(SwiggyError::EmptyCart);
        }
        return Ok(active_lines);
    }

    let active_ids: HashSet<i64> = active_lines.iter().map(|line| line.id).collect();
    if let Some(missing) = requested.iter().find(|id| !active_ids.contains(id)) {
        return Err(SwiggyError::not_found("cart item", *missing));
    }

    let wanted: HashSet<i64> = requested.iter().copied().collect();
    Ok(active_lines
        .into_iter()
        .filter(|line| wanted.contains(&line.id))
        .collect())
}

/// Total quantity each food must give up for the selected lines
pub fn stock_demand(lines: &[CartLine]) -> BTreeMap<i64, i32> {
    let mut demand = BTreeMap::new();
    for line in lines {
        *demand.entry(line.food_id).or_insert(0) += line.quantity;
    }
    demand
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FoodType;

    fn food(id: i64, restaurant_id: i64, quantity: i32) -> RestaurantFood {
        RestaurantFood {
            id,
            name: "Veg Puff".to_string(),
            rate: 25.5,
            food_type: FoodType::Veg,
            quantity,
            restaurant_id,
        }
    }

    fn line(id: i64, restaurant_id: i64, food_id: i64, quantity: i32) -> CartLine {
        CartLine {
            id,
            user_id: 1,
            restaurant_id,
            food_id,
            quantity,
            amount: 25.5 * f64::from(quantity),
        }
    }

    fn request(restaurant_id: i64, food_id: i64, quantity: i32) -> AddToCart {
        AddToCart {
            user_id: 1,
            restaurant_id,
            food_id,
            quantity,
        }
    }

    #[test]
    fn test_first_item_inserts_with_computed_amount() {
        let plan = plan_cart_add(&request(1, 10, 2), &food(10, 1, 5), &[]).unwrap();
        assert_eq!(plan, CartMutation::Insert { amount: 51.0 });
    }

    #[test]
    fn test_same_food_merges_into_existing_line() {
        let active = vec![line(7, 1, 10, 2)];
        let plan = plan_cart_add(&request(1, 10, 3), &food(10, 1, 5), &active).unwrap();
        assert_eq!(
            plan,
            CartMutation::Merge {
                cart_id: 7,
                quantity: 5,
                amount: 127.5
            }
        );
    }

    #[test]
    fn test_second_restaurant_is_rejected() {
        let active = vec![line(7, 1, 10, 1)];
        let err = plan_cart_add(&request(2, 20, 1), &food(20, 2, 5), &active).unwrap_err();
        assert!(matches!(err, SwiggyError::Conflict(_)));
    }

    #[test]
    fn test_food_from_other_restaurant_is_not_found() {
        let err = plan_cart_add(&request(1, 20, 1), &food(20, 2, 5), &[]).unwrap_err();
        assert_eq!(err, SwiggyError::not_found("food", 20));
    }

    #[test]
    fn test_merged_quantity_checked_against_stock() {
        let active = vec![line(7, 1, 10, 4)];
        let err = plan_cart_add(&request(1, 10, 2), &food(10, 1, 5), &active).unwrap_err();
        assert_eq!(
            err,
            SwiggyError::InsufficientStock {
                food_id: 10,
                requested: 6,
                available: 5
            }
        );
    }

    #[test]
    fn test_select_whole_cart() {
        let active = vec![line(1, 1, 10, 1), line(2, 1, 11, 1)];
        let selected = select_order_lines(&[], active.clone()).unwrap();
        assert_eq!(selected, active);
        assert_eq!(select_order_lines(&[], vec![]), Err(SwiggyError::EmptyCart));
    }

    #[test]
    fn test_select_subset_and_missing() {
        let active = vec![line(1, 1, 10, 1), line(2, 1, 11, 1)];
        let selected = select_order_lines(&[2, 2], active.clone()).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, 2);

        let err = select_order_lines(&[2, 9], active).unwrap_err();
        assert_eq!(err, SwiggyError::not_found("cart item", 9));
    }

    #[test]
    fn test_stock_demand_sums_per_food() {
        let lines = vec![line(1, 1, 10, 2), line(2, 1, 11, 1), line(3, 1, 10, 3)];
        let demand = stock_demand(&lines);
        assert_eq!(demand.get(&10), Some(&5));
        assert_eq!(demand.get(&11), Some(&1));
    }

    #[test]
    fn test_line_amount_rounding() {
        assert_eq!(line_amount(33.333, 3), 100.0);
        assert_eq!(line_amount(19.99, 2), 39.98);
    }
}
