//! End-to-end marketplace flow on the in-memory backend

mod common;

use common::{customer, dish, home_address, restaurant_profile};
use swiggy_core::constants::{FoodType, LoginField, MenuFilter, ProfileField};
use swiggy_core::models::{AddToCart, PlaceOrder};
use swiggy_core::{Marketplace, SwiggyError};

#[tokio::test]
async fn test_browse_cart_and_order() {
    let marketplace = Marketplace::in_memory().unwrap();

    let restaurant = marketplace
        .restaurants
        .create_profile(&restaurant_profile(1))
        .await
        .unwrap();
    let meals = marketplace
        .restaurants
        .add_food(restaurant.id, &dish("South Indian Meals", 120.0, FoodType::Veg, 5))
        .await
        .unwrap();
    marketplace
        .restaurants
        .add_food(restaurant.id, &dish("Fish Fry", 180.0, FoodType::NonVeg, 5))
        .await
        .unwrap();

    let user = marketplace.users.create_profile(&customer(1)).await.unwrap();
    let user = marketplace
        .users
        .login(LoginField::PhoneNumber, &user.phone_number, "Revathi@12")
        .await
        .unwrap();
    let address = marketplace
        .orders
        .add_address(&home_address(user.id))
        .await
        .unwrap();

    let veg_menu = marketplace
        .restaurants
        .menu_card(restaurant.id, MenuFilter::Veg)
        .await
        .unwrap();
    assert_eq!(veg_menu, vec![meals.clone()]);

    marketplace
        .carts
        .add_food(&AddToCart {
            user_id: user.id,
            restaurant_id: restaurant.id,
            food_id: meals.id,
            quantity: 2,
        })
        .await
        .unwrap();

    let orders = marketplace
        .orders
        .place_order(&PlaceOrder {
            user_id: user.id,
            address_id: address.id,
            cart_ids: vec![],
        })
        .await
        .unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].amount, 240.0);
    assert_eq!(orders[0].restaurant_name, "Hotel Saravana");
    assert_eq!(
        marketplace.restaurants.food_quantity(meals.id).await.unwrap(),
        3
    );
    assert!(marketplace.carts.get_cart(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_removed_food_keeps_order_history() {
    let marketplace = Marketplace::in_memory().unwrap();
    let restaurant = marketplace
        .restaurants
        .create_profile(&restaurant_profile(2))
        .await
        .unwrap();
    let kothu = marketplace
        .restaurants
        .add_food(restaurant.id, &dish("Kothu Parotta", 90.0, FoodType::NonVeg, 4))
        .await
        .unwrap();
    let user = marketplace.users.create_profile(&customer(2)).await.unwrap();
    let address = marketplace
        .orders
        .add_address(&home_address(user.id))
        .await
        .unwrap();

    marketplace
        .carts
        .add_food(&AddToCart {
            user_id: user.id,
            restaurant_id: restaurant.id,
            food_id: kothu.id,
            quantity: 1,
        })
        .await
        .unwrap();
    marketplace
        .orders
        .place_order(&PlaceOrder {
            user_id: user.id,
            address_id: address.id,
            cart_ids: vec![],
        })
        .await
        .unwrap();

    assert!(marketplace.restaurants.remove_food(kothu.id).await.unwrap());

    let history = marketplace.orders.orders(user.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].food_name, "Kothu Parotta");

    let err = marketplace
        .carts
        .add_food(&AddToCart {
            user_id: user.id,
            restaurant_id: restaurant.id,
            food_id: kothu.id,
            quantity: 1,
        })
        .await
        .unwrap_err();
    assert_eq!(err, SwiggyError::not_found("food", kothu.id));
}

#[tokio::test]
async fn test_profile_updates_are_checked() {
    let marketplace = Marketplace::in_memory().unwrap();
    let user = marketplace.users.create_profile(&customer(3)).await.unwrap();

    let err = marketplace
        .users
        .update_profile(user.id, ProfileField::PhoneNumber, "5555555555")
        .await
        .unwrap_err();
    assert!(matches!(err, SwiggyError::Validation(_)));

    let updated = marketplace
        .users
        .update_profile(user.id, ProfileField::PhoneNumber, "09876543210")
        .await
        .unwrap();
    assert_eq!(updated.phone_number, "09876543210");
}
