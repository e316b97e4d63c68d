//! Shared builders for integration tests

#![allow(dead_code)]

use swiggy_core::constants::{AddressType, FoodType};
use swiggy_core::models::{NewAddress, NewFood, NewRestaurant, NewUser};

pub fn restaurant_profile(suffix: u8) -> NewRestaurant {
    NewRestaurant {
        name: "Hotel Saravana".to_string(),
        phone_number: format!("98765432{suffix:02}"),
        email_id: format!("saravana{suffix}@example.com"),
        password: "Saravana@1".to_string(),
    }
}

pub fn customer(suffix: u8) -> NewUser {
    NewUser {
        name: "Revathi".to_string(),
        phone_number: format!("91234567{suffix:02}"),
        email_id: format!("revathi{suffix}@example.com"),
        password: "Revathi@12".to_string(),
    }
}

pub fn dish(name: &str, rate: f64, food_type: FoodType, quantity: i32) -> NewFood {
    NewFood {
        name: name.to_string(),
        rate,
        food_type,
        quantity,
    }
}

pub fn home_address(user_id: i64) -> NewAddress {
    NewAddress {
        user_id,
        house_number: "7B".to_string(),
        street_name: "Besant Avenue".to_string(),
        area_name: "Besant Nagar".to_string(),
        city_name: "Chennai".to_string(),
        pincode: "600090".to_string(),
        address_type: AddressType::Home,
    }
}
