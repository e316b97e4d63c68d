//! # Marketplace Constants
//!
//! Enumerations shared by the catalog, cart and order layers. The numeric
//! discriminants are the values stored in the database, so they must not be
//! renumbered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of dish offered on a menu card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum FoodType {
    Veg = 1,
    NonVeg = 2,
}

impl FoodType {
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(FoodType::Veg),
            2 => Some(FoodType::NonVeg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodType::Veg => "veg",
            FoodType::NonVeg => "non_veg",
        }
    }
}

impl fmt::Display for FoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum CartStatus {
    InCart = 1,
    OrderPlaced = 2,
}

impl CartStatus {
    pub fn id(self) -> i32 {
        self as i32
    }
}

/// Delivery address category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum AddressType {
    Home = 1,
    Office = 2,
}

impl AddressType {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(AddressType::Home),
            2 => Some(AddressType::Office),
            _ => None,
        }
    }
}

/// Menu card filter. Any unknown numeric id selects the whole menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuFilter {
    Veg,
    NonVeg,
    All,
}

impl MenuFilter {
    pub fn from_id(id: i32) -> Self {
        match FoodType::from_id(id) {
            Some(FoodType::Veg) => MenuFilter::Veg,
            Some(FoodType::NonVeg) => MenuFilter::NonVeg,
            None => MenuFilter::All,
        }
    }

    pub fn matches(self, food_type: FoodType) -> bool {
        match self {
            MenuFilter::Veg => food_type == FoodType::Veg,
            MenuFilter::NonVeg => food_type == FoodType::NonVeg,
            MenuFilter::All => true,
        }
    }

    /// Food type ids accepted by this filter, as bound into menu queries
    pub fn type_ids(self) -> Vec<i32> {
        match self {
            MenuFilter::Veg => vec![FoodType::Veg.id()],
            MenuFilter::NonVeg => vec![FoodType::NonVeg.id()],
            MenuFilter::All => vec![FoodType::Veg.id(), FoodType::NonVeg.id()],
        }
    }
}

/// Identifier a restaurant or user signs in with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginField {
    PhoneNumber,
    EmailId,
}

/// Profile column an update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    PhoneNumber,
    EmailId,
    Password,
}

impl ProfileField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::PhoneNumber => "phone_number",
            ProfileField::EmailId => "email_id",
            ProfileField::Password => "password",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_type_ids_round_trip() {
        assert_eq!(FoodType::from_id(FoodType::Veg.id()), Some(FoodType::Veg));
        assert_eq!(FoodType::from_id(FoodType::NonVeg.id()), Some(FoodType::NonVeg));
        assert_eq!(FoodType::from_id(0), None);
    }

    #[test]
    fn test_menu_filter_from_id() {
        assert_eq!(MenuFilter::from_id(1), MenuFilter::Veg);
        assert_eq!(MenuFilter::from_id(2), MenuFilter::NonVeg);
        assert_eq!(MenuFilter::from_id(3), MenuFilter::All);
        assert_eq!(MenuFilter::from_id(-1), MenuFilter::All);
    }

    #[test]
    fn test_menu_filter_matching() {
        assert!(MenuFilter::All.matches(FoodType::NonVeg));
        assert!(MenuFilter::Veg.matches(FoodType::Veg));
        assert!(!MenuFilter::Veg.matches(FoodType::NonVeg));
        assert_eq!(MenuFilter::All.type_ids(), vec![1, 2]);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&FoodType::NonVeg).unwrap(), "\"non_veg\"");
        let field: LoginField = serde_json::from_str("\"email_id\"").unwrap();
        assert_eq!(field, LoginField::EmailId);
    }
}
