pub mod address;
pub mod cart;
pub mod food;
pub mod order;
pub mod restaurant;
pub mod user;

// Re-export core models for easy access
pub use address::{Address, NewAddress};
pub use cart::{AddToCart, CartItem, CartLine};
pub use food::{Food, NewFood, RestaurantFood};
pub use order::{OrderDetail, PlaceOrder};
pub use restaurant::{NewRestaurant, Restaurant};
pub use user::{NewUser, User};
