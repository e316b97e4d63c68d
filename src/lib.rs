#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Swiggy Core
//!
//! Food-delivery marketplace core: restaurant catalog, customer accounts,
//! carts and transactional order placement.
//!
//! ## Architecture
//!
//! Services sit on top of storage traits with two backends. PostgreSQL
//! through sqlx is the production backend; an in-process backend serves
//! local runs and tests. Both apply the same cart and order rules from
//! [`rules`].
//!
//! ## Module Organization
//!
//! - [`services`] - restaurant, user, cart and order services
//! - [`store`] - storage traits, [`store::PgStore`] and [`store::MemoryStore`]
//! - [`models`] - row types and per-table SQL
//! - [`rules`] - cart merge, single-restaurant and stock decisions
//! - [`context`] - [`Marketplace`] dependency container
//! - [`seed`] - YAML catalog seeding
//! - [`config`] - layered configuration
//! - [`database`] - connection pool and migrations
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use swiggy_core::constants::MenuFilter;
//! use swiggy_core::Marketplace;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let marketplace = Marketplace::new().await?;
//!
//! for restaurant in marketplace.restaurants.list().await? {
//!     let menu = marketplace
//!         .restaurants
//!         .menu_card(restaurant.id, MenuFilter::Veg)
//!         .await?;
//!     println!("{}: {} veg dishes", restaurant.name, menu.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The in-memory backend needs no database:
//!
//! ```rust
//! use swiggy_core::constants::{FoodType, MenuFilter};
//! use swiggy_core::models::NewFood;
//! use swiggy_core::Marketplace;
//!
//! # tokio_test::block_on(async {
//! let marketplace = Marketplace::in_memory().unwrap();
//! let kitchens = marketplace
//!     .restaurants
//!     .load_restaurant_list(&["Murugan Idli Shop".to_string()])
//!     .await
//!     .unwrap();
//!
//! let idli = NewFood {
//!     name: "Ghee Podi Idli".to_string(),
//!     rate: 60.0,
//!     food_type: FoodType::Veg,
//!     quantity: 25,
//! };
//! marketplace.restaurants.add_food(kitchens[0].id, &idli).await.unwrap();
//!
//! let menu = marketplace
//!     .restaurants
//!     .menu_card(kitchens[0].id, MenuFilter::Veg)
//!     .await
//!     .unwrap();
//! assert_eq!(menu.len(), 1);
//! # });
//! ```
//!
//! ## Testing
//!
//! Unit and service tests run against the in-memory backend. PostgreSQL
//! integration tests need `DATABASE_URL` and the `test-database` feature:
//!
//! ```bash
//! cargo test --features test-database
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod password;
pub mod rules;
pub mod seed;
pub mod services;
pub mod store;
pub mod validation;

pub use config::{AppConfig, ConfigManager};
pub use context::Marketplace;
pub use error::{SwiggyError, SwiggyResult};
pub use seed::{CatalogSeeder, SeedReport};
pub use services::{CartService, OrderService, RestaurantService, UserService};
