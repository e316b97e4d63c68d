//! # Catalog Seeding
//!
//! Loads restaurants and their menu cards from a YAML catalog:
//!
//! ```yaml
//! restaurants:
//!   - name: Adyar Bakery
//!     menu:
//!       - { name: Veg Puff, rate: 25.0, type: veg, quantity: 40 }
//! ```
//!
//! Every entry is checked before anything is written. Restaurants go in as
//! one batch, then the combined menu card as a second batch.

use crate::error::{SwiggyError, SwiggyResult};
use crate::models::NewFood;
use crate::services::RestaurantService;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub restaurants: Vec<CatalogRestaurant>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogRestaurant {
    pub name: String,
    #[serde(default)]
    pub menu: Vec<NewFood>,
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub restaurants: usize,
    pub foods: usize,
    /// True when the catalog was not applied because restaurants already existed
    pub skipped: bool,
}

impl Catalog {
    pub fn from_path(path: &Path) -> SwiggyResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            SwiggyError::Seed(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> SwiggyResult<Self> {
        let catalog: Catalog = serde_yaml::from_str(contents)
            .map_err(|e| SwiggyError::Seed(format!("malformed catalog: {e}")))?;
        catalog.check()?;
        Ok(catalog)
    }

    fn check(&self) -> SwiggyResult<()> {
        for (r, restaurant) in self.restaurants.iter().enumerate() {
            if restaurant.name.trim().is_empty() {
                return Err(SwiggyError::Seed(format!(
                    "restaurants[{r}]: name must not be empty"
                )));
            }
            for (f, food) in restaurant.menu.iter().enumerate() {
                food.validate().map_err(|errors| {
                    SwiggyError::Seed(format!(
                        "restaurants[{r}].menu[{f}]: {}",
                        crate::validation::describe(&errors)
                    ))
                })?;
            }
        }
        Ok(())
    }
}

/// Applies a [`Catalog`] through the restaurant service
#[derive(Clone)]
pub struct CatalogSeeder {
    restaurants: RestaurantService,
    skip_if_populated: bool,
}

impl CatalogSeeder {
    pub fn new(restaurants: RestaurantService, skip_if_populated: bool) -> Self {
        Self {
            restaurants,
            skip_if_populated,
        }
    }

    pub async fn seed_from_path(&self, path: &Path) -> SwiggyResult<SeedReport> {
        let catalog = Catalog::from_path(path)?;
        self.seed(&catalog).await
    }

    pub async fn seed(&self, catalog: &Catalog) -> SwiggyResult<SeedReport> {
        if self.skip_if_populated && self.restaurants.count().await? > 0 {
            info!("Restaurants already present, catalog seeding skipped");
            return Ok(SeedReport {
                skipped: true,
                ..SeedReport::default()
            });
        }

        let names: Vec<String> = catalog
            .restaurants
            .iter()
            .map(|restaurant| restaurant.name.clone())
            .collect();
        let created = self.restaurants.load_restaurant_list(&names).await?;

        let entries: Vec<(i64, NewFood)> = created
            .iter()
            .zip(&catalog.restaurants)
            .flat_map(|(restaurant, entry)| {
                entry.menu.iter().map(move |food| (restaurant.id, food.clone()))
            })
            .collect();
        let foods = self.restaurants.load_menu_card(&entries).await?;

        info!(
            restaurants = created.len(),
            foods = foods.len(),
            "Catalog seeded"
        );
        Ok(SeedReport {
            restaurants: created.len(),
            foods: foods.len(),
            skipped: false,
        })
    }
}
