//! Catalog persistence

use redb::ReadableTable;
use shared::models::{Restaurant, RestaurantCreate};
use shared::util;

use crate::db::{Db, RESTAURANTS_TABLE, StoreResult};

#[derive(Clone, Debug)]
pub struct CatalogStore {
    db: Db,
}

impl CatalogStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn create(&self, data: RestaurantCreate) -> StoreResult<Restaurant> {
        let restaurant = Restaurant {
            id: util::new_id(),
            name: data.name,
            cuisine: data.cuisine,
            menu: data.menu,
            created_at: util::now_millis(),
        };
        self.insert(&restaurant)?;
        Ok(restaurant)
    }

    pub fn insert(&self, restaurant: &Restaurant) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(RESTAURANTS_TABLE)?;
            let value = serde_json::to_vec(restaurant)?;
            table.insert(restaurant.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get(&self, restaurant_id: &str) -> StoreResult<Option<Restaurant>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESTAURANTS_TABLE)?;
        match table.get(restaurant_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All restaurants, sorted by name.
    pub fn list(&self) -> StoreResult<Vec<Restaurant>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESTAURANTS_TABLE)?;

        let mut restaurants = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let restaurant: Restaurant = serde_json::from_slice(value.value())?;
            restaurants.push(restaurant);
        }

        restaurants.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(restaurants)
    }

    /// Resolve a display name.
    pub fn name_of(&self, restaurant_id: &str) -> StoreResult<Option<String>> {
        Ok(self.get(restaurant_id)?.map(|r| r.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::MenuItem;

    fn test_catalog() -> CatalogStore {
        CatalogStore::new(Db::open_in_memory().unwrap())
    }

    #[test]
    fn test_create_and_resolve_name() {
        let catalog = test_catalog();
        let created = catalog
            .create(RestaurantCreate {
                name: "Pizzeria Uno".to_string(),
                cuisine: Some("Italian".to_string()),
                menu: vec![MenuItem {
                    name: "Margherita".to_string(),
                    price: 9.5,
                    category: Some("pizza".to_string()),
                }],
            })
            .unwrap();

        assert_eq!(
            catalog.name_of(&created.id).unwrap().as_deref(),
            Some("Pizzeria Uno")
        );
        assert!(catalog.name_of("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_sorted_by_name() {
        let catalog = test_catalog();
        for name in ["Zen Sushi", "Alma Tapas", "Pizzeria Uno"] {
            catalog
                .create(RestaurantCreate {
                    name: name.to_string(),
                    cuisine: None,
                    menu: vec![],
                })
                .unwrap();
        }

        let names: Vec<String> = catalog.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["Alma Tapas", "Pizzeria Uno", "Zen Sushi"]);
    }
}
