//! Dish catalog lookup
//!
//! The engine never owns the menu. It only asks "how long does this dish
//! take" through [`DishLookup`]. [`CatalogService`] is an in-memory cache the
//! host application keeps in sync with its own menu source.

use parking_lot::RwLock;
use shared::models::Dish;
use std::collections::HashMap;

/// Read-only dish lookup by ID
pub trait DishLookup {
    fn lookup(&self, dish_id: &str) -> Option<Dish>;

    /// Preparation time for one unit, `None` when the dish is unknown
    fn prep_time_minutes(&self, dish_id: &str) -> Option<i64> {
        self.lookup(dish_id).map(|d| d.prep_time_minutes)
    }
}

impl DishLookup for HashMap<String, Dish> {
    fn lookup(&self, dish_id: &str) -> Option<Dish> {
        self.get(dish_id).cloned()
    }

    fn prep_time_minutes(&self, dish_id: &str) -> Option<i64> {
        self.get(dish_id).map(|d| d.prep_time_minutes)
    }
}

/// In-memory dish catalog
#[derive(Debug, Default)]
pub struct CatalogService {
    dishes: RwLock<HashMap<String, Dish>>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dishes(dishes: impl IntoIterator<Item = Dish>) -> Self {
        let map = dishes.into_iter().map(|d| (d.id.clone(), d)).collect();
        Self {
            dishes: RwLock::new(map),
        }
    }

    /// Insert or replace a dish
    pub fn upsert(&self, dish: Dish) {
        tracing::debug!(dish_id = %dish.id, prep_time = dish.prep_time_minutes, "Catalog dish upserted");
        self.dishes.write().insert(dish.id.clone(), dish);
    }

    pub fn remove(&self, dish_id: &str) -> Option<Dish> {
        self.dishes.write().remove(dish_id)
    }

    /// All dishes sorted by name
    pub fn list(&self) -> Vec<Dish> {
        let mut dishes: Vec<Dish> = self.dishes.read().values().cloned().collect();
        dishes.sort_by(|a, b| a.name.cmp(&b.name));
        dishes
    }

    pub fn len(&self) -> usize {
        self.dishes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.read().is_empty()
    }
}

impl DishLookup for CatalogService {
    fn lookup(&self, dish_id: &str) -> Option<Dish> {
        self.dishes.read().get(dish_id).cloned()
    }

    fn prep_time_minutes(&self, dish_id: &str) -> Option<i64> {
        self.dishes.read().get(dish_id).map(|d| d.prep_time_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_upsert_and_lookup() {
        let catalog = CatalogService::new();
        assert!(catalog.is_empty());

        catalog.upsert(Dish::new("ceviche", "Ceviche", 20));
        assert_eq!(catalog.prep_time_minutes("ceviche"), Some(20));

        catalog.upsert(Dish::new("ceviche", "Ceviche", 25));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.prep_time_minutes("ceviche"), Some(25));
    }

    #[test]
    fn test_catalog_unknown_dish() {
        let catalog = CatalogService::with_dishes([Dish::new("a", "A", 5)]);
        assert!(catalog.lookup("missing").is_none());
        assert!(catalog.prep_time_minutes("missing").is_none());
    }

    #[test]
    fn test_catalog_remove_and_list() {
        let catalog = CatalogService::with_dishes([
            Dish::new("b", "Lomo saltado", 25),
            Dish::new("a", "Causa", 10),
        ]);
        let names: Vec<String> = catalog.list().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Causa".to_string(), "Lomo saltado".to_string()]);

        assert!(catalog.remove("a").is_some());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_hashmap_lookup() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), Dish::new("a", "A", 7));
        assert_eq!(map.prep_time_minutes("a"), Some(7));
        assert_eq!(map.lookup("a").map(|d| d.name), Some("A".to_string()));
    }
}
