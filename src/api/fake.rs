// Copyright 2023 Remi Bernotavicius

use super::models::{
    Food, FoodId, FoodPayload, Ingredient, IngredientId, IngredientPayload, User, UserId,
};
use super::{Backend, Error, Result};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// In-memory stand-in for the REST server.
pub struct FakeBackend {
    pub user: Option<User>,
    pub foods: RefCell<BTreeMap<FoodId, Food>>,
    pub ingredients: RefCell<BTreeMap<IngredientId, Ingredient>>,
    pub food_payloads: RefCell<Vec<FoodPayload>>,
    pub requests: Cell<usize>,
    fail_with: RefCell<Option<(u16, Vec<String>)>>,
    next_id: Cell<i32>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            user: Some(User {
                id: UserId::new(1),
                username: "demo".into(),
                email: None,
            }),
            foods: Default::default(),
            ingredients: Default::default(),
            food_payloads: Default::default(),
            requests: Cell::new(0),
            fail_with: RefCell::new(None),
            next_id: Cell::new(100),
        }
    }

    pub fn with_ingredients(self, names: &[&str]) -> Self {
        for (i, name) in names.iter().enumerate() {
            let id = IngredientId::new(i as i32 + 1);
            self.ingredients.borrow_mut().insert(
                id,
                Ingredient {
                    id,
                    name: name.to_string(),
                },
            );
        }
        self
    }

    pub fn with_food(self, food: Food) -> Self {
        self.foods.borrow_mut().insert(food.id, food);
        self
    }

    /// The next request fails with the given status and messages.
    pub fn fail_next(&self, status: u16, messages: &[&str]) {
        *self.fail_with.borrow_mut() = Some((
            status,
            messages.iter().map(|m| m.to_string()).collect(),
        ));
    }

    fn request(&self) -> Result<()> {
        self.requests.set(self.requests.get() + 1);
        match self.fail_with.borrow_mut().take() {
            Some((status, messages)) => Err(Error::Server { status, messages }),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> i32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn not_found(what: &str) -> Error {
        Error::Server {
            status: 404,
            messages: vec![format!("{what} couldn't be found")],
        }
    }

    fn save_food(&self, id: FoodId, payload: &FoodPayload) -> Food {
        self.food_payloads.borrow_mut().push(payload.clone());
        let food = Food {
            id,
            name: payload.name.clone(),
            img_url: payload.img_url.clone(),
            cuisine: payload.cuisine.clone(),
            creator_id: UserId::new(1),
            ingredients: payload.ingredients.clone(),
        };
        self.foods.borrow_mut().insert(id, food.clone());
        food
    }
}

impl Backend for FakeBackend {
    fn session(&self) -> Result<Option<User>> {
        self.request()?;
        Ok(self.user.clone())
    }

    fn foods(&self) -> Result<Vec<Food>> {
        self.request()?;
        Ok(self.foods.borrow().values().cloned().collect())
    }

    fn food(&self, id: FoodId) -> Result<Food> {
        self.request()?;
        self.foods
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found("Food"))
    }

    fn create_food(&self, food: &FoodPayload) -> Result<Food> {
        self.request()?;
        Ok(self.save_food(FoodId::new(self.next_id()), food))
    }

    fn update_food(&self, id: FoodId, food: &FoodPayload) -> Result<Food> {
        self.request()?;
        if !self.foods.borrow().contains_key(&id) {
            return Err(Self::not_found("Food"));
        }
        Ok(self.save_food(id, food))
    }

    fn delete_food(&self, id: FoodId) -> Result<()> {
        self.request()?;
        self.foods
            .borrow_mut()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("Food"))
    }

    fn ingredients(&self) -> Result<Vec<Ingredient>> {
        self.request()?;
        Ok(self.ingredients.borrow().values().cloned().collect())
    }

    fn ingredient(&self, id: IngredientId) -> Result<Ingredient> {
        self.request()?;
        self.ingredients
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found("Ingredient"))
    }

    fn create_ingredient(&self, ingredient: &IngredientPayload) -> Result<Ingredient> {
        self.request()?;
        let id = IngredientId::new(self.next_id());
        let ingredient = Ingredient {
            id,
            name: ingredient.name.clone(),
        };
        self.ingredients.borrow_mut().insert(id, ingredient.clone());
        Ok(ingredient)
    }

    fn update_ingredient(
        &self,
        id: IngredientId,
        ingredient: &IngredientPayload,
    ) -> Result<Ingredient> {
        self.request()?;
        let mut ingredients = self.ingredients.borrow_mut();
        let existing = ingredients
            .get_mut(&id)
            .ok_or_else(|| Self::not_found("Ingredient"))?;
        existing.name = ingredient.name.clone();
        Ok(existing.clone())
    }
}
