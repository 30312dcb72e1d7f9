use crate::api::models::{
    Food, FoodId, FoodPayload, Ingredient, IngredientId, IngredientPayload, User,
};
use crate::api::{self, Backend};
use std::collections::BTreeMap;

pub enum Action {
    LoadAllFoods(Vec<Food>),
    LoadFood(Food),
    RemoveFood(FoodId),
    LoadAllIngredients(Vec<Ingredient>),
    LoadIngredient(Ingredient),
    SetSession(Option<User>),
}

/// Everything the client knows about the server, keyed by id.
#[derive(Default)]
pub struct Store {
    foods: BTreeMap<FoodId, Food>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    session: Option<User>,
}

impl Store {
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::LoadAllFoods(foods) => {
                self.foods = foods.into_iter().map(|f| (f.id, f)).collect();
            }
            Action::LoadFood(food) => {
                self.foods.insert(food.id, food);
            }
            Action::RemoveFood(id) => {
                self.foods.remove(&id);
            }
            Action::LoadAllIngredients(ingredients) => {
                self.ingredients = ingredients.into_iter().map(|i| (i.id, i)).collect();
            }
            Action::LoadIngredient(ingredient) => {
                self.ingredients.insert(ingredient.id, ingredient);
            }
            Action::SetSession(user) => {
                self.session = user;
            }
        }
    }

    pub fn foods(&self) -> impl Iterator<Item = &Food> {
        self.foods.values()
    }

    pub fn food(&self, id: FoodId) -> Option<&Food> {
        self.foods.get(&id)
    }

    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    pub fn session_user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn load_session(&mut self, backend: &dyn Backend) -> api::Result<()> {
        let user = backend.session()?;
        log::info!(
            "session user: {}",
            user.as_ref().map(|u| u.username.as_str()).unwrap_or("<none>")
        );
        self.dispatch(Action::SetSession(user));
        Ok(())
    }

    pub fn load_all_foods(&mut self, backend: &dyn Backend) -> api::Result<()> {
        let foods = backend.foods()?;
        self.dispatch(Action::LoadAllFoods(foods));
        Ok(())
    }

    pub fn load_single_food(&mut self, backend: &dyn Backend, id: FoodId) -> api::Result<()> {
        let food = backend.food(id)?;
        self.dispatch(Action::LoadFood(food));
        Ok(())
    }

    pub fn create_food(
        &mut self,
        backend: &dyn Backend,
        payload: &FoodPayload,
    ) -> api::Result<FoodId> {
        let food = backend.create_food(payload)?;
        let id = food.id;
        log::info!("created food {id} {:?}", food.name);
        self.dispatch(Action::LoadFood(food));
        Ok(id)
    }

    pub fn update_food(
        &mut self,
        backend: &dyn Backend,
        id: FoodId,
        payload: &FoodPayload,
    ) -> api::Result<FoodId> {
        let food = backend.update_food(id, payload)?;
        let id = food.id;
        log::info!("updated food {id}");
        self.dispatch(Action::LoadFood(food));
        Ok(id)
    }

    pub fn delete_food(&mut self, backend: &dyn Backend, id: FoodId) -> api::Result<()> {
        backend.delete_food(id)?;
        log::info!("deleted food {id}");
        self.dispatch(Action::RemoveFood(id));
        Ok(())
    }

    pub fn load_all_ingredients(&mut self, backend: &dyn Backend) -> api::Result<()> {
        let ingredients = backend.ingredients()?;
        self.dispatch(Action::LoadAllIngredients(ingredients));
        Ok(())
    }

    pub fn load_single_ingredient(
        &mut self,
        backend: &dyn Backend,
        id: IngredientId,
    ) -> api::Result<()> {
        let ingredient = backend.ingredient(id)?;
        self.dispatch(Action::LoadIngredient(ingredient));
        Ok(())
    }

    pub fn create_ingredient(
        &mut self,
        backend: &dyn Backend,
        payload: &IngredientPayload,
    ) -> api::Result<IngredientId> {
        let ingredient = backend.create_ingredient(payload)?;
        let id = ingredient.id;
        log::info!("created ingredient {id} {:?}", ingredient.name);
        self.dispatch(Action::LoadIngredient(ingredient));
        Ok(id)
    }

    pub fn update_ingredient(
        &mut self,
        backend: &dyn Backend,
        id: IngredientId,
        payload: &IngredientPayload,
    ) -> api::Result<IngredientId> {
        let ingredient = backend.update_ingredient(id, payload)?;
        let id = ingredient.id;
        self.dispatch(Action::LoadIngredient(ingredient));
        Ok(id)
    }
}

#[cfg(test)]
fn test_food(id: i32, name: &str) -> Food {
    use crate::api::models::UserId;

    Food {
        id: FoodId::new(id),
        name: name.into(),
        img_url: String::new(),
        cuisine: "Italian".into(),
        creator_id: UserId::new(1),
        ingredients: vec![],
    }
}

#[test]
fn load_all_foods_replaces_store() {
    use crate::api::fake::FakeBackend;

    let backend = FakeBackend::new()
        .with_food(test_food(1, "Lasagna"))
        .with_food(test_food(2, "Risotto"));
    let mut store = Store::default();
    store.dispatch(Action::LoadFood(test_food(9, "Stale")));

    store.load_all_foods(&backend).unwrap();
    let names: Vec<_> = store.foods().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Lasagna", "Risotto"]);
}

#[test]
fn failed_request_leaves_store_unchanged() {
    use crate::api::fake::FakeBackend;

    let backend = FakeBackend::new().with_ingredients(&["basil", "garlic"]);
    let mut store = Store::default();
    store.load_all_ingredients(&backend).unwrap();

    backend.fail_next(500, &["database unavailable"]);
    let error = store.load_all_ingredients(&backend).unwrap_err();
    assert_eq!(error.messages(), vec!["database unavailable"]);
    assert_eq!(store.ingredients().count(), 2);

    backend.fail_next(404, &["Food couldn't be found"]);
    store.delete_food(&backend, FoodId::new(1)).unwrap_err();
}

#[test]
fn create_then_delete_food() {
    use crate::api::fake::FakeBackend;

    let backend = FakeBackend::new();
    let mut store = Store::default();
    let payload = FoodPayload {
        name: "Ramen".into(),
        img_url: String::new(),
        cuisine: "Japanese".into(),
        ingredients: vec![],
    };
    let id = store.create_food(&backend, &payload).unwrap();
    assert_eq!(store.food(id).unwrap().name, "Ramen");

    store.delete_food(&backend, id).unwrap();
    assert!(store.food(id).is_none());
}

#[test]
fn session_is_loaded() {
    use crate::api::fake::FakeBackend;

    let mut backend = FakeBackend::new();
    let mut store = Store::default();
    store.load_session(&backend).unwrap();
    assert_eq!(store.session_user().unwrap().username, "demo");

    backend.user = None;
    store.load_session(&backend).unwrap();
    assert!(store.session_user().is_none());
}
