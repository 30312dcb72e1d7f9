use crate::api::models::{IngredientId, IngredientPayload};
use crate::api::Backend;
use crate::store::Store;
use eframe::egui;

pub enum UpdateEvent {
    Closed,
    Saved(IngredientId),
}

/// Modal for creating an ingredient, or renaming one when `ingredient_id` is set.
pub struct IngredientFormModal {
    ingredient_id: Option<IngredientId>,
    name: String,
    validation_errors: Vec<String>,
    loaded: bool,
}

impl IngredientFormModal {
    pub fn new(ingredient_id: Option<IngredientId>) -> Self {
        Self {
            ingredient_id,
            name: String::new(),
            validation_errors: vec![],
            loaded: false,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.ingredient_id.is_some()
    }

    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    fn validate_name(&self) -> Vec<String> {
        let mut errors = vec![];
        if self.name.is_empty() {
            errors.push("An ingredient name is required.".to_owned());
        }
        let len = self.name.chars().count();
        if !(2..=120).contains(&len) {
            errors.push("Ingredient name must be between 2 and 120 characters.".to_owned());
        }
        errors
    }

    /// Fetches the ingredient being edited and fills in its current name.
    pub fn load(&mut self, store: &mut Store, backend: &dyn Backend) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        let Some(id) = self.ingredient_id else {
            return;
        };
        if let Err(error) = store.load_single_ingredient(backend, id) {
            self.validation_errors = error.messages();
        }
        if let Some(ingredient) = store.ingredient(id) {
            self.name = ingredient.name.clone();
        }
    }

    pub fn submit(&mut self, store: &mut Store, backend: &dyn Backend) -> Option<IngredientId> {
        let errors = self.validate_name();
        if !errors.is_empty() {
            self.validation_errors = errors;
            return None;
        }

        let payload = IngredientPayload {
            name: self.name.clone(),
        };
        let result = match self.ingredient_id {
            Some(id) => store.update_ingredient(backend, id, &payload),
            None => store.create_ingredient(backend, &payload),
        };
        match result {
            Ok(id) => {
                self.name.clear();
                self.validation_errors.clear();
                Some(id)
            }
            Err(error) => {
                self.validation_errors = error.messages();
                None
            }
        }
    }

    pub fn update(
        &mut self,
        ctx: &egui::Context,
        store: &mut Store,
        backend: &dyn Backend,
    ) -> Vec<UpdateEvent> {
        self.load(store, backend);

        let mut events = vec![];
        let title = if self.is_edit() {
            "Edit Ingredient"
        } else {
            "Create Ingredient"
        };
        egui::Window::new(title)
            .collapsible(false)
            .resizable([false, false])
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if store.session_user().is_none() {
                    super::must_log_in(ui, "content");
                    if ui.button("Close").clicked() {
                        events.push(UpdateEvent::Closed);
                    }
                    return;
                }

                for error in self.validation_errors() {
                    ui.colored_label(egui::Color32::RED, error);
                }
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.name)
                        .hint_text("Name")
                        .desired_width(250.0),
                );
                let entered =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.horizontal(|ui| {
                    let label = if self.is_edit() { "Update" } else { "Create" };
                    if ui.button(label).clicked() || entered {
                        if let Some(id) = self.submit(store, backend) {
                            events.push(UpdateEvent::Saved(id));
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        events.push(UpdateEvent::Closed);
                    }
                });
            });
        events
    }
}

#[test]
fn empty_name_shows_both_messages() {
    use crate::api::fake::FakeBackend;

    let backend = FakeBackend::new();
    let mut store = Store::default();
    let mut modal = IngredientFormModal::new(None);

    assert_eq!(modal.submit(&mut store, &backend), None);
    assert_eq!(
        modal.validation_errors(),
        [
            "An ingredient name is required.",
            "Ingredient name must be between 2 and 120 characters.",
        ]
    );

    modal.set_name(&"x".repeat(121));
    assert_eq!(modal.submit(&mut store, &backend), None);
    assert_eq!(
        modal.validation_errors(),
        ["Ingredient name must be between 2 and 120 characters."]
    );
    assert_eq!(backend.requests.get(), 0);
}

#[test]
fn create_ingredient() {
    use crate::api::fake::FakeBackend;

    let backend = FakeBackend::new();
    let mut store = Store::default();
    let mut modal = IngredientFormModal::new(None);
    modal.load(&mut store, &backend);
    assert_eq!(backend.requests.get(), 0);

    modal.set_name("saffron");
    let id = modal.submit(&mut store, &backend).unwrap();
    assert_eq!(store.ingredient(id).unwrap().name, "saffron");
    assert!(modal.validation_errors().is_empty());
}

#[test]
fn edit_prefills_and_renames() {
    use crate::api::fake::FakeBackend;
    use crate::api::models::Ingredient;
    use maplit::btreemap;

    let backend = FakeBackend::new().with_ingredients(&["garlic", "onion"]);
    let mut store = Store::default();
    let mut modal = IngredientFormModal::new(Some(IngredientId::new(2)));

    modal.load(&mut store, &backend);
    modal.load(&mut store, &backend);
    assert_eq!(backend.requests.get(), 1);
    assert_eq!(modal.name, "onion");

    modal.set_name("red onion");
    assert_eq!(
        modal.submit(&mut store, &backend),
        Some(IngredientId::new(2))
    );
    assert_eq!(store.ingredient(IngredientId::new(2)).unwrap().name, "red onion");

    let ingredient = |id, name: &str| Ingredient {
        id: IngredientId::new(id),
        name: name.into(),
    };
    assert_eq!(
        *backend.ingredients.borrow(),
        btreemap! {
            IngredientId::new(1) => ingredient(1, "garlic"),
            IngredientId::new(2) => ingredient(2, "red onion"),
        }
    );
}

#[test]
fn server_message_is_shown() {
    use crate::api::fake::FakeBackend;

    let backend = FakeBackend::new();
    let mut store = Store::default();
    let mut modal = IngredientFormModal::new(None);
    modal.set_name("salt");

    backend.fail_next(401, &["Authentication required"]);
    assert_eq!(modal.submit(&mut store, &backend), None);
    assert_eq!(modal.validation_errors(), ["Authentication required"]);
    assert_eq!(store.ingredients().count(), 0);
}
