use super::new_error_toast;
use crate::api::models::{Food, FoodId, FoodPayload, IngredientId, IngredientLine};
use crate::api::{self, Backend};
use crate::store::Store;
use eframe::egui;
use thiserror::Error;

const NAME_LENGTH: std::ops::RangeInclusive<usize> = 2..=120;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("ingredient row {index} is out of range, there are {len} rows")]
pub struct RowOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// One ingredient line as it is being typed in. Nothing is parsed until the form is submitted.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct IngredientRow {
    pub ingredient_id: Option<IngredientId>,
    pub quantity: String,
    pub units: String,
}

impl IngredientRow {
    fn from_line(line: &IngredientLine) -> Self {
        Self {
            ingredient_id: Some(line.ingredient_id),
            quantity: line.quantity.to_string(),
            units: line.units.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct FoodDraft {
    pub name: String,
    pub img_url: String,
    pub cuisine: String,
    pub rows: Vec<IngredientRow>,
}

impl Default for FoodDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            img_url: String::new(),
            cuisine: String::new(),
            rows: vec![IngredientRow::default()],
        }
    }
}

impl FoodDraft {
    fn from_food(food: &Food) -> Self {
        Self {
            name: food.name.clone(),
            img_url: food.img_url.clone(),
            cuisine: food.cuisine.clone(),
            rows: food.ingredients.iter().map(IngredientRow::from_line).collect(),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];
        if self.name.is_empty() {
            errors.push("A food name is required.".to_owned());
        }
        if !NAME_LENGTH.contains(&self.name.chars().count()) {
            errors.push("Food name must be between 2 and 120 characters.".to_owned());
        }
        if self.cuisine.is_empty() {
            errors.push("A cuisine is required.".to_owned());
        }
        for (i, row) in self.rows.iter().enumerate() {
            let n = i + 1;
            if row.ingredient_id.is_none() {
                errors.push(format!("Select an ingredient for row {n}."));
            }
            if parse_quantity(&row.quantity).is_none() {
                errors.push(format!("Quantity for row {n} must be a positive number."));
            }
        }
        errors
    }

    /// Converts the draft into what gets sent to the server, or the reasons it can't be.
    pub fn payload(&self) -> Result<FoodPayload, Vec<String>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let ingredients = self
            .rows
            .iter()
            .filter_map(|row| {
                Some(IngredientLine {
                    ingredient_id: row.ingredient_id?,
                    quantity: parse_quantity(&row.quantity)?,
                    units: row.units.trim().to_owned(),
                })
            })
            .collect();
        Ok(FoodPayload {
            name: self.name.clone(),
            img_url: self.img_url.trim().to_owned(),
            cuisine: self.cuisine.clone(),
            ingredients,
        })
    }
}

fn parse_quantity(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite() && *q > 0.0)
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum FormMode {
    Create,
    Edit(FoodId),
}

pub enum UpdateEvent {
    Saved(FoodId),
}

/// A change made to one ingredient row through its widgets.
#[derive(Debug, PartialEq)]
enum RowEdit {
    Update(IngredientRow),
    Remove,
}

pub struct FoodForm {
    mode: FormMode,
    draft: FoodDraft,
    validation_errors: Vec<String>,
    hydrated: bool,
    loaded: bool,
}

impl FoodForm {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            draft: FoodDraft::default(),
            validation_errors: vec![],
            hydrated: false,
            loaded: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &FoodDraft {
        &self.draft
    }

    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    fn check_index(&self, index: usize) -> Result<(), RowOutOfRange> {
        let len = self.draft.rows.len();
        if index < len {
            Ok(())
        } else {
            Err(RowOutOfRange { index, len })
        }
    }

    pub fn add_row(&mut self) {
        self.draft.rows.push(IngredientRow::default());
    }

    pub fn update_row(&mut self, index: usize, row: IngredientRow) -> Result<(), RowOutOfRange> {
        self.check_index(index)?;
        self.draft.rows[index] = row;
        Ok(())
    }

    pub fn remove_row(&mut self, index: usize) -> Result<IngredientRow, RowOutOfRange> {
        self.check_index(index)?;
        Ok(self.draft.rows.remove(index))
    }

    /// Copies the food being edited into the draft. Only the first call does anything, so a
    /// later refresh of the store doesn't throw away what the user typed.
    pub fn hydrate(&mut self, food: &Food) {
        if self.hydrated || self.mode != FormMode::Edit(food.id) {
            return;
        }
        self.draft = FoodDraft::from_food(food);
        self.hydrated = true;
    }

    pub fn reset(&mut self) {
        self.draft = FoodDraft::default();
        self.validation_errors.clear();
    }

    /// Sends the draft to the server. Returns the id of the saved food, or `None` if validation
    /// or the request failed, in which case the messages are in `validation_errors`.
    pub fn submit(&mut self, store: &mut Store, backend: &dyn Backend) -> Option<FoodId> {
        let payload = match self.draft.payload() {
            Ok(payload) => payload,
            Err(errors) => {
                self.validation_errors = errors;
                return None;
            }
        };

        let result = match self.mode {
            FormMode::Create => store.create_food(backend, &payload),
            FormMode::Edit(id) => store.update_food(backend, id, &payload),
        };
        match result {
            Ok(id) => {
                self.reset();
                Some(id)
            }
            Err(error) => {
                self.validation_errors = error.messages();
                None
            }
        }
    }

    fn load(&mut self, store: &mut Store, backend: &dyn Backend) -> api::Result<()> {
        store.load_all_ingredients(backend)?;
        if let FormMode::Edit(id) = self.mode {
            store.load_single_food(backend, id)?;
        }
        Ok(())
    }

    fn update_row_ui(
        store: &Store,
        index: usize,
        row: &IngredientRow,
        ui: &mut egui::Ui,
    ) -> Option<RowEdit> {
        let mut edited = row.clone();
        let removed = ui
            .horizontal(|ui| {
                let selected = edited
                    .ingredient_id
                    .and_then(|id| store.ingredient(id))
                    .map(|i| i.name.clone())
                    .unwrap_or_else(|| "Select an ingredient...".into());
                egui::ComboBox::from_id_salt(("food ingredient", index))
                    .selected_text(selected)
                    .width(200.0)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut edited.ingredient_id,
                            None,
                            "Select an ingredient...",
                        );
                        for ingredient in store.ingredients() {
                            ui.selectable_value(
                                &mut edited.ingredient_id,
                                Some(ingredient.id),
                                &ingredient.name,
                            );
                        }
                    });
                ui.add(
                    egui::TextEdit::singleline(&mut edited.quantity)
                        .hint_text("Quantity")
                        .desired_width(80.0),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut edited.units)
                        .hint_text("Units")
                        .desired_width(80.0),
                );
                ui.button(egui::RichText::new("✕").color(egui::Color32::RED))
                    .clicked()
            })
            .inner;

        if removed {
            Some(RowEdit::Remove)
        } else if &edited != row {
            Some(RowEdit::Update(edited))
        } else {
            None
        }
    }

    fn apply_row_edit(&mut self, index: usize, edit: RowEdit) -> Result<(), RowOutOfRange> {
        match edit {
            RowEdit::Update(row) => self.update_row(index, row),
            RowEdit::Remove => self.remove_row(index).map(|_| ()),
        }
    }

    pub fn update(
        &mut self,
        ui: &mut egui::Ui,
        store: &mut Store,
        backend: &dyn Backend,
        toasts: &mut egui_toast::Toasts,
    ) -> Vec<UpdateEvent> {
        let mut events = vec![];
        if !self.loaded {
            self.loaded = true;
            if let Err(error) = self.load(store, backend) {
                toasts.add(new_error_toast(error.to_string()));
            }
        }
        if let FormMode::Edit(id) = self.mode {
            if let Some(food) = store.food(id).cloned() {
                self.hydrate(&food);
            }
        }

        if store.session_user().is_none() {
            super::must_log_in(ui, "page");
            return events;
        }

        ui.vertical_centered(|ui| {
            ui.heading(match self.mode {
                FormMode::Create => "Create a new food",
                FormMode::Edit(_) => "Edit Food",
            });
        });
        ui.add_space(10.0);

        for error in self.validation_errors() {
            ui.colored_label(egui::Color32::RED, error);
        }

        egui::Grid::new("food form fields")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Name:");
                ui.add(egui::TextEdit::singleline(&mut self.draft.name).hint_text("Name"));
                ui.end_row();

                ui.label("Image url:");
                ui.add(egui::TextEdit::singleline(&mut self.draft.img_url).hint_text("Image url"));
                ui.end_row();

                ui.label("Cuisine:");
                ui.add(egui::TextEdit::singleline(&mut self.draft.cuisine).hint_text("Cuisine"));
                ui.end_row();
            });

        ui.separator();
        ui.label("Ingredients");
        let scroll_height = (ui.available_height() - 70.0).max(100.0);
        let mut row_edit = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height(scroll_height)
            .show(ui, |ui| {
                for (index, row) in self.draft.rows.iter().enumerate() {
                    if let Some(edit) = Self::update_row_ui(store, index, row, ui) {
                        row_edit = Some((index, edit));
                    }
                }
            });
        if let Some((index, edit)) = row_edit {
            if let Err(error) = self.apply_row_edit(index, edit) {
                toasts.add(new_error_toast(error.to_string()));
            }
        }

        if ui.button("Add Ingredient").clicked() {
            self.add_row();
        }

        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            let label = match self.mode {
                FormMode::Create => "Create this food",
                FormMode::Edit(_) => "Update this food",
            };
            if ui.button(label).clicked() {
                if let Some(id) = self.submit(store, backend) {
                    events.push(UpdateEvent::Saved(id));
                }
            }
        });

        events
    }
}

#[cfg(test)]
fn row(ingredient: i32, quantity: &str, units: &str) -> IngredientRow {
    IngredientRow {
        ingredient_id: Some(IngredientId::new(ingredient)),
        quantity: quantity.into(),
        units: units.into(),
    }
}

#[cfg(test)]
fn filled_form(rows: Vec<IngredientRow>) -> FoodForm {
    let mut form = FoodForm::new(FormMode::Create);
    form.draft.name = "Caprese".into();
    form.draft.cuisine = "Italian".into();
    form.draft.rows = rows;
    form
}

#[test]
fn starts_with_one_empty_row() {
    let form = FoodForm::new(FormMode::Create);
    assert_eq!(form.draft().rows, vec![IngredientRow::default()]);
}

#[test]
fn add_and_update_rows() {
    let mut form = FoodForm::new(FormMode::Create);
    form.add_row();
    form.update_row(1, row(3, "2", "cups")).unwrap();
    form.update_row(0, row(7, "1.5", "tbsp")).unwrap();

    assert_eq!(form.draft().rows, vec![row(7, "1.5", "tbsp"), row(3, "2", "cups")]);
}

#[test]
fn remove_row_shifts_later_rows_down() {
    let mut form = filled_form(vec![
        row(1, "1", "cup"),
        row(2, "2", "tbsp"),
        row(3, "3", "g"),
        row(4, "4", "oz"),
    ]);

    let removed = form.remove_row(1).unwrap();
    assert_eq!(removed, row(2, "2", "tbsp"));
    assert_eq!(
        form.draft().rows,
        vec![row(1, "1", "cup"), row(3, "3", "g"), row(4, "4", "oz")]
    );

    form.remove_row(0).unwrap();
    form.remove_row(1).unwrap();
    form.remove_row(0).unwrap();
    assert!(form.draft().rows.is_empty());
}

#[test]
fn out_of_range_rows_are_rejected() {
    let mut form = filled_form(vec![row(1, "1", "cup")]);
    let before = form.draft().clone();

    assert_eq!(
        form.remove_row(1),
        Err(RowOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(
        form.update_row(5, row(2, "1", "")),
        Err(RowOutOfRange { index: 5, len: 1 })
    );
    assert!(form.update_row(1, IngredientRow::default()).is_err());
    assert_eq!(form.draft(), &before);
}

#[test]
fn short_name_blocks_submission() {
    use crate::api::fake::FakeBackend;

    let backend = FakeBackend::new();
    let mut store = Store::default();
    let mut form = filled_form(vec![row(1, "1", "cup")]);
    form.draft.name = "A".into();

    assert_eq!(form.submit(&mut store, &backend), None);
    assert_eq!(
        form.validation_errors(),
        ["Food name must be between 2 and 120 characters."]
    );
    assert_eq!(backend.requests.get(), 0);
    assert_eq!(form.draft().name, "A");
}

#[test]
fn incomplete_rows_block_submission() {
    use crate::api::fake::FakeBackend;

    let backend = FakeBackend::new();
    let mut store = Store::default();
    let mut form = filled_form(vec![row(1, "1", "cup"), IngredientRow::default()]);
    form.draft.cuisine.clear();
    form.update_row(0, row(1, "-2", "cup")).unwrap();

    assert_eq!(form.submit(&mut store, &backend), None);
    assert_eq!(
        form.validation_errors(),
        [
            "A cuisine is required.",
            "Quantity for row 1 must be a positive number.",
            "Select an ingredient for row 2.",
            "Quantity for row 2 must be a positive number.",
        ]
    );
    assert_eq!(backend.requests.get(), 0);
}

#[test]
fn create_preserves_row_order_and_count() {
    use crate::api::fake::FakeBackend;

    let backend = FakeBackend::new().with_ingredients(&["tomato", "mozzarella", "basil"]);
    let mut store = Store::default();
    let mut form = filled_form(vec![
        row(3, "4", "leaves"),
        row(1, "2", ""),
        row(2, "0.25", "lb"),
        row(1, "1", "slice"),
    ]);

    let id = form.submit(&mut store, &backend).unwrap();

    let saved = store.food(id).unwrap();
    let lines: Vec<_> = saved
        .ingredients
        .iter()
        .map(|l| (l.ingredient_id, l.quantity, l.units.as_str()))
        .collect();
    assert_eq!(
        lines,
        vec![
            (IngredientId::new(3), 4.0, "leaves"),
            (IngredientId::new(1), 2.0, ""),
            (IngredientId::new(2), 0.25, "lb"),
            (IngredientId::new(1), 1.0, "slice"),
        ]
    );
    assert_eq!(form.draft(), &FoodDraft::default());
    assert!(form.validation_errors().is_empty());

    let sent = backend.food_payloads.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].ingredients, saved.ingredients);
}

#[test]
fn edit_hydrates_once_and_updates() {
    use crate::api::fake::FakeBackend;
    use crate::api::models::UserId;

    let food = Food {
        id: FoodId::new(5),
        name: "Pesto".into(),
        img_url: "https://example.com/pesto.jpg".into(),
        cuisine: "Italian".into(),
        creator_id: UserId::new(1),
        ingredients: vec![IngredientLine {
            ingredient_id: IngredientId::new(3),
            quantity: 2.0,
            units: "cups".into(),
        }],
    };
    let backend = FakeBackend::new().with_food(food.clone());
    let mut store = Store::default();
    let mut form = FoodForm::new(FormMode::Edit(food.id));

    form.hydrate(&food);
    assert_eq!(form.draft().rows, vec![row(3, "2", "cups")]);

    form.draft.name = "Genovese Pesto".into();
    form.hydrate(&food);
    assert_eq!(form.draft().name, "Genovese Pesto");

    form.add_row();
    form.update_row(1, row(1, "3", "cloves")).unwrap();
    assert_eq!(form.submit(&mut store, &backend), Some(food.id));

    let saved = store.food(food.id).unwrap();
    assert_eq!(saved.name, "Genovese Pesto");
    assert_eq!(saved.ingredients.len(), 2);
    assert_eq!(saved.ingredients[1].units, "cloves");
}

#[test]
fn server_errors_are_shown_inline() {
    use crate::api::fake::FakeBackend;

    let backend = FakeBackend::new();
    let mut store = Store::default();
    let mut form = filled_form(vec![row(1, "1", "cup")]);

    backend.fail_next(400, &["Food with that name already exists"]);
    assert_eq!(form.submit(&mut store, &backend), None);
    assert_eq!(
        form.validation_errors(),
        ["Food with that name already exists"]
    );
    assert_eq!(form.draft().name, "Caprese");
}

#[test]
fn edit_keeps_stored_quantities_exact() {
    let food: Food = serde_json::from_str(
        r#"{
            "id": 8,
            "name": "Vinaigrette",
            "cuisine": "French",
            "creatorId": 1,
            "ingredients": [
                {"ingredientId": 1, "quantity": 0.333333333333, "units": "cup"},
                {"ingredientId": 2, "quantity": 16777217, "units": "mg"}
            ]
        }"#,
    )
    .unwrap();
    let mut form = FoodForm::new(FormMode::Edit(food.id));
    form.hydrate(&food);

    let quantities: Vec<_> = form.draft().rows.iter().map(|r| r.quantity.as_str()).collect();
    assert_eq!(quantities, ["0.333333333333", "16777217"]);

    let payload = form.draft().payload().unwrap();
    assert_eq!(payload.ingredients, food.ingredients);
}

#[test]
fn row_edits_from_widgets_are_applied() {
    let mut form = filled_form(vec![row(1, "1", "cup"), row(2, "2", "tbsp")]);

    form.apply_row_edit(1, RowEdit::Update(row(2, "3", "tbsp"))).unwrap();
    form.apply_row_edit(0, RowEdit::Remove).unwrap();
    assert_eq!(form.draft().rows, vec![row(2, "3", "tbsp")]);

    assert_eq!(
        form.apply_row_edit(1, RowEdit::Remove),
        Err(RowOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(form.draft().rows, vec![row(2, "3", "tbsp")]);
}
