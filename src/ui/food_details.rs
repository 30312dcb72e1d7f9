use super::new_error_toast;
use crate::api::models::{Food, FoodId};
use crate::api::{self, Backend};
use crate::store::Store;
use eframe::egui;

pub enum UpdateEvent {
    Edit(FoodId),
    Deleted,
}

/// Asks before a food is deleted.
struct ConfirmDeleteModal {
    error: Option<String>,
}

impl ConfirmDeleteModal {
    /// Returns `Some(true)` when the user confirmed, `Some(false)` when they backed out.
    fn update(&mut self, ctx: &egui::Context, food: &Food) -> Option<bool> {
        let mut answer = None;
        egui::Window::new("Confirm Delete")
            .collapsible(false)
            .resizable([false, false])
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Are you sure you want to delete {}?", food.name));
                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::RED, error);
                }
                ui.horizontal(|ui| {
                    if ui.button("Yes (Delete Food)").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("No (Keep Food)").clicked() {
                        answer = Some(false);
                    }
                });
            });
        answer
    }
}

pub struct FoodDetailsPage {
    food_id: FoodId,
    loaded: bool,
    confirm_delete: Option<ConfirmDeleteModal>,
}

impl FoodDetailsPage {
    pub fn new(food_id: FoodId) -> Self {
        Self {
            food_id,
            loaded: false,
            confirm_delete: None,
        }
    }

    fn load(&self, store: &mut Store, backend: &dyn Backend) -> api::Result<()> {
        store.load_single_food(backend, self.food_id)?;
        store.load_all_ingredients(backend)?;
        Ok(())
    }

    fn update_ingredients(food: &Food, store: &Store, ui: &mut egui::Ui) {
        egui::Grid::new(("food ingredients", food.id))
            .striped(true)
            .show(ui, |ui| {
                ui.label("Ingredient");
                ui.label("Quantity");
                ui.label("Units");
                ui.end_row();

                for line in &food.ingredients {
                    ui.label(
                        store
                            .ingredient(line.ingredient_id)
                            .map(|i| i.name.as_str())
                            .unwrap_or("unknown ingredient"),
                    );
                    ui.label(line.quantity.to_string());
                    ui.label(&line.units);
                    ui.end_row();
                }
            });
    }

    pub fn update(
        &mut self,
        ctx: &egui::Context,
        ui: &mut egui::Ui,
        store: &mut Store,
        backend: &dyn Backend,
        toasts: &mut egui_toast::Toasts,
    ) -> Vec<UpdateEvent> {
        let mut events = vec![];
        if !self.loaded {
            if let Err(error) = self.load(store, backend) {
                toasts.add(new_error_toast(error.to_string()));
            }
            self.loaded = true;
        }

        let Some(food) = store.food(self.food_id).cloned() else {
            ui.label("Food couldn't be found");
            return events;
        };

        ui.heading(&food.name);
        ui.label(egui::RichText::new(&food.cuisine).weak());
        ui.separator();

        if !food.img_url.is_empty() {
            ui.add(
                egui::Image::from_uri(&food.img_url)
                    .maintain_aspect_ratio(true)
                    .max_height(240.0),
            );
            ui.hyperlink_to("Open image", &food.img_url);
            ui.separator();
        }

        if food.ingredients.is_empty() {
            ui.label("No ingredients listed");
        } else {
            Self::update_ingredients(&food, store, ui);
        }

        if food.is_created_by(store.session_user()) {
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Edit").clicked() {
                    events.push(UpdateEvent::Edit(food.id));
                }
                if ui.button("Delete").clicked() && self.confirm_delete.is_none() {
                    self.confirm_delete = Some(ConfirmDeleteModal { error: None });
                }
            });
        }

        if let Some(modal) = &mut self.confirm_delete {
            match modal.update(ctx, &food) {
                Some(true) => match store.delete_food(backend, food.id) {
                    Ok(()) => {
                        self.confirm_delete = None;
                        events.push(UpdateEvent::Deleted);
                    }
                    Err(error) => modal.error = Some(error.messages().join("\n")),
                },
                Some(false) => self.confirm_delete = None,
                None => {}
            }
        }

        events
    }
}
