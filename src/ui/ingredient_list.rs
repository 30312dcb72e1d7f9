use super::ingredient_form::{self, IngredientFormModal};
use super::new_error_toast;
use crate::api::Backend;
use crate::store::Store;
use eframe::egui;

pub enum UpdateEvent {
    NewIngredient,
    /// The modal saved or was closed, the list should be shown on its own again.
    ModalDone,
}

pub struct IngredientListPage {
    loaded: bool,
    modal: Option<IngredientFormModal>,
}

impl IngredientListPage {
    pub fn new(modal: Option<IngredientFormModal>) -> Self {
        Self {
            loaded: false,
            modal,
        }
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
            if let Err(error) = store.load_all_ingredients(backend) {
                toasts.add(new_error_toast(error.to_string()));
            }
            self.loaded = true;
        }

        if store.session_user().is_none() {
            super::must_log_in(ui, "page");
            return events;
        }

        ui.horizontal(|ui| {
            ui.heading("Owned Ingredients");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("New Ingredient").clicked() {
                    events.push(UpdateEvent::NewIngredient);
                }
            });
        });
        ui.separator();

        let mut edit = None;
        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .show(ui, |ui| {
                egui::Grid::new("owned ingredients")
                    .striped(true)
                    .show(ui, |ui| {
                        for ingredient in store.ingredients() {
                            ui.label(egui::RichText::new(&ingredient.name).strong());
                            if ui.button("✏").on_hover_text("Edit").clicked() {
                                edit = Some(ingredient.id);
                            }
                            ui.end_row();
                        }
                    });
            });
        if let Some(id) = edit {
            self.modal = Some(IngredientFormModal::new(Some(id)));
        }

        if let Some(modal) = &mut self.modal {
            for event in modal.update(ctx, store, backend) {
                match event {
                    ingredient_form::UpdateEvent::Closed => {
                        self.modal = None;
                        events.push(UpdateEvent::ModalDone);
                    }
                    ingredient_form::UpdateEvent::Saved(id) => {
                        log::info!("saved ingredient {id}");
                        self.modal = None;
                        events.push(UpdateEvent::ModalDone);
                    }
                }
            }
        }

        events
    }
}
