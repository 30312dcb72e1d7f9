use super::new_error_toast;
use crate::api::models::FoodId;
use crate::api::Backend;
use crate::store::Store;
use eframe::egui;

pub enum UpdateEvent {
    Open(FoodId),
}

pub struct FoodListPage {
    loaded: bool,
}

impl FoodListPage {
    pub fn new() -> Self {
        Self { loaded: false }
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
            if let Err(error) = store.load_all_foods(backend) {
                toasts.add(new_error_toast(error.to_string()));
            }
            self.loaded = true;
        }

        ui.heading("Browse all available foods");
        ui.separator();
        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .show(ui, |ui| {
                for food in store.foods() {
                    let response = ui
                        .vertical(|ui| {
                            ui.label(egui::RichText::new(&food.name).size(16.0));
                            ui.label(egui::RichText::new(&food.cuisine).small().weak());
                        })
                        .response
                        .interact(egui::Sense::click())
                        .on_hover_cursor(egui::CursorIcon::PointingHand);
                    if response.clicked() {
                        events.push(UpdateEvent::Open(food.id));
                    }
                    ui.separator();
                }
                if store.foods().next().is_none() {
                    ui.label("No foods yet");
                }
            });
        events
    }
}
