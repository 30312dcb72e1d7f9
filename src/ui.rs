// Copyright 2023 Remi Bernotavicius

use crate::api::Backend;
use crate::store::Store;
use eframe::egui;
use route::{History, NavItem, Route};

mod food_details;
mod food_form;
mod food_list;
mod ingredient_form;
mod ingredient_list;
pub mod route;

fn new_error_toast(msg: impl Into<egui::WidgetText>) -> egui_toast::Toast {
    egui_toast::Toast {
        text: msg.into(),
        kind: egui_toast::ToastKind::Error,
        options: egui_toast::ToastOptions::default()
            .duration_in_seconds(3.0)
            .show_progress(false)
            .show_icon(true),
        ..Default::default()
    }
}

fn must_log_in(ui: &mut egui::Ui, what: &str) {
    ui.vertical_centered(|ui| {
        ui.heading(format!("Must be logged-in to view this {what}."));
    });
}

enum Page {
    AllFoods(food_list::FoodListPage),
    FoodDetails(food_details::FoodDetailsPage),
    FoodForm(food_form::FoodForm),
    OwnedIngredients(ingredient_list::IngredientListPage),
    NotFound(String),
}

impl Page {
    fn for_route(route: &Route) -> Self {
        use food_form::{FoodForm, FormMode};

        match route {
            Route::AllFoods => Self::AllFoods(food_list::FoodListPage::new()),
            Route::NewFood => Self::FoodForm(FoodForm::new(FormMode::Create)),
            Route::FoodDetails(id) => {
                Self::FoodDetails(food_details::FoodDetailsPage::new(*id))
            }
            Route::EditFood(id) => Self::FoodForm(FoodForm::new(FormMode::Edit(*id))),
            Route::OwnedIngredients => {
                Self::OwnedIngredients(ingredient_list::IngredientListPage::new(None))
            }
            Route::NewIngredient => Self::OwnedIngredients(
                ingredient_list::IngredientListPage::new(Some(
                    ingredient_form::IngredientFormModal::new(None),
                )),
            ),
            Route::NotFound(path) => Self::NotFound(path.clone()),
        }
    }
}

pub struct FoodApp {
    backend: Box<dyn Backend>,
    store: Store,
    history: History,
    page: Page,
    toasts: egui_toast::Toasts,
}

impl FoodApp {
    pub fn new(backend: Box<dyn Backend>, start: Route) -> Self {
        let mut store = Store::default();
        let mut toasts = egui_toast::Toasts::new()
            .anchor(egui::Align2::RIGHT_BOTTOM, (-10.0, -10.0))
            .direction(egui::Direction::BottomUp);
        if let Err(error) = store.load_session(&*backend) {
            log::warn!("failed to load session: {error}");
            toasts.add(new_error_toast(format!("Couldn't load session: {error}")));
        }
        Self {
            backend,
            store,
            page: Page::for_route(&start),
            history: History::new(start),
            toasts,
        }
    }

    fn navigate(&mut self, route: Route) {
        if self.history.current() != &route {
            self.history.push(route);
            self.page = Page::for_route(self.history.current());
        }
    }

    fn back(&mut self) {
        self.history.back();
        self.page = Page::for_route(self.history.current());
    }

    fn update_menu(&mut self, ctx: &egui::Context) {
        let mut next = None;
        let mut back = false;
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                back = ui
                    .add_enabled(self.history.can_go_back(), egui::Button::new("⬅"))
                    .clicked();
                for item in NavItem::iter() {
                    let selected = self.history.current() == &item.route();
                    if ui.selectable_label(selected, item.to_string()).clicked() {
                        next = Some(item.route());
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.store.session_user() {
                        Some(user) => ui.label(format!("Logged in as {}", user.username)),
                        None => ui.label("Not logged in"),
                    };
                    ui.label(egui::RichText::new(self.history.current().to_string()).weak());
                });
            });
        });
        if back {
            self.back();
        } else if let Some(route) = next {
            self.navigate(route);
        }
    }

    fn update_page(&mut self, ctx: &egui::Context) {
        let mut next = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let Self {
                backend,
                store,
                page,
                toasts,
                ..
            } = self;
            let backend = &**backend;
            match page {
                Page::AllFoods(p) => {
                    for event in p.update(ui, store, backend, toasts) {
                        match event {
                            food_list::UpdateEvent::Open(id) => {
                                next = Some(Route::FoodDetails(id))
                            }
                        }
                    }
                }
                Page::FoodDetails(p) => {
                    for event in p.update(ctx, ui, store, backend, toasts) {
                        match event {
                            food_details::UpdateEvent::Edit(id) => {
                                next = Some(Route::EditFood(id))
                            }
                            food_details::UpdateEvent::Deleted => next = Some(Route::AllFoods),
                        }
                    }
                }
                Page::FoodForm(p) => {
                    for event in p.update(ui, store, backend, toasts) {
                        match event {
                            food_form::UpdateEvent::Saved(id) => {
                                log::info!("saved food {id} from {:?}", p.mode());
                                next = Some(Route::FoodDetails(id));
                            }
                        }
                    }
                }
                Page::OwnedIngredients(p) => {
                    for event in p.update(ctx, ui, store, backend, toasts) {
                        match event {
                            ingredient_list::UpdateEvent::NewIngredient => {
                                next = Some(Route::NewIngredient)
                            }
                            ingredient_list::UpdateEvent::ModalDone => {
                                next = Some(Route::OwnedIngredients)
                            }
                        }
                    }
                }
                Page::NotFound(path) => {
                    ui.heading(format!("Nothing found at {path}"));
                }
            }
        });
        if let Some(route) = next {
            self.navigate(route);
        }
    }
}

impl eframe::App for FoodApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_menu(ctx);
        self.update_page(ctx);
        self.toasts.show(ctx);
    }
}
