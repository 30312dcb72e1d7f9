// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

mod api;
mod config;
mod store;
mod ui;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
struct Args {
    /// Address of the food catalog server, overrides the config file.
    #[arg(long)]
    server_url: Option<String>,

    /// Path to the config file, defaults to the user's config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Run {
        /// Page to open first, like `/foods/3`.
        #[arg(long, default_value = "/foods")]
        route: String,
    },
    ListFoods,
    ListIngredients,
}

fn run(backend: api::HttpBackend, start: ui::route::Route) -> Result<()> {
    let native_options = eframe::NativeOptions {
        window_builder: Some(Box::new(|mut b: egui::viewport::ViewportBuilder| {
            b.maximized = Some(true);
            b
        })),
        ..Default::default()
    };
    eframe::run_native(
        "Food Catalog",
        native_options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ui::FoodApp::new(Box::new(backend), start)))
        }),
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

fn list_foods(backend: &dyn api::Backend) -> Result<()> {
    let mut store = store::Store::default();
    store.load_all_foods(backend)?;
    for food in store.foods() {
        println!("{} ({})", food.name, food.cuisine);
    }
    Ok(())
}

fn list_ingredients(backend: &dyn api::Backend) -> Result<()> {
    let mut store = store::Store::default();
    store.load_all_ingredients(backend)?;
    for ingredient in store.ingredients() {
        println!("{}", ingredient.name);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = match args.config {
        Some(path) => path,
        None => config::config_path()?,
    };
    let config = config::Config::load(&config_path)?;

    simple_logger::SimpleLogger::new()
        .with_level(config.log_level())
        .init()?;

    let server_url = args.server_url.as_deref().unwrap_or(config.server_url());
    log::info!("using server {server_url}");
    let backend = api::HttpBackend::new(
        api::parse_base_url(server_url)?,
        config.session_cookie.as_deref(),
    )?;

    match args.commands {
        Commands::Run { route } => run(backend, ui::route::Route::parse(&route))?,
        Commands::ListFoods => list_foods(&backend)?,
        Commands::ListIngredients => list_ingredients(&backend)?,
    }
    Ok(())
}
