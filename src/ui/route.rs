use crate::api::models::FoodId;
use derive_more::Display;
use strum::EnumIter;

#[derive(Debug, Display, PartialEq, Eq, Clone)]
pub enum Route {
    #[display("/foods")]
    AllFoods,
    #[display("/foods/new")]
    NewFood,
    #[display("/foods/{_0}")]
    FoodDetails(FoodId),
    #[display("/foods/{_0}/edit")]
    EditFood(FoodId),
    #[display("/ingredients/current")]
    OwnedIngredients,
    #[display("/ingredients/new")]
    NewIngredient,
    #[display("{_0}")]
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let segments: Vec<_> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        match segments[..] {
            [] | ["foods"] => Self::AllFoods,
            ["foods", "new"] => Self::NewFood,
            ["foods", id] => id
                .parse()
                .map(Self::FoodDetails)
                .unwrap_or_else(|_| Self::NotFound(path.into())),
            ["foods", id, "edit"] => id
                .parse()
                .map(Self::EditFood)
                .unwrap_or_else(|_| Self::NotFound(path.into())),
            ["ingredients", "current"] => Self::OwnedIngredients,
            ["ingredients", "new"] => Self::NewIngredient,
            _ => Self::NotFound(path.into()),
        }
    }
}

/// The entries of the top navigation bar.
#[derive(Debug, Display, EnumIter, Copy, Clone, PartialEq, Eq)]
pub enum NavItem {
    #[display("All Foods")]
    AllFoods,
    #[display("New Food")]
    NewFood,
    #[display("Owned Ingredients")]
    OwnedIngredients,
}

impl NavItem {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    pub fn route(&self) -> Route {
        match self {
            Self::AllFoods => Route::AllFoods,
            Self::NewFood => Route::NewFood,
            Self::OwnedIngredients => Route::OwnedIngredients,
        }
    }
}

pub struct History {
    stack: Vec<Route>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self { stack: vec![start] }
    }

    pub fn current(&self) -> &Route {
        // never empty, `back` keeps the first entry
        &self.stack[self.stack.len() - 1]
    }

    pub fn push(&mut self, route: Route) {
        if self.current() != &route {
            log::debug!("navigating to {route}");
            self.stack.push(route);
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn back(&mut self) {
        if self.can_go_back() {
            self.stack.pop();
        }
    }
}

#[test]
fn parse_routes() {
    assert_eq!(Route::parse("/foods"), Route::AllFoods);
    assert_eq!(Route::parse("/"), Route::AllFoods);
    assert_eq!(Route::parse("/foods/new"), Route::NewFood);
    assert_eq!(Route::parse("/foods/12"), Route::FoodDetails(FoodId::new(12)));
    assert_eq!(Route::parse("/foods/12/edit/"), Route::EditFood(FoodId::new(12)));
    assert_eq!(Route::parse("/ingredients/current"), Route::OwnedIngredients);
    assert_eq!(Route::parse("ingredients/new"), Route::NewIngredient);
    assert_eq!(
        Route::parse("/foods/pizza"),
        Route::NotFound("/foods/pizza".into())
    );
}

#[test]
fn routes_display_as_paths() {
    for route in [
        Route::AllFoods,
        Route::NewFood,
        Route::FoodDetails(FoodId::new(3)),
        Route::EditFood(FoodId::new(3)),
        Route::OwnedIngredients,
        Route::NewIngredient,
    ] {
        assert_eq!(Route::parse(&route.to_string()), route);
    }
    assert_eq!(Route::EditFood(FoodId::new(3)).to_string(), "/foods/3/edit");
}

#[test]
fn history_back() {
    let mut history = History::new(Route::AllFoods);
    assert!(!history.can_go_back());

    history.push(Route::FoodDetails(FoodId::new(1)));
    history.push(Route::FoodDetails(FoodId::new(1)));
    history.push(Route::EditFood(FoodId::new(1)));
    history.back();
    assert_eq!(history.current(), &Route::FoodDetails(FoodId::new(1)));
    history.back();
    history.back();
    assert_eq!(history.current(), &Route::AllFoods);
}
