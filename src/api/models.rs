// Copyright 2023 Remi Bernotavicius

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
#[serde(transparent)]
pub struct FoodId(i32);

impl FoodId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FoodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FoodId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[derive(Serialize, Deserialize, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
#[serde(transparent)]
pub struct IngredientId(i32);

impl IngredientId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for IngredientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// What `GET /api/session` returns. A missing or null user means nobody is logged in.
#[derive(Deserialize, Debug, Default)]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLine {
    pub ingredient_id: IngredientId,
    pub quantity: f64,
    #[serde(default)]
    pub units: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: FoodId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub img_url: String,
    pub cuisine: String,
    pub creator_id: UserId,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
}

impl Food {
    pub fn is_created_by(&self, user: Option<&User>) -> bool {
        user.is_some_and(|u| u.id == self.creator_id)
    }
}

/// Body of `POST /api/foods` and `PUT /api/foods/:id`.
#[derive(Serialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FoodPayload {
    pub name: String,
    pub img_url: String,
    pub cuisine: String,
    pub ingredients: Vec<IngredientLine>,
}

#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct IngredientPayload {
    pub name: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[test]
fn food_from_server_json() {
    let food: Food = serde_json::from_str(
        r#"{
            "id": 7,
            "name": "Pad Thai",
            "imgUrl": null,
            "cuisine": "Thai",
            "creatorId": 2,
            "createdAt": "2023-10-01T00:00:00.000Z",
            "ingredients": [
                {"ingredientId": 3, "quantity": 200, "units": "g"},
                {"ingredientId": 1, "quantity": 0.5, "units": "cups"}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(food.id, FoodId::new(7));
    assert_eq!(food.img_url, "");
    assert_eq!(food.creator_id, UserId::new(2));
    assert_eq!(
        food.ingredients
            .iter()
            .map(|l| l.ingredient_id)
            .collect::<Vec<_>>(),
        vec![IngredientId::new(3), IngredientId::new(1)]
    );
    assert_eq!(food.ingredients[1].quantity, 0.5);
}

#[test]
fn food_payload_uses_camel_case() {
    let payload = FoodPayload {
        name: "Toast".into(),
        img_url: "https://example.com/toast.png".into(),
        cuisine: "Breakfast".into(),
        ingredients: vec![IngredientLine {
            ingredient_id: IngredientId::new(4),
            quantity: 2.0,
            units: "slices".into(),
        }],
    };
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["imgUrl"], "https://example.com/toast.png");
    assert_eq!(value["ingredients"][0]["ingredientId"], 4);
}

#[test]
fn session_without_user() {
    let session: Session = serde_json::from_str(r#"{"user": null}"#).unwrap();
    assert!(session.user.is_none());

    let session: Session = serde_json::from_str(
        r#"{"user": {"id": 1, "username": "demo", "email": "demo@aa.io"}}"#,
    )
    .unwrap();
    assert_eq!(session.user.unwrap().username, "demo");
}
