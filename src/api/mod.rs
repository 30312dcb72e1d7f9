// Copyright 2023 Remi Bernotavicius

use reqwest::cookie::CookieStore as _;
use serde::de::DeserializeOwned;
use std::cell::Cell;
use std::sync::Arc;

mod error;
#[cfg(test)]
pub mod fake;
pub mod models;

pub use error::{Error, Result};
use models::{
    Food, FoodId, FoodPayload, Ingredient, IngredientId, IngredientPayload, Session, User,
};

/// One method per REST endpoint the client consumes.
pub trait Backend {
    fn session(&self) -> Result<Option<User>>;

    fn foods(&self) -> Result<Vec<Food>>;
    fn food(&self, id: FoodId) -> Result<Food>;
    fn create_food(&self, food: &FoodPayload) -> Result<Food>;
    fn update_food(&self, id: FoodId, food: &FoodPayload) -> Result<Food>;
    fn delete_food(&self, id: FoodId) -> Result<()>;

    fn ingredients(&self) -> Result<Vec<Ingredient>>;
    fn ingredient(&self, id: IngredientId) -> Result<Ingredient>;
    fn create_ingredient(&self, ingredient: &IngredientPayload) -> Result<Ingredient>;
    fn update_ingredient(
        &self,
        id: IngredientId,
        ingredient: &IngredientPayload,
    ) -> Result<Ingredient>;
}

/// Parses the server address. The result always ends in `/` so that relative endpoint paths
/// resolve underneath it.
pub fn parse_base_url(url: &str) -> Result<reqwest::Url> {
    let mut url = url.trim().to_owned();
    if !url.ends_with('/') {
        url.push('/');
    }
    reqwest::Url::parse(&url).map_err(|_| Error::InvalidUrl(url))
}

fn xsrf_token_from_cookie_header(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "XSRF-TOKEN").then(|| value.to_owned())
    })
}

pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
    cookies: Arc<reqwest::cookie::Jar>,
    csrf_restored: Cell<bool>,
}

impl HttpBackend {
    /// `session_cookie` is a `name=value` pair handed to us from outside, it is sent with every
    /// request.
    pub fn new(base_url: reqwest::Url, session_cookie: Option<&str>) -> Result<Self> {
        let cookies = Arc::new(reqwest::cookie::Jar::default());
        if let Some(cookie) = session_cookie {
            cookies.add_cookie_str(cookie, &base_url);
        }
        let client = reqwest::blocking::Client::builder()
            .cookie_provider(cookies.clone())
            .build()?;
        Ok(Self {
            client,
            base_url,
            cookies,
            csrf_restored: Cell::new(false),
        })
    }

    fn url(&self, path: &str) -> Result<reqwest::Url> {
        self.base_url
            .join(path)
            .map_err(|_| Error::InvalidUrl(format!("{}{path}", self.base_url)))
    }

    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        let error = Error::from_response_body(status, &body);
        log::warn!("request failed: {error}");
        Err(error)
    }

    fn send<T: DeserializeOwned>(&self, request: reqwest::blocking::RequestBuilder) -> Result<T> {
        Ok(Self::check(request.send()?)?.json()?)
    }

    fn xsrf_token(&self) -> Result<Option<String>> {
        if !self.csrf_restored.get() {
            log::debug!("restoring CSRF token");
            Self::check(self.client.get(self.url("api/csrf/restore")?).send()?)?;
            self.csrf_restored.set(true);
        }
        Ok(self
            .cookies
            .cookies(&self.base_url)
            .and_then(|h| h.to_str().ok().and_then(xsrf_token_from_cookie_header)))
    }

    fn get(&self, path: &str) -> Result<reqwest::blocking::RequestBuilder> {
        log::debug!("GET {path}");
        Ok(self.client.get(self.url(path)?))
    }

    fn mutate(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::blocking::RequestBuilder> {
        log::debug!("{method} {path}");
        let mut request = self.client.request(method, self.url(path)?);
        if let Some(token) = self.xsrf_token()? {
            request = request.header("XSRF-Token", token);
        }
        Ok(request)
    }
}

impl Backend for HttpBackend {
    fn session(&self) -> Result<Option<User>> {
        let session: Session = self.send(self.get("api/session")?)?;
        Ok(session.user)
    }

    fn foods(&self) -> Result<Vec<Food>> {
        self.send(self.get("api/foods")?)
    }

    fn food(&self, id: FoodId) -> Result<Food> {
        self.send(self.get(&format!("api/foods/{id}"))?)
    }

    fn create_food(&self, food: &FoodPayload) -> Result<Food> {
        self.send(self.mutate(reqwest::Method::POST, "api/foods")?.json(food))
    }

    fn update_food(&self, id: FoodId, food: &FoodPayload) -> Result<Food> {
        let path = format!("api/foods/{id}");
        self.send(self.mutate(reqwest::Method::PUT, &path)?.json(food))
    }

    fn delete_food(&self, id: FoodId) -> Result<()> {
        let path = format!("api/foods/{id}");
        Self::check(self.mutate(reqwest::Method::DELETE, &path)?.send()?)?;
        Ok(())
    }

    fn ingredients(&self) -> Result<Vec<Ingredient>> {
        self.send(self.get("api/ingredients")?)
    }

    fn ingredient(&self, id: IngredientId) -> Result<Ingredient> {
        self.send(self.get(&format!("api/ingredients/{id}"))?)
    }

    fn create_ingredient(&self, ingredient: &IngredientPayload) -> Result<Ingredient> {
        self.send(
            self.mutate(reqwest::Method::POST, "api/ingredients")?
                .json(ingredient),
        )
    }

    fn update_ingredient(
        &self,
        id: IngredientId,
        ingredient: &IngredientPayload,
    ) -> Result<Ingredient> {
        let path = format!("api/ingredients/{id}");
        self.send(self.mutate(reqwest::Method::PUT, &path)?.json(ingredient))
    }
}

#[test]
fn base_url_gets_trailing_slash() {
    let url = parse_base_url("http://localhost:8000").unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/");
    assert_eq!(
        url.join("api/foods/3").unwrap().as_str(),
        "http://localhost:8000/api/foods/3"
    );

    let url = parse_base_url("https://food.example.com/app").unwrap();
    assert_eq!(
        url.join("api/ingredients").unwrap().as_str(),
        "https://food.example.com/app/api/ingredients"
    );

    assert!(matches!(
        parse_base_url("not a url"),
        Err(Error::InvalidUrl(_))
    ));
}

#[test]
fn xsrf_token_from_cookies() {
    assert_eq!(
        xsrf_token_from_cookie_header("_csrf=abc; XSRF-TOKEN=tok123; token=jwt"),
        Some("tok123".into())
    );
    assert_eq!(xsrf_token_from_cookie_header("_csrf=abc"), None);
}

#[cfg(test)]
fn mock_server(runtime: &tokio::runtime::Runtime) -> (wiremock::MockServer, HttpBackend) {
    let server = runtime.block_on(wiremock::MockServer::start());
    let base_url = parse_base_url(&server.uri()).unwrap();
    let backend = HttpBackend::new(base_url, Some("token=jwt")).unwrap();
    (server, backend)
}

#[cfg(test)]
fn header<'a>(request: &'a wiremock::Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

#[test]
fn session_cookie_is_sent() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (server, backend) = mock_server(&runtime);
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/api/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": {"id": 1, "username": "demo", "email": "demo@example.com"}
            })))
            .mount(&server),
    );

    let user = backend.session().unwrap().unwrap();
    assert_eq!(user.username, "demo");

    let requests = runtime.block_on(server.received_requests()).unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(header(&requests[0], "cookie"), Some("token=jwt"));
}

#[test]
fn csrf_token_is_restored_once_and_sent_with_writes() {
    use wiremock::matchers::{header as has_header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (server, backend) = mock_server(&runtime);
    runtime.block_on(async {
        Mock::given(method("GET"))
            .and(path("/api/csrf/restore"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "XSRF-TOKEN=tok123; Path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/ingredients"))
            .and(has_header("XSRF-Token", "tok123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": 7, "name": "salt"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/ingredients/7"))
            .and(has_header("XSRF-Token", "tok123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": 7, "name": "sea salt"})),
            )
            .mount(&server)
            .await;
    });

    let created = backend
        .create_ingredient(&IngredientPayload {
            name: "salt".into(),
        })
        .unwrap();
    assert_eq!(created.id, IngredientId::new(7));
    let updated = backend
        .update_ingredient(
            created.id,
            &IngredientPayload {
                name: "sea salt".into(),
            },
        )
        .unwrap();
    assert_eq!(updated.name, "sea salt");

    let requests = runtime.block_on(server.received_requests()).unwrap();
    let sent: Vec<_> = requests
        .iter()
        .map(|r| {
            (
                r.method.as_str().to_owned(),
                r.url.path().to_owned(),
                header(r, "xsrf-token").map(str::to_owned),
            )
        })
        .collect();
    assert_eq!(
        sent,
        vec![
            ("GET".into(), "/api/csrf/restore".into(), None),
            ("POST".into(), "/api/ingredients".into(), Some("tok123".into())),
            ("PUT".into(), "/api/ingredients/7".into(), Some("tok123".into())),
        ]
    );
}

#[test]
fn error_responses_become_server_errors() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (server, backend) = mock_server(&runtime);
    runtime.block_on(async {
        Mock::given(method("GET"))
            .and(path("/api/foods/9"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"message": "Food couldn't be found"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/csrf/restore"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/foods/3"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
    });

    match backend.food(FoodId::new(9)) {
        Err(Error::Server { status, messages }) => {
            assert_eq!(status, 404);
            assert_eq!(messages, vec!["Food couldn't be found"]);
        }
        other => panic!("expected a server error, got {other:?}"),
    }

    let error = backend.delete_food(FoodId::new(3)).unwrap_err();
    assert!(matches!(error, Error::Server { status: 401, .. }));
    assert_eq!(error.messages(), vec!["Unauthorized"]);
}
