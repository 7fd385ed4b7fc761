//! End-to-end flows through the HTTP adapter over the in-memory store.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

use backend::Trace;
use backend::domain::{ListingsSettings, TRACE_ID_HEADER};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{configure, not_found};
use backend::outbound::memory::MemoryStore;

const HOST: &str = "host@example.com";
const GUEST: &str = "guest@example.com";

fn state() -> HttpState {
    let store = Arc::new(MemoryStore::with_fixture_accounts());
    HttpState::from_repositories(
        store.clone(),
        store.clone(),
        store,
        Arc::new(DefaultClock),
        ListingsSettings::default(),
    )
}

macro_rules! stays_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .wrap(
                            SessionMiddleware::builder(
                                CookieSessionStore::default(),
                                Key::generate(),
                            )
                            .cookie_name("session".to_owned())
                            .cookie_secure(false)
                            .build(),
                        )
                        .configure(configure),
                )
                .default_service(web::to(not_found)),
        )
        .await
    };
}

/// Tracks the latest session cookie across calls, like a browser would.
struct Client<S> {
    app: S,
    cookie: Option<Cookie<'static>>,
}

impl<S> Client<S>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    fn new(app: S) -> Self {
        Self { app, cookie: None }
    }

    async fn send(&mut self, req: test::TestRequest) -> ServiceResponse {
        let req = match &self.cookie {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        };
        let res = test::call_service(&self.app, req.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
        {
            self.cookie = Some(cookie.into_owned());
        }
        res
    }

    async fn get(&mut self, uri: &str) -> ServiceResponse {
        self.send(test::TestRequest::get().uri(uri)).await
    }

    async fn post(&mut self, uri: &str, body: Value) -> ServiceResponse {
        self.send(test::TestRequest::post().uri(uri).set_json(body))
            .await
    }

    async fn login(&mut self, email: &str) {
        let res = self
            .post(
                "/api/v1/login",
                json!({ "username": email, "password": "password" }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    async fn create(&mut self, name: &str, tags: &[&str]) -> Value {
        let res = self
            .post(
                "/api/v1/add",
                json!({
                    "name": name,
                    "description": format!("{name} by the sea"),
                    "tags": tags,
                    "location": "Brighton",
                }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        test::read_body_json(res).await
    }

    async fn flashes(&mut self) -> Vec<String> {
        let res = self.get("/api/v1/flashes").await;
        let notices: Vec<Value> = test::read_body_json(res).await;
        notices
            .iter()
            .filter_map(|n| n["message"].as_str().map(str::to_owned))
            .collect()
    }
}

fn location(res: &ServiceResponse) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

#[actix_web::test]
async fn host_creates_and_edits_while_guest_is_refused() {
    let mut host = Client::new(stays_app!());
    host.login(HOST).await;
    let stay = host.create("Beach House", &["Wifi"]).await;
    assert_eq!(stay["slug"], "beach-house");
    let id = stay["id"].as_str().expect("id").to_owned();
    assert!(
        host.flashes()
            .await
            .contains(&"Successfully Created Beach House.".to_owned())
    );

    let res = host.get("/api/v1/stay/beach-house").await;
    assert_eq!(res.status(), StatusCode::OK);

    host.get("/api/v1/logout").await;
    host.login(GUEST).await;
    let res = host
        .post(&format!("/api/v1/add/{id}"), json!({ "name": "Mine now" }))
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    host.get("/api/v1/logout").await;
    host.login(HOST).await;
    let res = host
        .post(&format!("/api/v1/add/{id}"), json!({ "name": "Beach House 2" }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(res).await;
    assert_eq!(updated["name"], "Beach House 2");
    assert_eq!(updated["slug"], "beach-house");
    assert_eq!(updated["id"], stay["id"]);
}

#[actix_web::test]
async fn duplicate_names_get_numbered_slugs() {
    let mut client = Client::new(stays_app!());
    client.login(HOST).await;
    client.create("Beach House", &[]).await;
    let second = client.create("Beach House", &[]).await;
    assert_eq!(second["slug"], "beach-house-2");
}

#[actix_web::test]
async fn registered_user_hosts_a_stay() {
    let mut client = Client::new(stays_app!());
    let sign_up = json!({
        "email": "Lena@Example.com",
        "name": "Lena",
        "type": "host",
        "password": "s3cret",
        "passwordConfirm": "s3cret",
    });
    let res = client.post("/api/v1/register", sign_up.clone()).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let stay = client.create("Lake Hut", &[]).await;
    let res = client.get("/api/v1/account").await;
    let account: Value = test::read_body_json(res).await;
    assert_eq!(account["email"], "lena@example.com");
    assert_eq!(stay["author"], account["id"]);

    client.get("/api/v1/logout").await;
    let res = client.post("/api/v1/register", sign_up).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let res = client
        .post(
            "/api/v1/login",
            json!({ "username": "lena@example.com", "password": "s3cret" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn numbered_name_does_not_block_base_slug() {
    let mut client = Client::new(stays_app!());
    client.login(HOST).await;
    let numbered = client.create("Beach House 2", &[]).await;
    assert_eq!(numbered["slug"], "beach-house-2");
    let plain = client.create("Beach House", &[]).await;
    assert_eq!(plain["slug"], "beach-house");
    let third = client.create("Beach House", &[]).await;
    assert_eq!(third["slug"], "beach-house-3");
}

#[actix_web::test]
async fn paging_past_the_end_redirects_with_one_notice() {
    let mut client = Client::new(stays_app!());
    client.login(HOST).await;
    for n in 1..=7 {
        client.create(&format!("Stay {n}"), &[]).await;
    }
    client.flashes().await;

    let res = client.get("/api/v1/stays/page/2").await;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = test::read_body_json(res).await;
    assert_eq!(page["stays"].as_array().map(Vec::len), Some(1));
    assert_eq!(page["pages"], 2);
    assert_eq!(page["count"], 7);

    let res = client.get("/api/v1/stays/page/5").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/api/v1/stays/page/2"));
    let notices = client.flashes().await;
    assert_eq!(
        notices,
        ["You asked for page 5. But that does not exist. So I put you on page 2"]
    );
}

#[rstest]
#[case("0")]
#[case("-3")]
#[case("abc")]
#[actix_web::test]
async fn unusable_page_numbers_show_the_first_page(#[case] raw: &str) {
    let mut client = Client::new(stays_app!());
    client.login(HOST).await;
    client.create("Cabin", &[]).await;
    let res = client.get(&format!("/api/v1/stays/page/{raw}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = test::read_body_json(res).await;
    assert_eq!(page["page"], 1);
}

#[actix_web::test]
async fn search_ranks_and_caps_results() {
    let mut client = Client::new(stays_app!());
    client.login(HOST).await;
    for n in 1..=7 {
        client.create(&format!("Seaside {n}"), &[]).await;
    }
    client.create("Mountain Hut", &[]).await;

    let res = client.get("/api/v1/search?q=seaside").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["length"], 5);
    assert_eq!(body["stays"].as_array().map(Vec::len), Some(5));

    let res = client.get("/api/v1/search?q=").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn tags_count_and_filter() {
    let mut client = Client::new(stays_app!());
    client.login(HOST).await;
    client.create("Cabin", &["Wifi", "Pets"]).await;
    client.create("Loft", &["Wifi"]).await;

    let res = client.get("/api/v1/tags/Pets").await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["tags"], json!([{ "tag": "Wifi", "count": 2 }, { "tag": "Pets", "count": 1 }]));
    assert_eq!(body["stays"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn reviews_feed_top_stays() {
    let mut client = Client::new(stays_app!());
    client.login(HOST).await;
    let cabin = client.create("Cabin", &[]).await;
    let loft = client.create("Loft", &[]).await;
    let cabin_id = cabin["id"].as_str().expect("id").to_owned();
    let loft_id = loft["id"].as_str().expect("id").to_owned();

    for rating in [5, 4] {
        let res = client
            .post(
                &format!("/api/v1/reviews/{cabin_id}"),
                json!({ "text": "Lovely", "rating": rating }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }
    client
        .post(
            &format!("/api/v1/reviews/{loft_id}"),
            json!({ "text": "Fine", "rating": 5 }),
        )
        .await;

    let res = client
        .post(
            &format!("/api/v1/reviews/{loft_id}"),
            json!({ "text": "Bad", "rating": 9 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get("/api/v1/top").await;
    let top: Value = test::read_body_json(res).await;
    let top = top.as_array().expect("top stays");
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["stay"]["name"], "Cabin");
    assert_eq!(top[0]["reviewCount"], 2);
    assert_eq!(top[0]["averageRating"], 4.5);

    let res = client.get("/api/v1/stay/cabin").await;
    let detail: Value = test::read_body_json(res).await;
    assert_eq!(detail["reviews"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn unknown_routes_and_slugs_are_json_not_found() {
    let mut client = Client::new(stays_app!());
    let res = client.get("/api/v1/stay/nowhere").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get("/nothing/here").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
}
