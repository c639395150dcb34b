//! End-to-end checks for `POST /api/admin/delete-user`.
//!
//! The database is a SeaORM mock, GoTrue is a wiremock server and tokens are
//! minted locally with an HS256 secret.
//!
//! Run with: `cargo test --test admin_delete_user_test`
use actix_web::{App, test, web};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use uuid::Uuid;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use djbooking_backend::auth::TokenVerifier;
use djbooking_backend::auth::jwt::Claims;
use djbooking_backend::cache::QueryCache;
use djbooking_backend::config::SupabaseConfig;
use djbooking_backend::handlers::admin::delete_user;
use djbooking_backend::models::profiles::{self, Roles};
use djbooking_backend::supabase::SupabaseClient;

const SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn profile(id: Uuid, role: Roles) -> profiles::Model {
    profiles::Model {
        id,
        email: format!("{id}@example.com"),
        full_name: Some("Test User".to_string()),
        role,
        phone: None,
        avatar_url: None,
        status: None,
        artist_name: None,
        real_name: None,
        genre: None,
        bio: None,
        base_price: None,
        instagram_url: None,
        soundcloud_url: None,
        youtube_url: None,
        tiktok_url: None,
        location: None,
        pix_key: None,
        cpf: None,
        birth_date: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn token_for(id: Uuid) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: id.to_string(),
        exp: now + 3600,
        iat: Some(now),
        iss: None,
        email: Some(format!("{id}@example.com")),
        role: Some("authenticated".to_string()),
        user_metadata: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn supabase(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(&SupabaseConfig {
        url: server.uri(),
        anon_key: "anon".to_string(),
        service_role_key: Some("service".to_string()),
        jwt_secret: Some(SECRET.to_string()),
    })
}

async fn call(
    db: DatabaseConnection,
    server: &MockServer,
    bearer: Option<String>,
    body: Value,
) -> (u16, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db))
            .app_data(web::Data::new(QueryCache::disabled()))
            .app_data(web::Data::new(supabase(server)))
            .app_data(web::Data::new(TokenVerifier::Hs256(SECRET.to_string())))
            .route("/api/admin/delete-user", web::post().to(delete_user)),
    )
    .await;

    let mut req = test::TestRequest::post()
        .uri("/api/admin/delete-user")
        .set_json(body);
    if let Some(token) = bearer {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }

    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

fn db_with_caller(caller: profiles::Model) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![caller]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection()
}

#[actix_web::test]
async fn missing_token_is_a_bad_request() {
    let server = MockServer::start().await;
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let (status, body) = call(db, &server, None, json!({ "userId": Uuid::new_v4() })).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "User is not authenticated");
}

#[actix_web::test]
async fn non_admin_is_refused() {
    let server = MockServer::start().await;
    let caller = Uuid::new_v4();
    let db = db_with_caller(profile(caller, Roles::Producer));

    let (status, body) = call(
        db,
        &server,
        Some(token_for(caller)),
        json!({ "userId": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Only administrators can delete users");
}

#[actix_web::test]
async fn malformed_user_ids_are_rejected_before_the_admin_api() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for (body, expected) in [
        (json!({}), "userId is invalid"),
        (json!({ "userId": 42 }), "userId is invalid"),
        (json!({ "userId": "" }), "userId is invalid"),
        (json!({ "userId": "1234" }), "userId must be a UUID"),
        (
            json!({ "userId": "017f22e2-79b0-7cc3-98c4-dc0c0c07398f" }),
            "userId must be a UUID",
        ),
    ] {
        let caller = Uuid::new_v4();
        let db = db_with_caller(profile(caller, Roles::Admin));
        let (status, resp) = call(db, &server, Some(token_for(caller)), body).await;

        assert_eq!(status, 400);
        assert_eq!(resp["error"], expected);
    }
}

#[actix_web::test]
async fn admin_deletes_auth_user_and_profile() {
    let server = MockServer::start().await;
    let target = Uuid::new_v4();
    Mock::given(method("DELETE"))
        .and(path(format!("/auth/v1/admin/users/{target}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let caller = Uuid::new_v4();
    let db = db_with_caller(profile(caller, Roles::Admin));

    let (status, body) = call(
        db,
        &server,
        Some(token_for(caller)),
        json!({ "userId": target }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({ "success": true }));
}

#[actix_web::test]
async fn upstream_failure_is_reported_as_400() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "msg": "User not found" })))
        .mount(&server)
        .await;

    let caller = Uuid::new_v4();
    let db = db_with_caller(profile(caller, Roles::Admin));

    let (status, body) = call(
        db,
        &server,
        Some(token_for(caller)),
        json!({ "userId": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("User not found"));
}
