//! Supabase client against a mocked GoTrue/Storage server.
//!
//! Run with: `cargo test --test supabase_client_test`
use serde_json::json;
use uuid::Uuid;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

use djbooking_backend::config::SupabaseConfig;
use djbooking_backend::supabase::{SupabaseClient, SupabaseError};

fn client(server: &MockServer, service_role: Option<&str>) -> SupabaseClient {
    SupabaseClient::new(&SupabaseConfig {
        url: server.uri(),
        anon_key: "anon-key".to_string(),
        service_role_key: service_role.map(str::to_string),
        jwt_secret: None,
    })
}

#[tokio::test]
async fn password_sign_in_returns_session() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .and(body_json(json!({ "email": "dj@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": { "id": user_id, "email": "dj@example.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client(&server, None)
        .sign_in_with_password("dj@example.com", "hunter22")
        .await
        .unwrap();

    assert_eq!(session.access_token, "access");
    assert_eq!(session.user.id, user_id);
}

#[tokio::test]
async fn bad_credentials_surface_gotrue_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .sign_in_with_password("dj@example.com", "wrong")
        .await
        .unwrap_err();

    match err {
        SupabaseError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid login credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn password_reset_posts_to_recover() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/recover"))
        .and(body_json(json!({ "email": "p@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, None)
        .send_password_reset("p@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn admin_delete_uses_service_role() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/auth/v1/admin/users/{user_id}")))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, Some("service-key"))
        .delete_auth_user(user_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn admin_delete_without_service_role_is_not_configured() {
    let server = MockServer::start().await;

    let err = client(&server, None)
        .delete_auth_user(Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, SupabaseError::NotConfigured(_)));
}

#[tokio::test]
async fn upload_returns_public_url() {
    let server = MockServer::start().await;
    let dj = Uuid::new_v4();
    let object = format!("dj_{dj}_1700000000000.png");

    Mock::given(method("POST"))
        .and(path(format!("/storage/v1/object/dj-avatars/{object}")))
        .and(header("content-type", "image/png"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": object })))
        .expect(1)
        .mount(&server)
        .await;

    let url = client(&server, Some("service-key"))
        .upload("dj-avatars", &object, vec![0x89, 0x50, 0x4e, 0x47], "image/png")
        .await
        .unwrap();

    assert_eq!(
        url,
        format!("{}/storage/v1/object/public/dj-avatars/{object}", server.uri())
    );
}

#[tokio::test]
async fn upload_conflict_maps_to_conflict_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/media/payment-receipts/x.pdf"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "statusCode": "409",
            "message": "The resource already exists"
        })))
        .mount(&server)
        .await;

    let err = client(&server, Some("service-key"))
        .upload("media", "payment-receipts/x.pdf", vec![1], "application/pdf")
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), actix_web::http::StatusCode::CONFLICT);
    assert!(err.to_string().contains("The resource already exists"));
}
