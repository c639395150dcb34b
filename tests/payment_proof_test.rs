//! `POST /api/payments/{id}/proof` must refuse before anything reaches storage.
//!
//! Run with: `cargo test --test payment_proof_test`
use actix_web::{App, test, web};
use chrono::{NaiveDate, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::Value;
use uuid::Uuid;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path_regex},
};

use djbooking_backend::auth::TokenVerifier;
use djbooking_backend::auth::jwt::Claims;
use djbooking_backend::cache::QueryCache;
use djbooking_backend::config::AppConfig;
use djbooking_backend::handlers::payments::upload_proof;
use djbooking_backend::models::events::{self, EventStatus};
use djbooking_backend::models::payments::{self, PaymentStatus};
use djbooking_backend::models::profiles::{self, Roles};
use djbooking_backend::supabase::SupabaseClient;

const SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn config(server: &MockServer) -> AppConfig {
    let url = server.uri();
    AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/test".to_string()),
        "SUPABASE_URL" => Some(url.clone()),
        "SUPABASE_ANON_KEY" => Some("anon".to_string()),
        "SUPABASE_SERVICE_ROLE_KEY" => Some("service".to_string()),
        "SUPABASE_JWT_SECRET" => Some(SECRET.to_string()),
        "READ_RETRY_ATTEMPTS" => Some("1".to_string()),
        _ => None,
    })
    .unwrap()
}

fn admin(id: Uuid) -> profiles::Model {
    profiles::Model {
        id,
        email: format!("{id}@example.com"),
        full_name: Some("Admin".to_string()),
        role: Roles::Admin,
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

fn event(id: Uuid, created_by: Uuid) -> events::Model {
    events::Model {
        id,
        event_name: "Réveillon".to_string(),
        event_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        event_time: None,
        location: None,
        city: None,
        venue: None,
        description: None,
        cache_value: 1000.0,
        commission_rate: None,
        commission_amount: None,
        payment_status: PaymentStatus::Paid,
        status: EventStatus::Pending,
        producer_id: None,
        created_by: Some(created_by),
        created_by_role: Roles::Admin,
        shared_with_admin: true,
        visible_to_dj: true,
        payment_proof_url: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn payment(id: Uuid, event_id: Uuid, status: PaymentStatus) -> payments::Model {
    payments::Model {
        id,
        event_id,
        producer_id: None,
        amount: 1000.0,
        status,
        due_date: None,
        paid_at: None,
        payment_method: None,
        payment_proof_url: None,
        commission_rate: None,
        commission_amount: None,
        notes: None,
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

#[actix_web::test]
async fn proof_for_a_paid_payment_is_refused_without_uploading() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex("^/storage/v1/object/.*"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let caller = Uuid::new_v4();
    let event_id = Uuid::new_v4();
    let payment_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![admin(caller)]])
        .append_query_results([vec![payment(payment_id, event_id, PaymentStatus::Paid)]])
        .append_query_results([vec![event(event_id, caller)]])
        .into_connection();

    let config = config(&server);
    let supabase = SupabaseClient::new(&config.supabase);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db))
            .app_data(web::Data::new(QueryCache::disabled()))
            .app_data(web::Data::new(supabase))
            .app_data(web::Data::new(TokenVerifier::Hs256(SECRET.to_string())))
            .app_data(web::Data::new(config))
            .route("/api/payments/{id}/proof", web::post().to(upload_proof)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/payments/{payment_id}/proof?file_name=comprovante.pdf"))
        .insert_header(("Authorization", format!("Bearer {}", token_for(caller))))
        .insert_header(("Content-Type", "application/pdf"))
        .set_payload(vec![1u8, 2, 3])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Payment cannot move from paid to pagamento_enviado");
}
