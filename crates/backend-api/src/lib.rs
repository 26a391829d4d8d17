mod error;
mod middleware;
mod state;
mod util;

pub mod docs;
pub mod routes;
pub mod services;
pub mod storage;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads().root());
    let body_limit = state.max_body_bytes();

    let router = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/me", get(routes::auth::me))
        // Buildings
        .route(
            "/api/buildings",
            get(routes::buildings::list_buildings).post(routes::buildings::create_building),
        )
        .route(
            "/api/buildings/:id",
            put(routes::buildings::update_building).delete(routes::buildings::delete_building),
        )
        .route(
            "/api/buildings/:id/rooms",
            get(routes::buildings::building_rooms),
        )
        // Rooms
        .route(
            "/api/rooms",
            get(routes::rooms::list_rooms).post(routes::rooms::create_room),
        )
        .route(
            "/api/rooms/:id",
            put(routes::rooms::update_room).delete(routes::rooms::delete_room),
        )
        .route("/api/rooms/:id/photos", post(routes::rooms::upload_photos))
        // Tenants
        .route(
            "/api/tenants",
            get(routes::tenants::list_tenants).post(routes::tenants::create_tenant),
        )
        .route(
            "/api/tenants/:id",
            put(routes::tenants::update_tenant).delete(routes::tenants::delete_tenant),
        )
        .route(
            "/api/tenants/:id/documents",
            post(routes::tenants::upload_documents),
        )
        .route(
            "/api/tenants/:id/admin-upload-documents",
            post(routes::tenants::upload_documents),
        )
        .route("/api/tenants/:id/photo", post(routes::tenants::upload_photo))
        .route(
            "/api/tenants/:id/admin-upload-photo",
            post(routes::tenants::upload_photo),
        )
        .route("/api/tenant/my-profile", get(routes::tenants::my_profile))
        .route("/api/tenant/my-documents", get(routes::tenants::my_documents))
        // Bills
        .route(
            "/api/bills",
            get(routes::bills::list_bills).post(routes::bills::create_bill),
        )
        .route(
            "/api/bills/generate-rent",
            post(routes::bills::generate_rent),
        )
        .route("/api/bills/mark-overdue", post(routes::bills::mark_overdue))
        .route("/api/bills/:id", delete(routes::bills::delete_bill))
        .route("/api/bills/:id/pay", put(routes::bills::pay_bill))
        .route(
            "/api/bills/:id/upload-screenshot",
            post(routes::bills::upload_screenshot),
        )
        .route(
            "/api/bills/:id/mark-paid",
            put(routes::bills::approve_screenshot),
        )
        .route("/api/bills/:id/reject", put(routes::bills::reject_screenshot))
        .route("/api/bills/:id/receipt", get(routes::bills::receipt))
        // Payments
        .route(
            "/api/payment/create-order",
            post(routes::payments::create_order),
        )
        .route("/api/payment/verify", post(routes::payments::verify_payment))
        // Complaints
        .route(
            "/api/complaints",
            get(routes::complaints::list_complaints).post(routes::complaints::create_complaint),
        )
        .route(
            "/api/complaints/:id/reply",
            put(routes::complaints::reply_to_complaint),
        )
        .route(
            "/api/complaints/:id/close",
            put(routes::complaints::close_complaint),
        )
        // Emergency contacts
        .route(
            "/api/emergency-contacts",
            get(routes::emergency_contacts::list_contacts)
                .post(routes::emergency_contacts::create_contact),
        )
        .route(
            "/api/emergency-contacts/:id",
            put(routes::emergency_contacts::update_contact)
                .delete(routes::emergency_contacts::delete_contact),
        )
        // Announcements
        .route(
            "/api/announcements",
            get(routes::announcements::list_announcements)
                .post(routes::announcements::create_announcement),
        )
        .route(
            "/api/announcements/:id",
            put(routes::announcements::update_announcement)
                .delete(routes::announcements::delete_announcement),
        )
        // Payment settings
        .route(
            "/api/payment-settings",
            get(routes::payment_settings::get_settings)
                .post(routes::payment_settings::update_settings),
        )
        .route(
            "/api/payment-settings/qr-code",
            post(routes::payment_settings::upload_qr_code),
        )
        // Dashboard
        .route("/api/dashboard/stats", get(routes::dashboard::stats))
        .nest_service("/api/uploads", uploads)
        .with_state(state);

    with_swagger(router)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(middleware::trace_layer())
        .layer(cors_layer())
}

#[cfg(debug_assertions)]
fn with_swagger(router: Router) -> Router {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
}

#[cfg(not(debug_assertions))]
fn with_swagger(router: Router) -> Router {
    router
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
