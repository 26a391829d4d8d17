//! OpenAPI description served by Swagger UI in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::buildings::list_buildings,
        crate::routes::buildings::create_building,
        crate::routes::buildings::update_building,
        crate::routes::buildings::delete_building,
        crate::routes::buildings::building_rooms,
        crate::routes::rooms::list_rooms,
        crate::routes::rooms::create_room,
        crate::routes::rooms::update_room,
        crate::routes::rooms::delete_room,
        crate::routes::rooms::upload_photos,
        crate::routes::tenants::list_tenants,
        crate::routes::tenants::create_tenant,
        crate::routes::tenants::update_tenant,
        crate::routes::tenants::delete_tenant,
        crate::routes::tenants::upload_documents,
        crate::routes::tenants::upload_photo,
        crate::routes::tenants::my_profile,
        crate::routes::tenants::my_documents,
        crate::routes::bills::list_bills,
        crate::routes::bills::create_bill,
        crate::routes::bills::delete_bill,
        crate::routes::bills::generate_rent,
        crate::routes::bills::mark_overdue,
        crate::routes::bills::pay_bill,
        crate::routes::bills::upload_screenshot,
        crate::routes::bills::approve_screenshot,
        crate::routes::bills::reject_screenshot,
        crate::routes::bills::receipt,
        crate::routes::payments::create_order,
        crate::routes::payments::verify_payment,
        crate::routes::complaints::list_complaints,
        crate::routes::complaints::create_complaint,
        crate::routes::complaints::reply_to_complaint,
        crate::routes::complaints::close_complaint,
        crate::routes::emergency_contacts::list_contacts,
        crate::routes::emergency_contacts::create_contact,
        crate::routes::emergency_contacts::update_contact,
        crate::routes::emergency_contacts::delete_contact,
        crate::routes::announcements::list_announcements,
        crate::routes::announcements::create_announcement,
        crate::routes::announcements::update_announcement,
        crate::routes::announcements::delete_announcement,
        crate::routes::payment_settings::get_settings,
        crate::routes::payment_settings::update_settings,
        crate::routes::payment_settings::upload_qr_code,
        crate::routes::dashboard::stats
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::MessageResponse,
            crate::routes::health::HealthResponse,
            crate::routes::auth::RegisterRequest,
            crate::routes::auth::LoginRequest,
            crate::routes::auth::RegisterResponse,
            crate::routes::auth::SessionResponse,
            crate::routes::auth::MeResponse,
            crate::routes::buildings::BuildingResponse,
            crate::routes::rooms::CreateRoomRequest,
            crate::routes::rooms::UpdateRoomRequest,
            crate::routes::rooms::RoomResponse,
            crate::routes::rooms::RoomPhotosResponse,
            crate::routes::rooms::RoomPhotosUpload,
            crate::routes::tenants::CreateTenantRequest,
            crate::routes::tenants::UpdateTenantRequest,
            crate::routes::tenants::CreateTenantResponse,
            crate::routes::tenants::TenantResponse,
            crate::routes::tenants::DocumentsResponse,
            crate::routes::tenants::PhotoResponse,
            crate::routes::tenants::DocumentsUpload,
            crate::routes::tenants::PhotoUpload,
            crate::routes::tenants::MyDocumentsResponse,
            crate::routes::bills::CreateBillRequest,
            crate::routes::bills::GenerateRentRequest,
            crate::routes::bills::BillResponse,
            crate::routes::bills::GenerateRentResponse,
            crate::routes::bills::MarkOverdueResponse,
            crate::routes::bills::ReceiptResponse,
            crate::routes::bills::ScreenshotUpload,
            crate::routes::payments::CreateOrderRequest,
            crate::routes::payments::CreateOrderResponse,
            crate::routes::payments::VerifyPaymentRequest,
            crate::routes::payments::VerifyPaymentResponse,
            crate::routes::complaints::CreateComplaintRequest,
            crate::routes::complaints::ReplyComplaintRequest,
            crate::routes::complaints::ComplaintResponse,
            crate::routes::emergency_contacts::EmergencyContactResponse,
            crate::routes::announcements::AnnouncementResponse,
            crate::routes::payment_settings::UpdatePaymentSettingsRequest,
            crate::routes::payment_settings::PaymentSettingsResponse,
            crate::routes::payment_settings::QrCodeResponse,
            crate::routes::payment_settings::QrCodeUpload,
            crate::services::dashboard::DashboardStats,
            rentease_database::User,
            rentease_database::UserRole,
            rentease_database::Building,
            rentease_database::BuildingSummary,
            rentease_database::BuildingType,
            rentease_database::NewBuilding,
            rentease_database::BuildingChanges,
            rentease_database::Room,
            rentease_database::RoomListing,
            rentease_database::RoomStatus,
            rentease_database::RoomCategory,
            rentease_database::Tenant,
            rentease_database::TenantListing,
            rentease_database::TenantProfile,
            rentease_database::Bill,
            rentease_database::BillListing,
            rentease_database::BillType,
            rentease_database::BillStatus,
            rentease_database::PaymentMethod,
            rentease_database::Complaint,
            rentease_database::ComplaintListing,
            rentease_database::ComplaintCategory,
            rentease_database::ComplaintStatus,
            rentease_database::EmergencyContact,
            rentease_database::NewEmergencyContact,
            rentease_database::EmergencyContactChanges,
            rentease_database::Announcement,
            rentease_database::NewAnnouncement,
            rentease_database::AnnouncementChanges,
            rentease_database::AnnouncementPriority,
            rentease_database::PaymentSettings
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Registration, login and the current account"),
        (name = "Buildings", description = "Building inventory"),
        (name = "Rooms", description = "Rooms, rent and photos"),
        (name = "Tenants", description = "Tenancies, documents and self-service profile"),
        (name = "Bills", description = "Billing and payment confirmation"),
        (name = "Payments", description = "Online payments through the gateway"),
        (name = "Complaints", description = "Tenant complaints and admin replies"),
        (name = "Emergency Contacts", description = "Emergency service numbers"),
        (name = "Announcements", description = "Notice board"),
        (name = "Payment Settings", description = "Bank-transfer instructions"),
        (name = "Dashboard", description = "Admin overview")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        let mut scheme = SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer));
        if let SecurityScheme::Http(http) = &mut scheme {
            http.bearer_format = Some("JWT".to_string());
        }

        components
            .security_schemes
            .insert("bearerAuth".to_string(), scheme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_routes_document_their_form_parts() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("openapi serialises");

        for (path, schema) in [
            ("/api/bills/{id}/upload-screenshot", "ScreenshotUpload"),
            ("/api/payment-settings/qr-code", "QrCodeUpload"),
            ("/api/rooms/{id}/photos", "RoomPhotosUpload"),
            ("/api/tenants/{id}/documents", "DocumentsUpload"),
            ("/api/tenants/{id}/photo", "PhotoUpload"),
        ] {
            let content = &doc["paths"][path]["post"]["requestBody"]["content"];
            assert_eq!(
                content["multipart/form-data"]["schema"]["$ref"],
                format!("#/components/schemas/{schema}"),
                "{path}"
            );
            assert!(doc["components"]["schemas"][schema].is_object(), "{schema}");
        }

        let screenshot = &doc["components"]["schemas"]["ScreenshotUpload"]["properties"]["screenshot"];
        assert_eq!(screenshot["format"], "binary");
    }
}
