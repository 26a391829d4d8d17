//! Database repository implementations

pub mod announcement_repository;
pub mod bill_repository;
pub mod building_repository;
pub mod complaint_repository;
pub mod emergency_contact_repository;
pub mod payment_settings_repository;
pub mod room_repository;
pub mod tenant_repository;
pub mod user_repository;

pub use announcement_repository::AnnouncementRepository;
pub use bill_repository::BillRepository;
pub use building_repository::BuildingRepository;
pub use complaint_repository::ComplaintRepository;
pub use emergency_contact_repository::EmergencyContactRepository;
pub use payment_settings_repository::PaymentSettingsRepository;
pub use room_repository::RoomRepository;
pub use tenant_repository::TenantRepository;
pub use user_repository::UserRepository;

pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
