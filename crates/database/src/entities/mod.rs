//! Row types and enums for every table.

pub mod announcement;
pub mod bill;
pub mod building;
pub mod complaint;
pub mod emergency_contact;
pub mod payment_settings;
pub mod room;
pub mod tenant;
pub mod user;

pub use announcement::{Announcement, AnnouncementChanges, AnnouncementPriority, NewAnnouncement};
pub use bill::{
    Bill, BillAction, BillFilter, BillListing, BillStatus, BillType, NewBill, PaymentMethod,
    ReceiptRow, RentRun, TransitionError,
};
pub use building::{Building, BuildingChanges, BuildingSummary, BuildingType, NewBuilding};
pub use complaint::{Complaint, ComplaintCategory, ComplaintListing, ComplaintStatus};
pub use emergency_contact::{EmergencyContact, EmergencyContactChanges, NewEmergencyContact};
pub use payment_settings::PaymentSettings;
pub use room::{NewRoom, Room, RoomCategory, RoomChanges, RoomListing, RoomStatus};
pub use tenant::{
    NewTenant, RemovedTenant, Tenant, TenantChanges, TenantListing, TenantProfile,
};
pub use user::{NewUser, User, UserRole};
