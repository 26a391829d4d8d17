//! Repository-level tests against a migrated SQLite file.

use chrono::NaiveDate;
use rentease_config::DatabaseConfig;
use rentease_database::{
    initialize_database, BillFilter, BillRepository, BillStatus, BillType, BuildingRepository,
    BuildingType, ComplaintCategory, ComplaintRepository, ComplaintStatus, DatabaseError,
    EmergencyContactRepository, NewBill, NewBuilding, NewRoom, NewTenant, NewUser,
    PaymentMethod, PaymentSettingsRepository, RoomCategory, RoomRepository, RoomStatus,
    TenantChanges, TenantRepository, UserRepository, UserRole,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn create_test_database() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}", temp_dir.path().join("repo.db").display()),
        max_connections: 2,
    };
    let pool = initialize_database(&config)
        .await
        .expect("failed to initialise test database");
    (pool, temp_dir)
}

fn tenant_account(name: &str) -> NewUser {
    NewUser {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        password_hash: "not-a-real-hash".to_string(),
        role: UserRole::Tenant,
    }
}

async fn building_with_rooms(pool: &SqlitePool, rents: &[f64]) -> (i64, Vec<i64>) {
    let building = BuildingRepository::new(pool.clone())
        .create(&NewBuilding {
            name: "Lake View".into(),
            address: "12 Shore Road".into(),
            total_floors: Some(3),
            building_type: BuildingType::Residential,
        })
        .await
        .unwrap();

    let rooms = RoomRepository::new(pool.clone());
    let mut ids = Vec::new();
    for (index, rent) in rents.iter().enumerate() {
        let room = rooms
            .create(&NewRoom {
                building_id: building.id,
                room_number: format!("10{index}"),
                room_type: "1BHK".into(),
                floor_number: Some(1),
                area_sqft: None,
                rent_amount: *rent,
                category: RoomCategory::Residential,
                description: None,
            })
            .await
            .unwrap();
        ids.push(room.id);
    }
    (building.id, ids)
}

async fn house_tenant(pool: &SqlitePool, name: &str, room_id: Option<i64>) -> i64 {
    let (tenant, _) = TenantRepository::new(pool.clone())
        .create_with_account(
            &tenant_account(name),
            &NewTenant {
                room_id,
                full_name: format!("{name} tenant"),
                ..NewTenant::default()
            },
        )
        .await
        .unwrap();
    tenant.id
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn duplicate_usernames_and_emails_are_reported_separately() {
    let (pool, _dir) = create_test_database().await;
    let users = UserRepository::new(pool);

    users.create(&tenant_account("asha")).await.unwrap();

    let err = users.create(&tenant_account("asha")).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Duplicate(ref m) if m == "Username already exists"));

    let mut other = tenant_account("ravi");
    other.email = "asha@example.com".into();
    let err = users.create(&other).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Duplicate(ref m) if m == "Email already exists"));
}

#[tokio::test]
async fn tenant_creation_occupies_room_and_rejects_second_occupant() {
    let (pool, _dir) = create_test_database().await;
    let (_, rooms) = building_with_rooms(&pool, &[12000.0]).await;

    house_tenant(&pool, "asha", Some(rooms[0])).await;

    let room = RoomRepository::new(pool.clone())
        .find_by_id(rooms[0])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(room.status, RoomStatus::Occupied);

    let err = TenantRepository::new(pool.clone())
        .create_with_account(
            &tenant_account("ravi"),
            &NewTenant {
                room_id: Some(rooms[0]),
                full_name: "Ravi".into(),
                ..NewTenant::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)));

    // The failed attempt must not leave a dangling login behind.
    assert!(UserRepository::new(pool)
        .find_by_username("ravi")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn relocating_a_tenant_swaps_room_occupancy() {
    let (pool, _dir) = create_test_database().await;
    let (_, rooms) = building_with_rooms(&pool, &[10000.0, 15000.0]).await;
    let tenant_id = house_tenant(&pool, "asha", Some(rooms[0])).await;

    let tenants = TenantRepository::new(pool.clone());
    let updated = tenants
        .update(
            tenant_id,
            &TenantChanges {
                room_id: Some(Some(rooms[1])),
                phone: Some("9000000000".into()),
                ..TenantChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.room_id, Some(rooms[1]));
    assert_eq!(updated.phone.as_deref(), Some("9000000000"));

    let room_repo = RoomRepository::new(pool.clone());
    let old_room = room_repo.find_by_id(rooms[0]).await.unwrap().unwrap();
    let new_room = room_repo.find_by_id(rooms[1]).await.unwrap().unwrap();
    assert_eq!(old_room.status, RoomStatus::Vacant);
    assert_eq!(new_room.status, RoomStatus::Occupied);
}

#[tokio::test]
async fn occupied_rooms_and_their_buildings_cannot_be_deleted() {
    let (pool, _dir) = create_test_database().await;
    let (building_id, rooms) = building_with_rooms(&pool, &[9000.0, 9500.0]).await;
    house_tenant(&pool, "asha", Some(rooms[0])).await;

    let room_err = RoomRepository::new(pool.clone()).delete(rooms[0]).await.unwrap_err();
    assert!(matches!(room_err, DatabaseError::ValidationError(_)));

    let building_err = BuildingRepository::new(pool.clone())
        .delete(building_id)
        .await
        .unwrap_err();
    assert!(matches!(building_err, DatabaseError::ValidationError(_)));

    RoomRepository::new(pool.clone()).delete(rooms[1]).await.unwrap();
}

#[tokio::test]
async fn deleting_a_tenant_frees_room_and_cascades_records() {
    let (pool, _dir) = create_test_database().await;
    let (building_id, rooms) = building_with_rooms(&pool, &[8000.0]).await;
    let tenant_id = house_tenant(&pool, "asha", Some(rooms[0])).await;

    let bills = BillRepository::new(pool.clone());
    let bill = bills
        .create(&NewBill {
            tenant_id,
            bill_type: BillType::Water,
            amount: 300.0,
            billing_month: None,
            due_date: date("2025-01-10"),
        })
        .await
        .unwrap();
    bills
        .record_screenshot(bill.id, BillStatus::Pending, "payment_screenshots/water.png")
        .await
        .unwrap();
    ComplaintRepository::new(pool.clone())
        .create(tenant_id, "Leak", "Kitchen tap", ComplaintCategory::Plumbing)
        .await
        .unwrap();

    let tenants = TenantRepository::new(pool.clone());
    tenants.set_photo(tenant_id, "tenant_photos/asha.jpg").await.unwrap();
    tenants
        .append_documents(tenant_id, &["tenant_docs/lease.pdf".to_string()])
        .await
        .unwrap();

    let removed = tenants.delete(tenant_id).await.unwrap();
    assert_eq!(
        removed.stored_files().collect::<Vec<_>>(),
        [
            "tenant_photos/asha.jpg",
            "tenant_docs/lease.pdf",
            "payment_screenshots/water.png"
        ]
    );
    assert!(UserRepository::new(pool.clone())
        .find_by_id(removed.tenant.user_id)
        .await
        .unwrap()
        .is_none());
    assert!(bills.list(&BillFilter::default()).await.unwrap().is_empty());
    assert!(ComplaintRepository::new(pool.clone())
        .list(None)
        .await
        .unwrap()
        .is_empty());

    let room = RoomRepository::new(pool.clone())
        .find_by_id(rooms[0])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(room.status, RoomStatus::Vacant);

    BuildingRepository::new(pool).delete(building_id).await.unwrap();
}

#[tokio::test]
async fn rent_generation_is_idempotent_per_month() {
    let (pool, _dir) = create_test_database().await;
    let (_, rooms) = building_with_rooms(&pool, &[10000.0, 12500.0]).await;
    house_tenant(&pool, "asha", Some(rooms[0])).await;
    house_tenant(&pool, "ravi", Some(rooms[1])).await;
    house_tenant(&pool, "unhoused", None).await;

    let bills = BillRepository::new(pool.clone());
    let first = bills.generate_rent("2025-03", date("2025-03-06")).await.unwrap();
    assert_eq!((first.created, first.skipped), (2, 0));

    let second = bills.generate_rent("2025-03", date("2025-03-06")).await.unwrap();
    assert_eq!((second.created, second.skipped), (0, 2));

    let next_month = bills.generate_rent("2025-04", date("2025-04-06")).await.unwrap();
    assert_eq!(next_month.created, 2);

    let listed = bills.list(&BillFilter::default()).await.unwrap();
    assert_eq!(listed.len(), 4);
    assert!(listed.iter().any(|b| b.amount == 12500.0));
}

#[tokio::test]
async fn manual_duplicate_rent_bill_is_rejected() {
    let (pool, _dir) = create_test_database().await;
    let (_, rooms) = building_with_rooms(&pool, &[10000.0]).await;
    let tenant_id = house_tenant(&pool, "asha", Some(rooms[0])).await;
    let bills = BillRepository::new(pool);

    let rent = NewBill {
        tenant_id,
        bill_type: BillType::Rent,
        amount: 10000.0,
        billing_month: Some("2025-05".into()),
        due_date: date("2025-05-06"),
    };
    bills.create(&rent).await.unwrap();
    let err = bills.create(&rent).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Duplicate(_)));

    // Utility bills for the same month are unconstrained.
    let water = NewBill {
        bill_type: BillType::Water,
        ..rent.clone()
    };
    bills.create(&water).await.unwrap();
    bills.create(&water).await.unwrap();
}

#[tokio::test]
async fn status_updates_are_compare_and_set() {
    let (pool, _dir) = create_test_database().await;
    let (_, rooms) = building_with_rooms(&pool, &[10000.0]).await;
    let tenant_id = house_tenant(&pool, "asha", Some(rooms[0])).await;
    let bills = BillRepository::new(pool);

    let bill = bills
        .create(&NewBill {
            tenant_id,
            bill_type: BillType::Electricity,
            amount: 750.0,
            billing_month: None,
            due_date: date("2025-02-06"),
        })
        .await
        .unwrap();

    let submitted = bills
        .record_screenshot(bill.id, BillStatus::Pending, "payment_screenshots/a.png")
        .await
        .unwrap();
    assert_eq!(submitted.status, BillStatus::PendingApproval);

    // A second caller that still believes the bill is pending loses.
    let err = bills
        .settle(bill.id, BillStatus::Pending, PaymentMethod::Manual, date("2025-02-07"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)));

    let paid = bills
        .settle(
            bill.id,
            BillStatus::PendingApproval,
            PaymentMethod::Screenshot,
            date("2025-02-07"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(paid.status, BillStatus::Paid);
    assert_eq!(paid.payment_method, Some(PaymentMethod::Screenshot));
    assert_eq!(paid.paid_date, Some(date("2025-02-07")));
}

#[tokio::test]
async fn a_gateway_payment_settles_only_one_bill() {
    let (pool, _dir) = create_test_database().await;
    let tenant_id = house_tenant(&pool, "ravi", None).await;
    let bills = BillRepository::new(pool);

    let mut ids = Vec::new();
    for amount in [10.0, 90000.0] {
        let bill = bills
            .create(&NewBill {
                tenant_id,
                bill_type: BillType::Maintenance,
                amount,
                billing_month: None,
                due_date: date("2025-05-06"),
            })
            .await
            .unwrap();
        ids.push(bill.id);
    }

    bills
        .settle(ids[0], BillStatus::Pending, PaymentMethod::Gateway, date("2025-05-01"), Some("pay_1"))
        .await
        .unwrap();

    let err = bills
        .settle(ids[1], BillStatus::Pending, PaymentMethod::Gateway, date("2025-05-01"), Some("pay_1"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Duplicate(_)));

    let untouched = bills.find_by_id(ids[1]).await.unwrap().unwrap();
    assert_eq!(untouched.status, BillStatus::Pending);
    assert_eq!(untouched.gateway_payment_id, None);
}

#[tokio::test]
async fn mark_overdue_only_touches_pending_bills_past_due() {
    let (pool, _dir) = create_test_database().await;
    let (_, rooms) = building_with_rooms(&pool, &[10000.0]).await;
    let tenant_id = house_tenant(&pool, "asha", Some(rooms[0])).await;
    let bills = BillRepository::new(pool);

    for due in ["2025-01-06", "2025-02-06", "2025-12-06"] {
        bills
            .create(&NewBill {
                tenant_id,
                bill_type: BillType::Maintenance,
                amount: 500.0,
                billing_month: None,
                due_date: date(due),
            })
            .await
            .unwrap();
    }
    let listed = bills.list(&BillFilter::default()).await.unwrap();
    let awaiting = listed.iter().find(|b| b.due_date == date("2025-02-06")).unwrap();
    bills
        .record_screenshot(awaiting.id, BillStatus::Pending, "payment_screenshots/x.png")
        .await
        .unwrap();

    let flagged = bills.mark_overdue(date("2025-06-01")).await.unwrap();
    assert_eq!(flagged, 1);

    let overdue = bills
        .list(&BillFilter {
            tenant_id: Some(tenant_id),
            status: Some(BillStatus::Overdue),
        })
        .await
        .unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].due_date, date("2025-01-06"));
}

#[tokio::test]
async fn closed_complaints_reject_replies() {
    let (pool, _dir) = create_test_database().await;
    let tenant_id = house_tenant(&pool, "asha", None).await;
    let complaints = ComplaintRepository::new(pool);

    let complaint = complaints
        .create(tenant_id, "Noise", "Loud pump", ComplaintCategory::Other)
        .await
        .unwrap();
    let replied = complaints
        .reply(complaint.id, "Technician booked", ComplaintStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(replied.status, ComplaintStatus::InProgress);

    complaints.close(complaint.id).await.unwrap();
    let err = complaints
        .reply(complaint.id, "Too late", ComplaintStatus::Resolved)
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)));
}

#[tokio::test]
async fn default_contacts_are_seeded_once() {
    let (pool, _dir) = create_test_database().await;
    let contacts = EmergencyContactRepository::new(pool);

    assert_eq!(contacts.seed_defaults().await.unwrap(), 5);
    assert_eq!(contacts.seed_defaults().await.unwrap(), 0);

    let listed = contacts.list().await.unwrap();
    assert_eq!(listed.len(), 5);
    assert_eq!(listed[0].service_type, "Police");
    assert_eq!(listed[0].phone_number, "100");
    assert!(listed.iter().all(|c| c.available_24x7));
}

#[tokio::test]
async fn payment_settings_behave_as_a_singleton() {
    let (pool, _dir) = create_test_database().await;
    let settings = PaymentSettingsRepository::new(pool);

    let empty = settings.get().await.unwrap();
    assert!(empty.upi_id.is_none() && empty.upi_qr_code.is_none());

    settings.set_upi_id(Some("rent@upi")).await.unwrap();
    assert_eq!(settings.set_qr_code("upi_qr_1_a.png").await.unwrap(), None);
    assert_eq!(
        settings.set_qr_code("upi_qr_2_b.png").await.unwrap().as_deref(),
        Some("upi_qr_1_a.png")
    );

    let current = settings.get().await.unwrap();
    assert_eq!(current.upi_id.as_deref(), Some("rent@upi"));
    assert_eq!(current.upi_qr_code.as_deref(), Some("upi_qr_2_b.png"));
}
