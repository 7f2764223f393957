//! Personnel management and vehicle assignment.

mod common;

use common::Harness;
use fleet_office::domain::{NewUser, NewVehicle, Password, UserRole};
use fleet_office::errors::AppError;
use fleet_office::services::ServiceContainer;

fn new_user(username: &str, code: &str, password: &str, role: UserRole) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: password.to_string(),
        role,
        personnel_code: code.to_string(),
        phone: "09110000000".to_string(),
    }
}

#[tokio::test]
async fn test_add_user_then_duplicate_username_rejected() {
    let h = Harness::new();
    let admin = h.admin().await;
    let users = h.services.users();

    let created = users
        .add_user(&admin, new_user("driver1", "P001", "pass1234", UserRole::Driver))
        .await
        .unwrap();
    assert_eq!(created.last_login, None);
    assert_eq!(created.registration_date, common::at(2024, 7, 20));

    let before = h.snapshot().await;
    let err = users
        .add_user(&admin, new_user("driver1", "P999", "pass1234", UserRole::Driver))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref f) if f == "Username"));
    let after = h.snapshot().await;
    assert_eq!(after.users.len(), before.users.len());
    assert_eq!(after.logs.len(), before.logs.len());
}

#[tokio::test]
async fn test_duplicate_personnel_code_rejected() {
    let h = Harness::new();
    let admin = h.admin().await;

    let err = h
        .services
        .users()
        .add_user(&admin, new_user("fresh", "1001", "pass", UserRole::Driver))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref f) if f == "Personnel code"));
}

#[tokio::test]
async fn test_add_user_checks_in_order() {
    let h = Harness::new();
    let admin = h.admin().await;

    // Taken username wins over a too-long password.
    let err = h
        .services
        .users()
        .add_user(&admin, new_user("user1", "P777", "123456789", UserRole::Driver))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = h
        .services
        .users()
        .add_user(&admin, new_user("new", "P777", "123456789", UserRole::Driver))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_only_driver_and_workshop_roles_can_be_created() {
    let h = Harness::new();
    let admin = h.admin().await;

    let err = h
        .services
        .users()
        .add_user(&admin, new_user("boss", "P900", "pass", UserRole::Admin))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mechanic = h
        .services
        .users()
        .add_user(&admin, new_user("mechanic2", "P901", "pass", UserRole::Workshop))
        .await
        .unwrap();
    assert_eq!(mechanic.role, UserRole::Workshop);
}

#[tokio::test]
async fn test_driver_cannot_add_users() {
    let h = Harness::new();
    let driver = h.login("user1").await;

    let err = h
        .services
        .users()
        .add_user(&driver, new_user("x", "P1", "pass", UserRole::Driver))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn test_change_password() {
    let h = Harness::new();
    let admin = h.admin().await;
    let user1 = h.user_id("user1").await;

    h.services
        .users()
        .change_password(&admin, user1, "newpass")
        .await
        .unwrap();

    let state = h.snapshot().await;
    let stored = state.users.get(user1).unwrap();
    assert!(Password::from_hash(stored.password_hash.clone()).verify("newpass"));
    assert!(state.logs.first().unwrap().action.contains("user1"));

    let err = h
        .services
        .users()
        .change_password(&admin, user1, "way-too-long")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = h
        .services
        .users()
        .change_password(&admin, uuid::Uuid::new_v4(), "short")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_change_password_to_empty_is_accepted() {
    let h = Harness::new();
    let admin = h.admin().await;
    let user2 = h.user_id("user2").await;

    h.services
        .users()
        .change_password(&admin, user2, "")
        .await
        .unwrap();

    h.services.auth().login("user2", "").await.unwrap();
    let err = h
        .services
        .auth()
        .login("user2", common::SEED_PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_update_own_profile_refreshes_session() {
    let h = Harness::new();
    let mut session = h.login("user1").await;
    let id = session.user_id();

    let updated = h
        .services
        .users()
        .update_profile(&mut session, id, "driver-one", Some("fresh"))
        .await
        .unwrap();

    assert_eq!(updated.username, "driver-one");
    assert_eq!(session.username(), "driver-one");

    let logs = h.services.audit().logs_for("driver-one").await.unwrap();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].action.contains("\"user1\""));
    assert!(logs[0].action.contains(" و "));

    h.services.auth().login("driver-one", "fresh").await.unwrap();
}

#[tokio::test]
async fn test_update_profile_without_changes_writes_no_log() {
    let h = Harness::new();
    let mut session = h.login("user2").await;
    let id = session.user_id();
    let before = h.snapshot().await.logs.len();

    h.services
        .users()
        .update_profile(&mut session, id, "user2", Some(""))
        .await
        .unwrap();

    assert_eq!(h.snapshot().await.logs.len(), before);
    h.services.auth().login("user2", common::SEED_PASSWORD).await.unwrap();
}

#[tokio::test]
async fn test_update_profile_rejections() {
    let h = Harness::new();
    let mut session = h.login("user1").await;
    let own = session.user_id();
    let other = h.user_id("user2").await;

    let err = h
        .services
        .users()
        .update_profile(&mut session, own, "user2", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = h
        .services
        .users()
        .update_profile(&mut session, own, "user1", Some("123456789"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = h
        .services
        .users()
        .update_profile(&mut session, other, "hijack", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    assert_eq!(session.username(), "user1");
}

#[tokio::test]
async fn test_admin_updates_someone_else_without_touching_own_session() {
    let h = Harness::new();
    let mut admin = h.admin().await;
    let user2 = h.user_id("user2").await;

    h.services
        .users()
        .update_profile(&mut admin, user2, "user2-renamed", None)
        .await
        .unwrap();

    assert_eq!(admin.username(), "admin");
    let renamed = h.services.users().get_user(user2).await.unwrap();
    assert_eq!(renamed.username, "user2-renamed");
}

#[tokio::test]
async fn test_reassigning_vehicle_moves_it_between_drivers() {
    let h = Harness::new();
    let admin = h.admin().await;
    let users = h.services.users();

    let d1 = users
        .add_user(&admin, new_user("driver1", "P001", "pass1234", UserRole::Driver))
        .await
        .unwrap();
    let d2 = users
        .add_user(&admin, new_user("driver2", "P002", "pass1234", UserRole::Driver))
        .await
        .unwrap();
    let v1 = h
        .services
        .fleet()
        .add_vehicle(
            &admin,
            NewVehicle {
                code: "V1".to_string(),
                vehicle_type: "Volvo".to_string(),
                plate_number: "12A345-44".to_string(),
            },
        )
        .await
        .unwrap();

    users.assign_vehicle(&admin, d1.id, Some(v1.id)).await.unwrap();
    users.assign_vehicle(&admin, d2.id, Some(v1.id)).await.unwrap();

    let state = h.snapshot().await;
    assert_eq!(state.vehicles.get(v1.id).unwrap().driver_id, Some(d2.id));
    assert!(state.vehicle_held_by(d1.id).is_none());
    assert!(state.integrity_issues().is_empty());
}

#[tokio::test]
async fn test_assigning_new_vehicle_releases_old_one() {
    let h = Harness::new();
    let admin = h.admin().await;
    let user1 = h.user_id("user1").await;
    let tr101 = h.vehicle_id("TR-101").await;
    let tr103 = h.vehicle_id("TR-103").await;

    h.services
        .users()
        .assign_vehicle(&admin, user1, Some(tr103))
        .await
        .unwrap();

    let held = h.services.users().assigned_vehicle(user1).await.unwrap();
    assert_eq!(held.map(|v| v.id), Some(tr103));
    let state = h.snapshot().await;
    assert_eq!(state.vehicles.get(tr101).unwrap().driver_id, None);
}

#[tokio::test]
async fn test_unassign_vehicle() {
    let h = Harness::new();
    let admin = h.admin().await;
    let user2 = h.user_id("user2").await;

    h.services
        .users()
        .assign_vehicle(&admin, user2, None)
        .await
        .unwrap();

    assert!(h.services.users().assigned_vehicle(user2).await.unwrap().is_none());
    let state = h.snapshot().await;
    assert!(state.logs.first().unwrap().action.contains("حذف کرد"));
}

#[tokio::test]
async fn test_assign_unknown_ids_not_found() {
    let h = Harness::new();
    let admin = h.admin().await;
    let user1 = h.user_id("user1").await;

    let err = h
        .services
        .users()
        .assign_vehicle(&admin, user1, Some(uuid::Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref e) if e == "Vehicle"));

    // The failed call must not have released user1's current vehicle.
    assert!(h.services.users().assigned_vehicle(user1).await.unwrap().is_some());

    let err = h
        .services
        .users()
        .assign_vehicle(&admin, uuid::Uuid::new_v4(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref e) if e == "User"));
}

#[tokio::test]
async fn test_list_drivers() {
    let h = Harness::new();
    let drivers = h.services.users().list_drivers().await.unwrap();
    let names: Vec<_> = drivers.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["user1", "user2"]);
}
