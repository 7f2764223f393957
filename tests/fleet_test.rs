mod common;

use chrono::NaiveDate;
use common::Harness;
use fleet_office::domain::{NewMaintenanceRecord, NewVehicle, VehicleStatus};
use fleet_office::errors::AppError;
use fleet_office::services::ServiceContainer;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn vehicle(code: &str, plate: &str) -> NewVehicle {
    NewVehicle {
        code: code.to_string(),
        vehicle_type: "Scania R500".to_string(),
        plate_number: plate.to_string(),
    }
}

#[tokio::test]
async fn test_add_vehicle_is_listed_first_and_available() {
    let h = Harness::new();
    let admin = h.admin().await;

    let added = h
        .services
        .fleet()
        .add_vehicle(&admin, vehicle("TR-104", "44D000"))
        .await
        .unwrap();

    assert_eq!(added.status, VehicleStatus::Available);
    assert_eq!(added.driver_id, None);

    let vehicles = h.services.fleet().list_vehicles().await.unwrap();
    assert_eq!(vehicles.len(), 4);
    assert_eq!(vehicles[0].code, "TR-104");

    let log = h.snapshot().await.logs.first().cloned().unwrap();
    assert_eq!(log.username, "admin");
    assert!(log.action.contains("44D000"));
}

#[tokio::test]
async fn test_duplicate_plate_reported_before_duplicate_code() {
    let h = Harness::new();
    let admin = h.admin().await;
    let fleet = h.services.fleet();

    let err = fleet
        .add_vehicle(&admin, vehicle("TR-101", "۱۱ع۱۲۳ایران۴۴"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref f) if f == "Plate number"));

    let err = fleet
        .add_vehicle(&admin, vehicle("TR-101", "99Z999"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref f) if f == "Vehicle code"));

    assert_eq!(fleet.list_vehicles().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_add_vehicle_requires_fleet_permission() {
    let h = Harness::new();
    let mechanic = h.login("تعمیرکار").await;

    let err = h
        .services
        .fleet()
        .add_vehicle(&mechanic, vehicle("TR-200", "00X000"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn test_empty_vehicle_fields_rejected() {
    let h = Harness::new();
    let admin = h.admin().await;

    let err = h
        .services
        .fleet()
        .add_vehicle(&admin, vehicle("", "00X000"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_last_maintenance_date_from_seed() {
    let h = Harness::new();
    let tr101 = h.vehicle_id("TR-101").await;

    let last = h.services.fleet().last_maintenance_date(tr101).await.unwrap();
    assert_eq!(last, Some(date("2024-06-20")));
}

#[tokio::test]
async fn test_maintenance_history_stays_newest_first() {
    let h = Harness::new();
    let admin = h.admin().await;
    let tr101 = h.vehicle_id("TR-101").await;

    h.services
        .fleet()
        .add_maintenance_record(
            &admin,
            NewMaintenanceRecord {
                vehicle_id: tr101,
                service_type: "تعویض فیلتر".to_string(),
                cost: 800_000,
                date: date("2024-05-01"),
            },
        )
        .await
        .unwrap();

    let history = h.services.fleet().maintenance_history(tr101).await.unwrap();
    let dates: Vec<_> = history.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![date("2024-06-20"), date("2024-05-01"), date("2024-04-10")]
    );

    // An older record does not move the latest date.
    let last = h.services.fleet().last_maintenance_date(tr101).await.unwrap();
    assert_eq!(last, Some(date("2024-06-20")));
}

#[tokio::test]
async fn test_maintenance_for_unknown_vehicle() {
    let h = Harness::new();
    let admin = h.admin().await;

    let err = h
        .services
        .fleet()
        .add_maintenance_record(
            &admin,
            NewMaintenanceRecord {
                vehicle_id: uuid::Uuid::new_v4(),
                service_type: "oil".to_string(),
                cost: 1,
                date: date("2024-07-01"),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref e) if e == "Vehicle"));
}

#[tokio::test]
async fn test_new_vehicle_has_no_maintenance() {
    let h = Harness::new();
    let admin = h.admin().await;
    let added = h
        .services
        .fleet()
        .add_vehicle(&admin, vehicle("TR-105", "55E555"))
        .await
        .unwrap();

    let last = h.services.fleet().last_maintenance_date(added.id).await.unwrap();
    assert_eq!(last, None);
}

#[tokio::test]
async fn test_dispatch_summary_from_seed() {
    let h = Harness::new();
    let summary = h.services.fleet().dispatch_summary().await.unwrap();

    let queued: Vec<_> = summary.in_queue.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(queued, vec!["TR-102"]);
    assert_eq!(summary.assigned.len(), 1);
    assert_eq!(summary.assigned[0].distance_km, 2800);
    assert_eq!(summary.en_route.len(), 1);
    assert_eq!(summary.en_route[0].distance_km, 2500);
}
