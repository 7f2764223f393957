mod common;

use common::Harness;
use fleet_office::domain::{AlertTarget, NewAlert};
use fleet_office::errors::AppError;
use fleet_office::services::ServiceContainer;

fn alert(title: &str, target: AlertTarget) -> NewAlert {
    NewAlert {
        title: title.to_string(),
        message: "جاده هراز بسته است".to_string(),
        target,
    }
}

#[tokio::test]
async fn test_visibility_by_target() {
    let h = Harness::new();
    let admin = h.admin().await;
    let user1 = h.login("user1").await;
    let user2 = h.login("user2").await;
    let alerts = h.services.alerts();

    alerts
        .add_alert(&admin, alert("همه", AlertTarget::AllUsers))
        .await
        .unwrap();
    alerts
        .add_alert(
            &admin,
            alert("فقط user1", AlertTarget::SpecificUsers(vec!["user1".to_string()])),
        )
        .await
        .unwrap();
    alerts
        .add_alert(&admin, alert("مدیران", AlertTarget::AllAdmins))
        .await
        .unwrap();

    let titles = |list: Vec<fleet_office::domain::Alert>| -> Vec<String> {
        list.into_iter().map(|a| a.title).collect()
    };

    assert_eq!(
        titles(alerts.visible_alerts(user1.user()).await.unwrap()),
        vec!["فقط user1", "همه"]
    );
    assert_eq!(
        titles(alerts.visible_alerts(user2.user()).await.unwrap()),
        vec!["همه"]
    );
    assert_eq!(
        titles(alerts.visible_alerts(admin.user()).await.unwrap()),
        vec!["مدیران"]
    );

    let mechanic = h.login("تعمیرکار").await;
    assert!(alerts.visible_alerts(mechanic.user()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unread_until_marked_read() {
    let h = Harness::new();
    let admin = h.admin().await;
    let driver = h.login("user1").await;
    let alerts = h.services.alerts();

    assert!(!alerts.has_unread(driver.user()).await.unwrap());

    alerts
        .add_alert(&admin, alert("اول", AlertTarget::AllUsers))
        .await
        .unwrap();
    assert!(alerts.has_unread(driver.user()).await.unwrap());

    alerts.mark_read(driver.user()).await.unwrap();
    assert!(!alerts.has_unread(driver.user()).await.unwrap());

    alerts
        .add_alert(&admin, alert("دوم", AlertTarget::AllUsers))
        .await
        .unwrap();
    assert!(alerts.has_unread(driver.user()).await.unwrap());
}

#[tokio::test]
async fn test_alert_for_someone_else_keeps_read_state() {
    let h = Harness::new();
    let admin = h.admin().await;
    let driver = h.login("user2").await;
    let alerts = h.services.alerts();

    alerts
        .add_alert(&admin, alert("همه", AlertTarget::AllUsers))
        .await
        .unwrap();
    alerts.mark_read(driver.user()).await.unwrap();

    alerts
        .add_alert(
            &admin,
            alert("خصوصی", AlertTarget::SpecificUsers(vec!["user1".to_string()])),
        )
        .await
        .unwrap();
    assert!(!alerts.has_unread(driver.user()).await.unwrap());
}

#[tokio::test]
async fn test_add_alert_rules() {
    let h = Harness::new();
    let admin = h.admin().await;
    let driver = h.login("user1").await;

    let err = h
        .services
        .alerts()
        .add_alert(&driver, alert("x", AlertTarget::AllUsers))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = h
        .services
        .alerts()
        .add_alert(&admin, alert("", AlertTarget::AllUsers))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let sent = h
        .services
        .alerts()
        .add_alert(&admin, alert("تعطیلی", AlertTarget::AllUsers))
        .await
        .unwrap();
    assert_eq!(sent.sender, "admin");
    assert_eq!(sent.created_at, common::at(2024, 7, 20));
    let log = h.snapshot().await.logs.first().cloned().unwrap();
    assert!(log.action.contains("تعطیلی"));
    assert!(log.action.contains("همه کاربران"));
}
