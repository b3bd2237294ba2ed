//! Timeline scheduling commands against the embedded database
//! Run: cargo test -p printdesk-server --test timeline_flow -- --nocapture

use chrono::NaiveDate;
use printdesk_server::db::DbService;
use printdesk_server::db::models::{OrderCreate, ProductType, StaffCreate, StaffRole};
use printdesk_server::db::repository::{OrderRepository, StaffRepository};
use printdesk_server::timeline::SearchResult;
use printdesk_server::{AppError, TimelineService};

async fn setup() -> (DbService, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(tmp.path().to_str().unwrap()).await.unwrap();
    (service, tmp)
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn seed_order(service: &DbService, orderno: &str) -> String {
    let orders = OrderRepository::new(service.db.clone());
    let order = orders
        .create(OrderCreate {
            user_id: None,
            orderno: orderno.to_string(),
            customer_name: "Walk-in".to_string(),
            product_type: ProductType::Sign,
            deadline: None,
        })
        .await
        .unwrap();
    order.id.unwrap().to_string()
}

#[tokio::test]
async fn placed_order_visible_only_on_its_date() {
    let (service, _tmp) = setup().await;
    let svc = TimelineService::new(service.db.clone());
    let a = seed_order(&service, "PD-3001").await;
    seed_order(&service, "PD-3002").await;

    let placed = svc.move_to_tick(&a, 3, d("2026-08-10")).await.unwrap();
    assert_eq!(placed.tick, Some(3));
    assert_eq!(placed.timeline_date, Some(d("2026-08-10")));

    // 排期日：两单可见（一个已排，一个在队列）
    let board = svc.load_board(d("2026-08-10")).await.unwrap();
    assert_eq!(board.orders().len(), 2);
    assert_eq!(board.occupancy()[3], 1);

    // 另一日：只剩队列里的那单
    let other = svc.load_board(d("2026-08-11")).await.unwrap();
    assert_eq!(other.orders().len(), 1);
    assert_eq!(other.orders()[0].orderno, "PD-3002");
}

#[tokio::test]
async fn tick_out_of_range_is_rejected() {
    let (service, _tmp) = setup().await;
    let svc = TimelineService::new(service.db.clone());
    let a = seed_order(&service, "PD-3003").await;

    let err = svc.move_to_tick(&a, 24, d("2026-08-10")).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);
}

#[tokio::test]
async fn auto_place_fills_least_loaded_ticks() {
    let (service, _tmp) = setup().await;
    let svc = TimelineService::new(service.db.clone());
    let date = d("2026-08-10");
    let a = seed_order(&service, "PD-3004").await;
    let b = seed_order(&service, "PD-3005").await;
    let c = seed_order(&service, "PD-3006").await;

    svc.move_to_tick(&a, 0, date).await.unwrap();
    let placed_b = svc.move_to_least_loaded_tick(&b, date).await.unwrap();
    assert_eq!(placed_b.tick, Some(1));
    let placed_c = svc.move_to_least_loaded_tick(&c, date).await.unwrap();
    assert_eq!(placed_c.tick, Some(2));
}

#[tokio::test]
async fn completed_orders_are_frozen_on_the_timeline() {
    let (service, _tmp) = setup().await;
    let svc = TimelineService::new(service.db.clone());
    let a = seed_order(&service, "PD-3007").await;

    svc.move_to_tick(&a, 5, d("2026-08-10")).await.unwrap();
    let done = svc.mark_complete(&a).await.unwrap();
    assert!(done.completed);

    let err = svc.move_to_tick(&a, 6, d("2026-08-10")).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {:?}", err);
    let err = svc.unplace(&a).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {:?}", err);
}

#[tokio::test]
async fn cross_day_move_requires_unplace_first() {
    let (service, _tmp) = setup().await;
    let svc = TimelineService::new(service.db.clone());
    let a = seed_order(&service, "PD-3008").await;

    svc.move_to_tick(&a, 2, d("2026-08-10")).await.unwrap();
    let err = svc.move_to_tick(&a, 5, d("2026-08-11")).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);

    let queued = svc.unplace(&a).await.unwrap();
    assert!(queued.tick.is_none());
    assert!(queued.timeline_date.is_none());

    let moved = svc.move_to_tick(&a, 5, d("2026-08-11")).await.unwrap();
    assert_eq!(moved.tick, Some(5));
    assert_eq!(moved.timeline_date, Some(d("2026-08-11")));
}

#[tokio::test]
async fn assignment_requires_active_staff() {
    let (service, _tmp) = setup().await;
    let svc = TimelineService::new(service.db.clone());
    let staff_repo = StaffRepository::new(service.db.clone());
    let a = seed_order(&service, "PD-3009").await;

    let staff = staff_repo
        .create(StaffCreate {
            email: "op@printdesk.local".to_string(),
            password: "correct-horse".to_string(),
            name: "Omar".to_string(),
            role: StaffRole::Operator,
        })
        .await
        .unwrap();
    let staff_id = staff.id.unwrap().to_string();

    let assigned = svc.assign(&a, Some(staff_id.as_str())).await.unwrap();
    assert!(assigned.assigned_to.is_some());

    let cleared = svc.assign(&a, None).await.unwrap();
    assert!(cleared.assigned_to.is_none());

    // 停用后不可再指派
    service
        .db
        .query("UPDATE staff SET is_active = false")
        .await
        .unwrap();
    let err = svc.assign(&a, Some(staff_id.as_str())).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {:?}", err);
}

#[tokio::test]
async fn search_classifies_orders() {
    let (service, _tmp) = setup().await;
    let svc = TimelineService::new(service.db.clone());
    let a = seed_order(&service, "PD-3010").await;

    assert!(matches!(
        svc.search("PD-9999").await.unwrap(),
        SearchResult::NotFound
    ));
    assert!(matches!(
        svc.search("PD-3010").await.unwrap(),
        SearchResult::Unplaced { .. }
    ));

    svc.move_to_tick(&a, 4, d("2026-08-10")).await.unwrap();
    match svc.search_on(d("2026-08-10"), "PD-3010").await.unwrap() {
        SearchResult::Placed {
            tick,
            scroll_offset,
            order,
        } => {
            assert_eq!(tick, 4);
            assert_eq!(scroll_offset, 640);
            assert_eq!(order.orderno, "PD-3010");
        }
        other => panic!("expected placed, got {:?}", other),
    }

    // 从别的日期搜索会退回全局查找，仍然能找到
    assert!(matches!(
        svc.search_on(d("2026-08-11"), "PD-3010").await.unwrap(),
        SearchResult::Placed { tick: 4, .. }
    ));
}
