//! Checkout flow against the embedded database
//! Run: cargo test -p printdesk-server --test checkout_flow -- --nocapture
//!
//! 覆盖算价、折扣计数和写入事务的原子性

use printdesk_server::checkout::{CartItem, CartSelection, CartSubmission};
use printdesk_server::db::DbService;
use printdesk_server::db::models::{
    CheckoutItem, CheckoutOrder, DiscountCodeCreate, DiscountKind, DiscountMode, MenuOption,
    ProductCreate, ProductMenu, ProductType,
};
use printdesk_server::db::repository::{
    DiscountCodeRepository, OrderRepository, ProductRepository, RepoError,
};
use printdesk_server::{AppError, CheckoutService};
use rust_decimal::Decimal;

async fn setup() -> (DbService, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(tmp.path().to_str().unwrap()).await.unwrap();
    (service, tmp)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Seed one product with two option menus, returns its id string
async fn seed_product(service: &DbService) -> String {
    let products = ProductRepository::new(service.db.clone());
    let product = products
        .create(ProductCreate {
            name: "Poster".to_string(),
            product_type: ProductType::Digital,
            menus: Some(vec![
                ProductMenu {
                    name: "Size".to_string(),
                    options: vec![
                        MenuOption::new("A1", dec("10.00")),
                        MenuOption::new("A0", dec("18.00")),
                    ],
                },
                ProductMenu {
                    name: "Finish".to_string(),
                    options: vec![
                        MenuOption::new("Matte", dec("5.50")),
                        MenuOption::new("Gloss", dec("7.50")),
                    ],
                },
            ]),
        })
        .await
        .unwrap();
    product.id.unwrap().to_string()
}

fn cart(orderno: &str, product_id: &str, quantity: u32, code: Option<&str>) -> CartSubmission {
    CartSubmission {
        orderno: orderno.to_string(),
        customer_name: "Alice".to_string(),
        product_type: ProductType::Digital,
        deadline: None,
        discount_code: code.map(str::to_string),
        items: vec![CartItem {
            product_id: product_id.to_string(),
            quantity,
            selections: vec![
                CartSelection {
                    menu_name: "Size".to_string(),
                    option_name: "A0".to_string(),
                },
                CartSelection {
                    menu_name: "Finish".to_string(),
                    option_name: "Gloss".to_string(),
                },
            ],
        }],
    }
}

#[tokio::test]
async fn checkout_prices_and_persists_order() {
    let (service, _tmp) = setup().await;
    let product_id = seed_product(&service).await;

    let discounts = DiscountCodeRepository::new(service.db.clone());
    discounts
        .create(DiscountCodeCreate {
            code: Some("WELCOME10".to_string()),
            kind: DiscountKind::Percentage,
            mode: DiscountMode::Manual,
            amount: 10.0,
            expiration_date: None,
            use_limit: None,
        })
        .await
        .unwrap();

    let checkout = CheckoutService::new(service.db.clone());
    let order = checkout
        .submit(cart("PD-2001", &product_id, 2, Some("WELCOME10")))
        .await
        .unwrap();

    // 单件 18.00 + 7.50 = 25.50，两件小计 51.00，九折后 45.90
    assert_eq!(order.orderno, "PD-2001");
    assert_eq!(order.quantity, 2);
    assert_eq!(order.subtotal, dec("51.00"));
    assert_eq!(order.discount_amount, dec("5.10"));
    assert_eq!(order.total, dec("45.90"));
    assert_eq!(order.product_name.as_deref(), Some("Poster"));
    assert!(order.discount.is_some());
    assert!(order.tick.is_none());

    let used = discounts.find_by_code("WELCOME10").await.unwrap().unwrap();
    assert_eq!(used.times_used, 1);

    // 图遍历取回完整明细
    let orders = OrderRepository::new(service.db.clone());
    let detail = orders
        .get_detail(&order.id.unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.orderno, "PD-2001");
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].quantity, 2);
    assert_eq!(detail.items[0].unit_subtotal, dec("25.50"));
    assert_eq!(detail.items[0].options.len(), 2);
}

#[tokio::test]
async fn checkout_without_discount_charges_full_price() {
    let (service, _tmp) = setup().await;
    let product_id = seed_product(&service).await;

    let checkout = CheckoutService::new(service.db.clone());
    let order = checkout
        .submit(cart("PD-2002", &product_id, 1, None))
        .await
        .unwrap();

    assert_eq!(order.subtotal, dec("25.50"));
    assert_eq!(order.discount_amount, Decimal::ZERO);
    assert_eq!(order.total, dec("25.50"));
    assert!(order.discount.is_none());
}

#[tokio::test]
async fn oversized_fixed_discount_clamps_total_to_zero() {
    let (service, _tmp) = setup().await;
    let product_id = seed_product(&service).await;

    let discounts = DiscountCodeRepository::new(service.db.clone());
    discounts
        .create(DiscountCodeCreate {
            code: Some("BIGFIX".to_string()),
            kind: DiscountKind::Fixed,
            mode: DiscountMode::Manual,
            amount: 100.0,
            expiration_date: None,
            use_limit: None,
        })
        .await
        .unwrap();

    let checkout = CheckoutService::new(service.db.clone());
    let order = checkout
        .submit(cart("PD-2003", &product_id, 1, Some("BIGFIX")))
        .await
        .unwrap();

    assert_eq!(order.subtotal, dec("25.50"));
    assert_eq!(order.total, Decimal::ZERO);
}

#[tokio::test]
async fn exhausted_code_rejects_later_submissions() {
    let (service, _tmp) = setup().await;
    let product_id = seed_product(&service).await;

    let discounts = DiscountCodeRepository::new(service.db.clone());
    discounts
        .create(DiscountCodeCreate {
            code: Some("ONESHOT".to_string()),
            kind: DiscountKind::Fixed,
            mode: DiscountMode::Manual,
            amount: 1.0,
            expiration_date: None,
            use_limit: Some(1),
        })
        .await
        .unwrap();

    let checkout = CheckoutService::new(service.db.clone());
    checkout
        .submit(cart("PD-2004", &product_id, 1, Some("ONESHOT")))
        .await
        .unwrap();

    let err = checkout
        .submit(cart("PD-2005", &product_id, 1, Some("ONESHOT")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);

    // 拒绝发生在落单前，没有新订单也没有多计一次使用
    let orders = OrderRepository::new(service.db.clone());
    assert!(orders.find_by_orderno("PD-2005").await.unwrap().is_none());
    let code = discounts.find_by_code("ONESHOT").await.unwrap().unwrap();
    assert_eq!(code.times_used, 1);
}

#[tokio::test]
async fn write_transaction_rolls_back_on_discount_failure() {
    let (service, _tmp) = setup().await;
    let discounts = DiscountCodeRepository::new(service.db.clone());
    discounts
        .create(DiscountCodeCreate {
            code: Some("DRAINED".to_string()),
            kind: DiscountKind::Fixed,
            mode: DiscountMode::Manual,
            amount: 1.0,
            expiration_date: None,
            use_limit: Some(0),
        })
        .await
        .unwrap();

    // 绕过结账服务的预校验，直接走仓储事务
    let orders = OrderRepository::new(service.db.clone());
    let err = orders
        .create_with_items(CheckoutOrder {
            orderno: "PD-9100".to_string(),
            customer_name: "Bob".to_string(),
            product_type: ProductType::Laser,
            deadline: None,
            product_name: Some("Flyer".to_string()),
            quantity: 1,
            subtotal: dec("10.00"),
            discount_amount: dec("1.00"),
            total: dec("9.00"),
            discount_code: Some("DRAINED".to_string()),
            items: vec![CheckoutItem {
                product: None,
                name: "Flyer".to_string(),
                quantity: 1,
                unit_subtotal: dec("10.00"),
                options: vec![],
            }],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)), "got {:?}", err);

    // 整个事务回滚：订单行不存在
    assert!(orders.find_by_orderno("PD-9100").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_orderno_is_rejected() {
    let (service, _tmp) = setup().await;
    let product_id = seed_product(&service).await;

    let checkout = CheckoutService::new(service.db.clone());
    checkout
        .submit(cart("PD-2006", &product_id, 1, None))
        .await
        .unwrap();
    let err = checkout
        .submit(cart("PD-2006", &product_id, 1, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
}

#[tokio::test]
async fn unknown_option_selection_is_rejected() {
    let (service, _tmp) = setup().await;
    let product_id = seed_product(&service).await;

    let mut submission = cart("PD-2007", &product_id, 1, None);
    submission.items[0].selections[0].option_name = "A9".to_string();

    let checkout = CheckoutService::new(service.db.clone());
    let err = checkout.submit(submission).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);

    let orders = OrderRepository::new(service.db.clone());
    assert!(orders.find_by_orderno("PD-2007").await.unwrap().is_none());
}

#[tokio::test]
async fn deactivated_product_cannot_be_ordered() {
    let (service, _tmp) = setup().await;
    let product_id = seed_product(&service).await;

    let products = ProductRepository::new(service.db.clone());
    products.delete(&product_id).await.unwrap();

    let checkout = CheckoutService::new(service.db.clone());
    let err = checkout
        .submit(cart("PD-2008", &product_id, 1, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);
}
