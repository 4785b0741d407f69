use catalog_core::{
    NewProduct, PageMetadata, Product, ProductPatch, ProductValidationError, MIN_PRICE,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

#[test]
fn new_product_validation_enforces_policy() {
    assert!(NewProduct::new("Widget", dec("10.0000")).validate().is_ok());

    assert_eq!(
        NewProduct::new("  ", dec("10")).validate().unwrap_err(),
        ProductValidationError::EmptyName
    );
    assert_eq!(
        NewProduct::new("Widget", dec("9.9999")).validate().unwrap_err(),
        ProductValidationError::PriceTooLow {
            price: dec("9.9999")
        }
    );
    assert!(matches!(
        NewProduct::new("Widget", dec("10.12345")).validate(),
        Err(ProductValidationError::PriceTooPrecise { .. })
    ));
}

#[test]
fn patch_validation_checks_only_present_fields() {
    let price_only = ProductPatch {
        name: None,
        price: Some(dec("12.5")),
    };
    assert!(price_only.validate().is_ok());
    assert!(!price_only.is_empty());

    let bad_name = ProductPatch {
        name: Some(String::new()),
        price: None,
    };
    assert_eq!(
        bad_name.validate().unwrap_err(),
        ProductValidationError::EmptyName
    );
}

#[test]
fn validation_error_messages_mention_limits() {
    let err = NewProduct::new("Widget", dec("1")).validate().unwrap_err();
    assert!(err.to_string().contains(&MIN_PRICE.to_string()));
}

#[test]
fn product_serialization_uses_camel_case_wire_fields() {
    let product = Product {
        id: 1,
        name: "Widget".to_string(),
        price: dec("10.0000"),
        available: true,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
    };

    let json = serde_json::to_value(&product).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["name"], "Widget");
    assert_eq!(json["price"], "10.0000");
    assert_eq!(json["available"], true);
    assert_eq!(json["createdAt"], 1_700_000_000_000_i64);

    let decoded: Product = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, product);
}

#[test]
fn page_metadata_serializes_last_page_in_camel_case() {
    let metadata = PageMetadata {
        total: 3,
        last_page: 2,
        page: 1,
    };
    let json = serde_json::to_value(metadata).unwrap();
    assert_eq!(json, serde_json::json!({"total": 3, "lastPage": 2, "page": 1}));
}
