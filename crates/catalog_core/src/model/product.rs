//! Product domain model and field validation.
//!
//! # Responsibility
//! - Define the canonical product record returned by every catalog operation.
//! - Define create/patch inputs and the pure validation applied to them by
//!   boundary layers before the core is called.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - `available` is the source of truth for soft-delete state.
//! - `ProductPatch` has no identity or availability fields, so an update can
//!   only ever touch `name` and `price`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned product identifier.
pub type ProductId = i64;

/// Number of fractional digits kept for prices.
pub const PRICE_SCALE: u32 = 4;

/// Lowest price accepted by catalog policy.
pub const MIN_PRICE: Decimal = Decimal::TEN;

/// Canonical product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Exact decimal price, serialized as a string to avoid float rounding.
    pub price: Decimal,
    /// `false` once the product has been soft-deleted.
    pub available: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Bumped by update and remove.
    pub updated_at: i64,
}

impl Product {
    /// Returns whether this product is visible to catalog reads.
    pub fn is_active(&self) -> bool {
        self.available
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Checks both fields against catalog policy.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        validate_name(&self.name)?;
        validate_price(self.price)
    }
}

/// Partial update input. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl ProductPatch {
    /// Returns true when the patch carries no field to change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }

    /// Checks the present fields against catalog policy.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if let Some(name) = self.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

/// Policy violations reported by product field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    EmptyName,
    PriceTooLow { price: Decimal },
    PriceTooPrecise { price: Decimal },
    /// Too many integer digits to keep [`PRICE_SCALE`] fractional digits.
    PriceOutOfRange { price: Decimal },
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::PriceTooLow { price } => {
                write!(f, "price must not be less than {MIN_PRICE}, got {price}")
            }
            Self::PriceTooPrecise { price } => write!(
                f,
                "price must have at most {PRICE_SCALE} decimal places, got {price}"
            ),
            Self::PriceOutOfRange { price } => write!(
                f,
                "price is too large to store with {PRICE_SCALE} decimal places, got {price}"
            ),
        }
    }
}

impl Error for ProductValidationError {}

/// Rejects empty or whitespace-only names.
pub fn validate_name(name: &str) -> Result<(), ProductValidationError> {
    if name.trim().is_empty() {
        return Err(ProductValidationError::EmptyName);
    }
    Ok(())
}

/// Rejects prices below [`MIN_PRICE`] or with more than [`PRICE_SCALE`]
/// significant fractional digits.
pub fn validate_price(price: Decimal) -> Result<(), ProductValidationError> {
    if price < MIN_PRICE {
        return Err(ProductValidationError::PriceTooLow { price });
    }
    // Trailing zeros do not count: `12.50000` is a valid price.
    if price.normalize().scale() > PRICE_SCALE {
        return Err(ProductValidationError::PriceTooPrecise { price });
    }
    if to_price_scale(price).is_none() {
        return Err(ProductValidationError::PriceOutOfRange { price });
    }
    Ok(())
}

/// Rescales `price` to exactly [`PRICE_SCALE`] fractional digits.
///
/// Returns `None` when the value is too large for that scale, since
/// `Decimal::rescale` silently settles for fewer digits.
pub fn to_price_scale(price: Decimal) -> Option<Decimal> {
    let mut scaled = price;
    scaled.rescale(PRICE_SCALE);
    (scaled.scale() == PRICE_SCALE).then_some(scaled)
}
