//! Cart items and price handling.

use serde::{Deserialize, Serialize};

// == Price ==
/// A unit price as the storefront supplies it: either a number or an
/// already formatted string such as `"₦1,200.50"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Formatted(String),
}

impl Price {
    /// Price in minor units (kobo, cents), rounded to the nearest unit.
    /// Unparsable text counts as zero.
    pub fn minor_units(&self) -> i64 {
        match self {
            Price::Amount(value) => to_minor(*value),
            Price::Formatted(text) => to_minor(parse_amount(text)),
        }
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Price::Amount(value)
    }
}

impl From<&str> for Price {
    fn from(text: &str) -> Self {
        Price::Formatted(text.to_string())
    }
}

fn to_minor(value: f64) -> i64 {
    if value.is_finite() {
        (value * 100.0).round() as i64
    } else {
        0
    }
}

/// Parses a formatted amount, keeping only digits, the decimal point and a
/// leading minus sign: `"₦1,200.50"` -> `1200.5`.
pub fn parse_amount(text: &str) -> f64 {
    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            cleaned.push(ch);
        } else if ch == '-' && cleaned.is_empty() {
            cleaned.push(ch);
        }
    }
    cleaned.parse().unwrap_or(0.0)
}

// == Cart Item ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Price,
    /// Always at least 1 while the item is in the cart
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
}

impl CartItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: impl Into<Price>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price: unit_price.into(),
            quantity: 1,
            image: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// unit price x quantity, in minor units. Saturates at the `i64` bounds.
    pub fn line_total_minor(&self) -> i64 {
        self.unit_price
            .minor_units()
            .saturating_mul(i64::from(self.quantity))
    }
}
