//! Fares, travel classes and discounts.

use std::fmt;

use serde::Deserialize;

/// Fare tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TravelClass {
    #[serde(rename = "FIRST_CLASS")]
    First,
    #[default]
    #[serde(rename = "SECOND_CLASS")]
    Second,
}

impl TravelClass {
    /// Interpret a free-text class; only "first" selects first class.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("first") {
            TravelClass::First
        } else {
            TravelClass::Second
        }
    }

    /// The integer NS expects in the `travelClass` query parameter.
    pub fn as_query_int(self) -> u8 {
        match self {
            TravelClass::First => 1,
            TravelClass::Second => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TravelClass::First => "FIRST_CLASS",
            TravelClass::Second => "SECOND_CLASS",
        }
    }
}

/// Discount applied when pricing a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    #[default]
    NoDiscount,
    #[serde(rename = "DISCOUNT_20_PERCENT")]
    Discount20Percent,
    #[serde(rename = "DISCOUNT_40_PERCENT")]
    Discount40Percent,
}

impl DiscountType {
    /// Interpret a discount key: "none", "20_percent" or "40_percent".
    ///
    /// Unknown keys fall back to no discount.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "20_percent" => DiscountType::Discount20Percent,
            "40_percent" => DiscountType::Discount40Percent,
            _ => DiscountType::NoDiscount,
        }
    }

    /// The upstream token for this discount.
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountType::NoDiscount => "NO_DISCOUNT",
            DiscountType::Discount20Percent => "DISCOUNT_20_PERCENT",
            DiscountType::Discount40Percent => "DISCOUNT_40_PERCENT",
        }
    }
}

impl fmt::Display for TravelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fare for one product/class/discount combination.
///
/// Class and discount stay as raw strings: NS adds new values without notice
/// and an unknown value must not make the whole trip unreadable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub price_in_cents: i64,
    pub price_in_cents_excluding_supplement: Option<i64>,
    pub supplement_in_cents: Option<i64>,
    pub buyable_ticket_price_in_cents: Option<i64>,
    /// e.g. "OVCHIPKAART_ENKELE_REIS"
    pub product: Option<String>,
    pub travel_class: Option<String>,
    pub discount_type: Option<String>,
}

/// Format an amount in euro cents as a display string, e.g. `€12.50`.
///
/// Integer arithmetic only.
pub fn format_price(price_in_cents: i64) -> String {
    let sign = if price_in_cents < 0 { "-" } else { "" };
    let cents = price_in_cents.unsigned_abs();
    format!("€{sign}{}.{:02}", cents / 100, cents % 100)
}
