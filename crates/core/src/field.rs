//! The closed set of mutable catalog fields and their typed values.
//!
//! The dashboard sends fields as wire strings; everything is parsed into
//! these enums at the boundary so unknown strings fail before any store work
//! happens.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A mutable catalog field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    StockQuantity,
    StockStatus,
    ManageStock,
    RegularPrice,
    SalePrice,
    Name,
}

impl FieldName {
    /// Wire name as the dashboard posts it.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::StockQuantity => "stock_quantity",
            FieldName::StockStatus => "stock_status",
            FieldName::ManageStock => "manage_stock",
            FieldName::RegularPrice => "regular_price",
            FieldName::SalePrice => "sale_price",
            FieldName::Name => "name",
        }
    }
}

impl core::fmt::Display for FieldName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock_quantity" => Ok(FieldName::StockQuantity),
            "stock_status" => Ok(FieldName::StockStatus),
            // The table row and the variation modal post different names for
            // the same checkbox.
            "manage_stock" | "manage_stock_checkbox" => Ok(FieldName::ManageStock),
            "regular_price" => Ok(FieldName::RegularPrice),
            "sale_price" => Ok(FieldName::SalePrice),
            "name" => Ok(FieldName::Name),
            other => Err(CatalogError::unsupported_field(other)),
        }
    }
}

/// Stock availability as shown to buyers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    InStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "instock",
            StockStatus::OutOfStock => "outofstock",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instock" => Ok(StockStatus::InStock),
            "outofstock" => Ok(StockStatus::OutOfStock),
            other => Err(CatalogError::invalid_enum("stock_status", other)),
        }
    }
}

/// A typed field value, as read from or written to a product record.
///
/// `Unset` covers fields the store has no value for (a product that does not
/// track stock has no quantity); it journals as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Decimal(f64),
    Status(StockStatus),
    Flag(bool),
    Text(String),
    Unset,
}

impl core::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Decimal(v) => write!(f, "{v}"),
            FieldValue::Status(v) => write!(f, "{v}"),
            FieldValue::Flag(v) => f.write_str(if *v { "yes" } else { "no" }),
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Unset => Ok(()),
        }
    }
}
