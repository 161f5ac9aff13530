//! Products and the add-product form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::{Price, PriceError};

/// A product as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub stock: u32,
    /// Image URL.
    pub image: String,
}

/// Payload for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub stock: u32,
    pub image: String,
}

/// A field of the add-product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Price,
    Stock,
    Image,
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Price => write!(f, "price"),
            Self::Stock => write!(f, "stock"),
            Self::Image => write!(f, "image"),
        }
    }
}

impl std::str::FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "stock" => Ok(Self::Stock),
            "image" => Ok(Self::Image),
            _ => Err(format!("unknown form field: {s}")),
        }
    }
}

/// Validation failures for the add-product form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field was left blank.
    #[error("{0} is required")]
    Required(FormField),

    /// The price field did not parse.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// The stock field was not a non-negative whole number.
    #[error("stock must be a whole number of at least 0 (got {0:?})")]
    InvalidStock(String),
}

/// Raw add-product form input, exactly as typed.
///
/// Every field is a string so that a rejected submission can be shown back to
/// the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub image: String,
}

impl ProductForm {
    /// Set one field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Price => self.price = value,
            FormField::Stock => self.stock = value,
            FormField::Image => self.image = value,
        }
    }

    /// Whether every field is blank (the state after a reset).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.price.is_empty()
            && self.stock.is_empty()
            && self.image.is_empty()
    }

    /// Validate the input and build the create payload.
    ///
    /// # Errors
    ///
    /// Returns the first failing field in form order.
    pub fn validate(&self) -> Result<NewProduct, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::Required(FormField::Name));
        }

        if self.price.trim().is_empty() {
            return Err(FormError::Required(FormField::Price));
        }
        let price: Price = self.price.parse()?;

        let stock_input = self.stock.trim();
        if stock_input.is_empty() {
            return Err(FormError::Required(FormField::Stock));
        }
        let stock = stock_input
            .parse::<u32>()
            .map_err(|_| FormError::InvalidStock(stock_input.to_owned()))?;

        let image = self.image.trim();
        if image.is_empty() {
            return Err(FormError::Required(FormField::Image));
        }

        Ok(NewProduct {
            name: name.to_owned(),
            price,
            stock,
            image: image.to_owned(),
        })
    }
}
