use decal_core::Document;
use serde::{Deserialize, Serialize};

use crate::error::{TransientIoError, ValidationError};

/// Read-only product data supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductContext {
    pub product_id: String,
    pub base_image_url: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
}

/// The shopper's choices next to the canvas.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineSelection {
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
}

/// Payload handed to the cart collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    pub customization: Document,
}

/// Owner of pricing, persistence and totals.
pub trait CartCollaborator {
    fn add_line(&mut self, line: &CartLine) -> Result<(), TransientIoError>;
}

fn pick(
    choice: Option<&String>,
    offered: &[String],
    missing: ValidationError,
    unknown: fn(String) -> ValidationError,
) -> Result<String, ValidationError> {
    let value = choice.filter(|v| !v.trim().is_empty()).ok_or(missing)?;
    if !offered.is_empty() && !offered.contains(value) {
        return Err(unknown(value.clone()));
    }
    Ok(value.clone())
}

impl LineSelection {
    pub fn validate(&self, product: &ProductContext) -> Result<(String, String), ValidationError> {
        let size = pick(
            self.size.as_ref(),
            &product.sizes,
            ValidationError::MissingSize,
            ValidationError::UnknownSize,
        )?;
        let color = pick(
            self.color.as_ref(),
            &product.colors,
            ValidationError::MissingColor,
            ValidationError::UnknownColor,
        )?;
        if self.quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        Ok((size, color))
    }
}
