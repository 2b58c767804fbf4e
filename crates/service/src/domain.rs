use models::product::NewProduct;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Create input. Required fields stay `Option` so that a missing key surfaces
/// as a validation error at the operation boundary instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProductInput {
    pub title: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub link: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub gama_de_produse: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
}

impl CreateProductInput {
    /// Presence-check the required fields and produce an insertable field set.
    pub fn into_new_product(self) -> Result<NewProduct, ServiceError> {
        let title = self
            .title
            .ok_or_else(|| ServiceError::Validation("missing required field: title".into()))?;
        let name = self
            .name
            .ok_or_else(|| ServiceError::Validation("missing required field: name".into()))?;
        let price = self
            .price
            .ok_or_else(|| ServiceError::Validation("missing required field: price".into()))?;
        let link = self
            .link
            .ok_or_else(|| ServiceError::Validation("missing required field: link".into()))?;
        Ok(NewProduct {
            title,
            name,
            price,
            link,
            year: self.year,
            gama_de_produse: self.gama_de_produse,
            volume: self.volume,
        })
    }
}

/// Sparse update input: absent keys leave the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductInput {
    pub title: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub link: Option<String>,
    pub year: Option<String>,
    pub gama_de_produse: Option<String>,
    pub volume: Option<String>,
}

impl UpdateProductInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.name.is_none()
            && self.price.is_none()
            && self.link.is_none()
            && self.year.is_none()
            && self.gama_de_produse.is_none()
            && self.volume.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_input_requires_all_four_fields() {
        let input = CreateProductInput {
            title: Some("Velvet Teddy".into()),
            name: Some("MAC".into()),
            price: Some(21.5),
            link: None,
            ..Default::default()
        };
        let err = input.into_new_product().unwrap_err();
        assert!(matches!(err, ServiceError::Validation(msg) if msg.contains("link")));
    }

    #[test]
    fn create_input_passes_optionals_through() {
        let input = CreateProductInput {
            title: Some("Velvet Teddy".into()),
            name: Some("MAC".into()),
            price: Some(21.5),
            link: Some("https://example.com/velvet".into()),
            year: Some("2022".into()),
            ..Default::default()
        };
        let new = input.into_new_product().expect("valid input");
        assert_eq!(new.year.as_deref(), Some("2022"));
        assert!(new.volume.is_none());
    }

    #[test]
    fn update_input_empty_detection() {
        assert!(UpdateProductInput::default().is_empty());
        let sparse = UpdateProductInput { price: Some(9.99), ..Default::default() };
        assert!(!sparse.is_empty());
    }
}
