use serde::{Deserialize, Serialize};

/// A repair shop as returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specialties: Vec<String>,
}

impl Shop {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
            rating: None,
            review_count: None,
            website: None,
            specialties: Vec::new(),
        }
    }

    /// Shops without a dialable number cannot be called.
    pub fn has_phone(&self) -> bool {
        self.phone.chars().filter(char::is_ascii_digit).count() >= 7
    }

    pub fn contact(&self) -> ShopContact {
        ShopContact {
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }
}

/// Snapshot of a shop's contact details taken when a call is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopContact {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl From<&Shop> for ShopContact {
    fn from(shop: &Shop) -> Self {
        shop.contact()
    }
}
