use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The closed set of sellable kinds that can sit in a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Dish,
    Class,
    Service,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Dish => "dish",
            ItemType::Class => "class",
            ItemType::Service => "service",
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a sellable item taken when it is added to the cart.
///
/// The price is copied so that later catalog changes do not alter an
/// existing cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellableItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl SellableItem {
    /// Creates a new item snapshot without a photo.
    ///
    /// # Arguments
    /// * `id` - Catalog identifier
    /// * `name` - Display name
    /// * `price` - Unit price at the time of adding
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            photo: None,
        }
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }
}

/// Identity of a cart line: one line per `(item id, item type)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey {
    pub item_id: String,
    pub item_type: ItemType,
}

impl LineKey {
    pub fn new(item_id: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            item_id: item_id.into(),
            item_type,
        }
    }
}

impl Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.item_type, self.item_id)
    }
}

/// One row of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: SellableItem,
    pub item_type: ItemType,
    pub quantity: u32,
}

impl CartLine {
    pub fn key(&self) -> LineKey {
        LineKey::new(self.item.id.clone(), self.item_type)
    }

    pub fn matches(&self, key: &LineKey) -> bool {
        self.item_type == key.item_type && self.item.id == key.item_id
    }

    pub fn line_total(&self) -> f64 {
        self.item.price * f64::from(self.quantity)
    }
}
