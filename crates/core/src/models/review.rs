//! Product review records awaiting moderation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ReviewId};

/// A product review as returned by the store API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    /// The reviewed product. The API populates this into an embedded object
    /// on some endpoints and leaves it as a bare ID on others.
    #[serde(rename = "productId")]
    pub product: ReviewProduct,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_verified_purchase: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Either a populated product reference or a bare product ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReviewProduct {
    Populated {
        #[serde(rename = "_id")]
        id: ProductId,
        title: String,
    },
    Id(ProductId),
}

impl ReviewProduct {
    /// The product ID regardless of population.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        match self {
            Self::Populated { id, .. } | Self::Id(id) => id,
        }
    }

    /// The product title when the reference was populated.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Populated { title, .. } => Some(title.as_str()),
            Self::Id(_) => None,
        }
    }
}
