use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog product as far as size queries are concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub is_featured: bool,
    pub is_archived: bool,
}

/// Which catalog-size query is being asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCountKind {
    /// Every product of the store
    Total,
    /// Products that are not archived
    Active,
    /// Featured products that are not archived
    Featured,
}

impl ProductCountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCountKind::Total => "total",
            ProductCountKind::Active => "active",
            ProductCountKind::Featured => "featured",
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductCountKind::Total => true,
            ProductCountKind::Active => !product.is_archived,
            ProductCountKind::Featured => product.is_featured && !product.is_archived,
        }
    }
}

impl fmt::Display for ProductCountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCountKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "total" => Ok(ProductCountKind::Total),
            "active" => Ok(ProductCountKind::Active),
            "featured" => Ok(ProductCountKind::Featured),
            other => Err(anyhow::anyhow!(
                "unknown product count kind '{other}' (expected total, active or featured)"
            )),
        }
    }
}
