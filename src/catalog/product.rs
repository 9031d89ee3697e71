use serde::{Deserialize, Serialize};

/// A catalog product as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "de::price")]
    pub price: f64,
    /// The API sends this as a number or a numeric string.
    #[serde(default, deserialize_with = "de::release_year")]
    pub release_year: Option<i32>,
    #[serde(default, rename = "cover_image")]
    pub cover_image_url: Option<String>,
}

/// Pagination metadata reported by the server. Any field may be missing,
/// and the whole block is usually absent on error bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub from: Option<u32>,
    #[serde(default)]
    pub to: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// One page of the `/products` listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub data: Vec<Product>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

mod de {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Int(i64),
        Float(f64),
        Text(String),
    }

    pub fn price<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Int(v) => Ok(v as f64),
            NumberOrText::Float(v) => Ok(v),
            NumberOrText::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("invalid price '{}'", s))),
        }
    }

    /// Unparseable years become `None` rather than failing the whole page.
    pub fn release_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let year = match Option::<NumberOrText>::deserialize(deserializer)? {
            None => None,
            Some(NumberOrText::Int(v)) => i32::try_from(v).ok(),
            Some(NumberOrText::Float(v)) if v.fract() == 0.0 => Some(v as i32),
            Some(NumberOrText::Float(_)) => None,
            Some(NumberOrText::Text(s)) => s.trim().parse::<i32>().ok(),
        };
        Ok(year)
    }
}
