use serde::de::DeserializeOwned;

use crate::error::{CatalogError, CatalogResult};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> CatalogResult<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        CatalogError::Parse(format!("at JSON path {path} → {}", err.into_inner()))
    })
}

/// Same as [`from_str_with_path`], starting from an already parsed value.
pub fn from_value_with_path<T: DeserializeOwned>(value: serde_json::Value) -> CatalogResult<T> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| {
        let path = err.path().to_string();
        CatalogError::Parse(format!("at JSON path {path} → {}", err.into_inner()))
    })
}
