use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use sha2::Sha256;

use crate::MwsApiError;

/// MWS documents render a repeated element as a bare object when there is exactly one of it, and as a list
/// otherwise. `OneOrMany` accepts both shapes so that callers only ever see a `Vec`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.into()
    }
}

/// Treats `null` and empty strings (what an empty element turns into) as the type's default value.
pub fn empty_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(T::default()),
        Value::String(s) if s.trim().is_empty() => Ok(T::default()),
        _ => serde_json::from_value(value).map_err(serde::de::Error::custom),
    }
}

/// Quantities arrive either as JSON numbers or as numeric strings.
pub fn quantity_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where D: Deserializer<'de> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quantity {
        Number(u32),
        Text(String),
    }
    match Quantity::deserialize(deserializer)? {
        Quantity::Number(n) => Ok(n),
        Quantity::Text(s) => {
            s.trim().parse::<u32>().map_err(|e| serde::de::Error::custom(format!("Invalid quantity '{s}'. {e}")))
        },
    }
}

/// Builds the canonical query string for signing: parameters sorted by name (byte order), names and values
/// percent-encoded per RFC 3986.
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<String>>()
        .join("&")
}

/// Calculates an MWS Signature Version 2 signature (HMAC-SHA256, base64 encoded).
pub fn sign_request(
    method: &str,
    host: &str,
    path: &str,
    canonical_query: &str,
    secret_key: &str,
) -> Result<String, MwsApiError> {
    let string_to_sign = format!("{method}\n{}\n{path}\n{canonical_query}", host.to_lowercase());
    let mut mac = Hmac::<Sha256>::new_from_slice(secret_key.as_bytes())
        .map_err(|e| MwsApiError::SigningError(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());
    Ok(base64::encode(mac.finalize().into_bytes()))
}
