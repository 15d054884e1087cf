//! Lenient numeric extraction for upstream payloads that mix JSON numbers and
//! numeric strings (ArcGIS pixel values, NeoWs orbital data).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a finite `f64` from a JSON number or a numeric string.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// `deserialize_with` adapter for optional lenient numbers.
pub fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

/// `deserialize_with` adapter that reads JSON `null` as the type's default.
pub fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
