use serde_json::Value;

/// Extracts a population density (people/km²) from a raster `identify` reply.
///
/// Two shapes are accepted: `{"value": n}` and `{"properties": {"value": n}}`,
/// with `n` a number or numeric string. The value is rounded to a whole
/// number; anything non-positive or missing means "unavailable".
pub fn parse_population_density(body: &Value) -> Option<f64> {
    let top_level = body.get("value");
    let nested = body.get("properties").and_then(|p| p.get("value"));

    [top_level, nested]
        .into_iter()
        .flatten()
        .filter_map(crate::json::value_as_f64)
        .map(f64::round)
        .find(|v| *v > 0.0)
}
