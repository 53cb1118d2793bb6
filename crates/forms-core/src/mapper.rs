//! Projection of logical columns onto template field ids.

use crate::schemes::FieldScheme;

/// Resolve each logical column through the scheme. Columns the
/// template has no slot for are dropped with a debug note; the filler
/// downstream likewise ignores ids the template does not carry, so a
/// scheme revision can never make a request fail.
pub fn map_fields(scheme: &FieldScheme, logical: &[(&'static str, String)]) -> Vec<(String, String)> {
    let mut out = Vec::with_capacity(logical.len());
    for (key, value) in logical {
        match scheme.field_id(key) {
            Some(id) => out.push((id.to_string(), value.clone())),
            None => {
                tracing::debug!(scheme = scheme.name, column = key, "no slot for column");
            }
        }
    }
    out
}
