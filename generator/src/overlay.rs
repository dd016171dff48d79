//! Decoding of the overlay tree into the typed overlay schema.

use resources::models::overlay::Overlay;

use crate::error::{Error, Result};

/// Turns an already-decoded overlay document into a typed [`Overlay`].
///
/// Unknown keys, wrongly typed values and unparsable quantities are all
/// reported as configuration errors. A null tree is an empty overlay.
pub fn parse_overlay(tree: serde_json::Value) -> Result<Overlay> {
    if tree.is_null() {
        return Ok(Overlay::default());
    }
    serde_json::from_value(tree).map_err(|e| Error::Configuration(e.to_string()))
}
