//! Query configuration — the externally tunable shape of a listing.

use serde::{Deserialize, Serialize};
use tag::TagType;

use crate::query::Window;

/// Sort tag, window, and the brief/full and base-name switches.
///
/// Every field is optional when deserialising:
///
/// ```
/// # use library::QueryShape;
/// let shape: QueryShape = serde_json::from_str(r#"{"sort":"Track","full":true}"#).unwrap();
/// assert!(shape.full);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryShape {
    /// Sort songs by this tag; `None` streams in database order.
    pub sort: Option<TagType>,
    /// Positions of the result to report.
    pub window: Window,
    /// Print only the last URI component.
    pub base: bool,
    /// Print every field instead of just the URI.
    pub full: bool,
}
