use walkers::Position;

use super::Severity;

/// A single collision point ready for display: its map position, the
/// severity driving icon choice, and the display attributes as an explicit
/// ordered sequence (natural key order), so popup rendering never depends
/// on incidental map iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub position: Position,
    pub severity: Severity,
    pub properties: Vec<(String, Option<String>)>,
}
