use serde::{Deserialize, Serialize};

/// Where a stone sits: captured on the bar, borne off into home, or on a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Position {
    #[display("bar")]
    Bar,
    #[display("home")]
    Home,
    #[display("point {_0}")]
    Point(u8),
}

impl Position {
    pub fn point(&self) -> Option<u8> {
        match self {
            Position::Point(index) => Some(*index),
            _ => None,
        }
    }
}
