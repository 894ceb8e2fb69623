use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::ids::CanvasNodeId;
use crate::model::node::Position;

/// Colours a freshly placed dot is drawn from.
pub const DOT_PALETTE: [&str; 3] = ["#000000", "#0000FF", "#FF0000"];

/// Diameter of a dot node, in canvas pixels.
pub const DOT_SIZE: u32 = 20;

/// Colour used for text nodes, which have no fill.
pub const TEXT_COLOR: &str = "transparent";

/// Background colour of a fresh canvas.
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// Predefined background choices offered by the background picker.
pub const BACKGROUND_CHOICES: [&str; 8] = [
    "#1a1a1a", "#ffffff", "#f0f4f8", "#121638", "#2d3748", "#553c9a", "#2c7a7b", "#744210",
];

/// A node on the free-form canvas: either a coloured dot or a text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: CanvasNodeId,

    #[serde(flatten)]
    pub position: Position,

    pub color: String,
    pub size: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CanvasNode {
    /// A dot with a colour picked at random from [`DOT_PALETTE`].
    pub fn dot<R: Rng + ?Sized>(position: Position, rng: &mut R) -> Self {
        let color = DOT_PALETTE.choose(rng).copied().unwrap_or(DOT_PALETTE[0]);
        Self {
            id: CanvasNodeId::new(),
            position,
            color: color.to_string(),
            size: DOT_SIZE,
            text: None,
        }
    }

    /// A text label. Blank text yields no node.
    #[must_use]
    pub fn label(text: &str, position: Position) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id: CanvasNodeId::new(),
            position,
            color: TEXT_COLOR.to_string(),
            size: 0,
            text: Some(text.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_dot_uses_palette_colour() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let node = CanvasNode::dot(Position::new(5.0, 5.0), &mut rng);
            assert!(DOT_PALETTE.contains(&node.color.as_str()));
            assert_eq!(node.size, DOT_SIZE);
            assert!(node.text.is_none());
        }
    }

    #[test]
    fn test_label_trims_text() {
        let node = CanvasNode::label("  hello  ", Position::new(1.0, 2.0)).unwrap();
        assert_eq!(node.text.as_deref(), Some("hello"));
        assert_eq!(node.color, TEXT_COLOR);
        assert_eq!(node.size, 0);
    }

    #[test]
    fn test_blank_label_is_rejected() {
        assert!(CanvasNode::label("   ", Position::default()).is_none());
        assert!(CanvasNode::label("", Position::default()).is_none());
    }
}
