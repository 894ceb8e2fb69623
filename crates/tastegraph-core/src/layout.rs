//! Canvas geometry: node placement, connection segments, and edge styling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{FeatureType, Position, SongEdge};

/// Visible drawing area that new song nodes are placed into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Horizontal band new nodes may land in: the middle 80% of the width.
    #[must_use]
    pub fn x_band(&self) -> (f64, f64) {
        (self.width * 0.1, self.width * 0.9)
    }

    /// Vertical band new nodes may land in: the middle 70% of the height.
    #[must_use]
    pub fn y_band(&self) -> (f64, f64) {
        (self.height * 0.15, self.height * 0.85)
    }

    /// A uniformly random position inside the placement bands.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let (x_min, x_max) = self.x_band();
        let (y_min, y_max) = self.y_band();
        Position::new(
            x_min + rng.gen::<f64>() * (x_max - x_min),
            y_min + rng.gen::<f64>() * (y_max - y_min),
        )
    }
}

/// A straight connection drawn from `origin`, rotated by `angle_deg`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub origin: Position,
    pub length: f64,
    pub angle_deg: f64,
}

impl Segment {
    #[must_use]
    pub fn between(source: Position, target: Position) -> Self {
        let dx = target.x - source.x;
        let dy = target.y - source.y;
        Self {
            origin: source,
            length: dx.hypot(dy),
            angle_deg: dy.atan2(dx).to_degrees(),
        }
    }

    /// Far end of the segment.
    #[must_use]
    pub fn end(&self) -> Position {
        let radians = self.angle_deg.to_radians();
        Position::new(
            self.origin.x + self.length * radians.cos(),
            self.origin.y + self.length * radians.sin(),
        )
    }
}

/// How an edge is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub color: &'static str,
    /// Line thickness in pixels.
    pub thickness: f64,
    pub dashed: bool,
    pub opacity: f64,
}

impl EdgeStyle {
    const fn solid(color: &'static str, thickness: f64) -> Self {
        Self {
            color,
            thickness,
            dashed: false,
            opacity: 1.0,
        }
    }

    /// Style for an edge, derived from its feature type and weight.
    #[must_use]
    pub fn for_edge(edge: &SongEdge) -> Self {
        let weight = edge.similarity_score;
        match edge.feature_type {
            FeatureType::Danceability => Self {
                dashed: true,
                ..Self::solid("#FF1493", 2.0)
            },
            FeatureType::Energy => Self::solid("#FF4500", (weight * 4.0).max(1.0)),
            FeatureType::Valence => {
                let color = if weight > 0.5 { "#FFD700" } else { "#1E90FF" };
                Self::solid(color, 1.0)
            }
            FeatureType::Tempo => Self {
                dashed: true,
                ..Self::solid("#32CD32", 1.0)
            },
            FeatureType::Acousticness => Self::solid("#8A2BE2", 1.0),
            FeatureType::Overall => Self {
                opacity: weight.max(0.1),
                ..Self::solid("#000000", 1.0)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_random_position_stays_in_bands() {
        let viewport = Viewport::new(1000.0, 600.0);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let p = viewport.random_position(&mut rng);
            assert!((100.0..=900.0).contains(&p.x), "x out of band: {}", p.x);
            assert!((90.0..=510.0).contains(&p.y), "y out of band: {}", p.y);
        }
    }

    #[test]
    fn test_segment_horizontal() {
        let s = Segment::between(Position::new(0.0, 0.0), Position::new(10.0, 0.0));
        assert!((s.length - 10.0).abs() < EPS);
        assert!(s.angle_deg.abs() < EPS);
    }

    #[test]
    fn test_segment_diagonal_downwards() {
        let s = Segment::between(Position::new(1.0, 1.0), Position::new(4.0, 5.0));
        assert!((s.length - 5.0).abs() < EPS);
        assert!((s.angle_deg - 53.130_102_354_155_98).abs() < 1e-6);
        let end = s.end();
        assert!((end.x - 4.0).abs() < 1e-9);
        assert!((end.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_pointing_left() {
        let s = Segment::between(Position::new(0.0, 0.0), Position::new(-3.0, 0.0));
        assert!((s.angle_deg - 180.0).abs() < EPS);
    }

    #[test]
    fn test_styles() {
        let edge = |feature, weight| SongEdge::new(&"a".into(), &"b".into(), feature, weight);

        let dance = EdgeStyle::for_edge(&edge(FeatureType::Danceability, 0.9));
        assert_eq!(dance.color, "#FF1493");
        assert!(dance.dashed);

        assert!((EdgeStyle::for_edge(&edge(FeatureType::Energy, 0.9)).thickness - 3.6).abs() < EPS);
        assert!((EdgeStyle::for_edge(&edge(FeatureType::Energy, 0.1)).thickness - 1.0).abs() < EPS);

        assert_eq!(EdgeStyle::for_edge(&edge(FeatureType::Valence, 0.8)).color, "#FFD700");
        assert_eq!(EdgeStyle::for_edge(&edge(FeatureType::Valence, 0.5)).color, "#1E90FF");

        let overall = EdgeStyle::for_edge(&edge(FeatureType::Overall, 0.02));
        assert_eq!(overall.color, "#000000");
        assert!((overall.opacity - 0.1).abs() < EPS);
    }
}
