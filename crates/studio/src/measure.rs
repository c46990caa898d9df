//! Measurement tools: distance, angle and area between picked points.

use glam::DVec3;
use serde::Serialize;
use shared::TransformMode;

/// Straight-line distance between two points
pub fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    DVec3::from_array(a).distance(DVec3::from_array(b))
}

/// Angle at `vertex` between the rays to `a` and `b`, in degrees.
/// `None` when either ray has zero length.
pub fn angle_degrees(a: [f64; 3], vertex: [f64; 3], b: [f64; 3]) -> Option<f64> {
    let v = DVec3::from_array(vertex);
    let u = DVec3::from_array(a) - v;
    let w = DVec3::from_array(b) - v;
    if u.length_squared() == 0.0 || w.length_squared() == 0.0 {
        return None;
    }
    Some(u.angle_between(w).to_degrees())
}

/// Area of a planar polygon (Newell's method). Fewer than 3 points give 0.
pub fn polygon_area(points: &[[f64; 3]]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut normal = DVec3::ZERO;
    for (i, p) in points.iter().enumerate() {
        let current = DVec3::from_array(*p);
        let next = DVec3::from_array(points[(i + 1) % points.len()]);
        normal += current.cross(next);
    }
    normal.length() * 0.5
}

/// Completed measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Measurement {
    Distance { value: f64 },
    Angle { degrees: f64 },
    Area { value: f64, points: usize },
}

/// Which quantity a measure session collects points for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureKind {
    Distance,
    Angle,
    Area,
}

/// Points picked with one of the measure tools
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureSession {
    kind: MeasureKind,
    points: Vec<[f64; 3]>,
}

impl MeasureSession {
    pub fn new(kind: MeasureKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
        }
    }

    /// Session for a measure tool mode; `None` for other tools
    pub fn for_mode(mode: TransformMode) -> Option<Self> {
        let kind = match mode {
            TransformMode::MeasureDistance => MeasureKind::Distance,
            TransformMode::MeasureAngle => MeasureKind::Angle,
            TransformMode::MeasureArea => MeasureKind::Area,
            _ => return None,
        };
        Some(Self::new(kind))
    }

    pub fn kind(&self) -> MeasureKind {
        self.kind
    }

    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Add a picked point. Distance completes at 2 points, angle at 3; the
    /// session then starts over. Area only completes on [`Self::close`].
    pub fn add_point(&mut self, point: [f64; 3]) -> Option<Measurement> {
        self.points.push(point);
        let result = match (self.kind, self.points.as_slice()) {
            (MeasureKind::Distance, [a, b]) => Some(Measurement::Distance {
                value: distance(*a, *b),
            }),
            (MeasureKind::Angle, [a, vertex, b]) => Some(Measurement::Angle {
                degrees: angle_degrees(*a, *vertex, *b).unwrap_or(0.0),
            }),
            _ => None,
        };
        if result.is_some() {
            self.points.clear();
        }
        result
    }

    /// Close an area polygon. Needs at least 3 points; other kinds return `None`.
    pub fn close(&mut self) -> Option<Measurement> {
        if self.kind != MeasureKind::Area || self.points.len() < 3 {
            return None;
        }
        let points = std::mem::take(&mut self.points);
        Some(Measurement::Area {
            value: polygon_area(&points),
            points: points.len(),
        })
    }

    pub fn reset(&mut self) {
        self.points.clear();
    }
}
