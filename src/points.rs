//! # Reference Point Registry
//!
//! Holds the seabed points drafts are evaluated at. Labels are chosen by the
//! caller and usually embed the elevation (see [`display_label`]), so two
//! points with the same elevation stay distinct as long as their labels do.

use crate::ReferencePoint;

/// Build the conventional label for a point, e.g. `Point A (-1.40 m LAT)`.
pub fn display_label(name: &str, elevation: f64) -> String {
    format!("{name} ({elevation:.2} m LAT)")
}

/// Ordered label → elevation mapping.
///
/// Iteration follows insertion order. Setting an existing label replaces its
/// elevation in place, so the point keeps its position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferencePointRegistry {
    points: Vec<ReferencePoint>,
}

impl ReferencePointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a point. Last write wins per label.
    pub fn set(&mut self, label: impl Into<String>, elevation: f64) {
        let label = label.into();
        match self.points.iter_mut().find(|p| p.name == label) {
            Some(point) => point.elevation = elevation,
            None => self.points.push(ReferencePoint::new(label, elevation)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&ReferencePoint> {
        self.points.iter().find(|p| p.name == label)
    }

    /// All points in insertion order.
    pub fn all(&self) -> &[ReferencePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, f64)> for ReferencePointRegistry {
    fn from_iter<I: IntoIterator<Item = (L, f64)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (label, elevation) in iter {
            registry.set(label, elevation);
        }
        registry
    }
}
