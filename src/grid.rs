//! Rectangular sampling grids over the feature plane.
//!
//! Decision surfaces are drawn by evaluating a classifier at every point of an
//! inclusive grid: `resolution` steps per axis, so `resolution + 1` coordinates
//! per axis with both bounds included. x is the outer loop, y the inner one.

use crate::{Error, Point, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned region of the feature plane.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// The `[0, 8] x [0, 8]` plane all bundled datasets live in.
    pub const DEMO: Bounds = Bounds {
        x_min: 0.0,
        x_max: 8.0,
        y_min: 0.0,
        y_max: 8.0,
    };

    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let b = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        b.validate()?;
        Ok(b)
    }

    pub fn validate(&self) -> Result<()> {
        let all_finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(Error::InvalidConfig(format!(
                "bounds must be finite, got {self:?}"
            )));
        }
        if self.x_max <= self.x_min || self.y_max <= self.y_min {
            return Err(Error::InvalidConfig(format!(
                "bounds must satisfy min < max on both axes, got {self:?}"
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        (self.x_min..=self.x_max).contains(&p[0]) && (self.y_min..=self.y_max).contains(&p[1])
    }
}

/// `steps + 1` evenly spaced values from `min` to `max`, both included.
fn axis(min: f64, max: f64, steps: usize) -> impl Iterator<Item = f64> {
    let step = (max - min) / steps as f64;
    (0..=steps).map(move |i| (min + i as f64 * step).min(max))
}

/// Every grid point over `bounds` with `resolution` steps per axis.
pub fn sample_points(bounds: Bounds, resolution: usize) -> Result<Vec<Point>> {
    bounds.validate()?;
    if resolution == 0 {
        return Err(Error::InvalidConfig("resolution must be > 0".to_owned()));
    }

    let per_axis = resolution + 1;
    let mut points = Vec::with_capacity(per_axis * per_axis);
    for x in axis(bounds.x_min, bounds.x_max, resolution) {
        for y in axis(bounds.y_min, bounds.y_max, resolution) {
            points.push([x, y]);
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_grid_has_resolution_plus_one_points_per_axis() {
        let points = sample_points(Bounds::DEMO, 50).unwrap();
        assert_eq!(points.len(), 51 * 51);
        assert!(points.iter().all(|&p| Bounds::DEMO.contains(p)));
        assert_eq!(points[0], [0.0, 0.0]);
        assert_eq!(points[1][0], 0.0);
        assert_eq!(points[points.len() - 1], [8.0, 8.0]);
    }

    #[test]
    fn x_is_the_outer_axis() {
        let points = sample_points(Bounds::new(0.0, 1.0, 0.0, 2.0).unwrap(), 2).unwrap();
        assert_eq!(
            points,
            vec![
                [0.0, 0.0],
                [0.0, 1.0],
                [0.0, 2.0],
                [0.5, 0.0],
                [0.5, 1.0],
                [0.5, 2.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [1.0, 2.0],
            ]
        );
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(sample_points(Bounds::DEMO, 0).is_err());
        assert!(Bounds::new(1.0, 1.0, 0.0, 1.0).is_err());
        assert!(Bounds::new(0.0, f64::INFINITY, 0.0, 1.0).is_err());
    }
}
