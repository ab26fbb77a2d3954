use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in render space (x = width, y = up, z = depth).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    /// Box spanning `center ± size/2`.
    pub fn from_center_size(center: DVec3, size: DVec3) -> Self {
        let half = size * 0.5;
        BoundingBox {
            min: center - half,
            max: center + half,
        }
    }

    /// Centre point of the box.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Half-extents along each axis.
    pub fn half_extents(&self) -> DVec3 {
        self.size() * 0.5
    }

    /// Whether a point lies inside (or on the boundary of) the box.
    pub fn contains_point(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Whether `other` lies entirely inside (or on the boundary of) the box.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Return the smallest box that contains both `self` and `other`.
    pub fn merge(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Union of all boxes, or `None` for an empty iterator.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Option<BoundingBox> {
        boxes
            .into_iter()
            .fold(None, |acc: Option<BoundingBox>, b| match acc {
                Some(a) => Some(a.merge(b)),
                None => Some(*b),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BoundingBox {
        BoundingBox {
            min: DVec3::ZERO,
            max: DVec3::ONE,
        }
    }

    #[test]
    fn bounding_box_center_and_size() {
        let bb = unit_box();
        assert_eq!(bb.center(), DVec3::splat(0.5));
        assert_eq!(bb.size(), DVec3::ONE);
        assert_eq!(bb.half_extents(), DVec3::splat(0.5));
    }

    #[test]
    fn from_center_size_round_trips() {
        let bb = BoundingBox::from_center_size(DVec3::new(10.0, 2.0, -4.0), DVec3::new(4.0, 2.0, 8.0));
        assert_eq!(bb.min, DVec3::new(8.0, 1.0, -8.0));
        assert_eq!(bb.max, DVec3::new(12.0, 3.0, 0.0));
        assert_eq!(bb.center(), DVec3::new(10.0, 2.0, -4.0));
    }

    #[test]
    fn bounding_box_contains_point() {
        let bb = unit_box();
        assert!(bb.contains_point(DVec3::splat(0.5)));
        assert!(bb.contains_point(DVec3::ZERO)); // boundary
        assert!(bb.contains_point(DVec3::ONE)); // boundary
        assert!(!bb.contains_point(DVec3::new(1.1, 0.5, 0.5)));
        assert!(!bb.contains_point(DVec3::new(-0.1, 0.5, 0.5)));
    }

    #[test]
    fn bounding_box_merge() {
        let a = unit_box();
        let b = BoundingBox {
            min: DVec3::splat(-1.0),
            max: DVec3::splat(0.5),
        };
        let merged = a.merge(&b);
        assert_eq!(merged.min, DVec3::splat(-1.0));
        assert_eq!(merged.max, DVec3::ONE);
        assert!(merged.contains_box(&a));
        assert!(merged.contains_box(&b));
    }

    #[test]
    fn union_all_empty_is_none() {
        let boxes: Vec<BoundingBox> = vec![];
        assert!(BoundingBox::union_all(&boxes).is_none());
    }
}
