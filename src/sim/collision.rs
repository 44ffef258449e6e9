//! Circular bodies and overlap testing
//!
//! Every hit in the game (moon grazing an asteroid, the reticle over an
//! asteroid) reduces to one predicate: two circles overlap when the distance
//! between their centers is no more than the sum of their radii.

use glam::IVec2;

use crate::assets::Sprite;

/// A positioned, circular thing on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Sprite this body is drawn with
    pub sprite: Sprite,
    /// Center in screen pixels
    pub center: IVec2,
    /// Collision radius, fixed at creation from the sprite size
    radius: f32,
}

impl Body {
    pub fn new(sprite: Sprite, radius: f32) -> Self {
        Self {
            sprite,
            center: IVec2::ZERO,
            radius,
        }
    }

    pub fn at(sprite: Sprite, radius: f32, center: IVec2) -> Self {
        Self {
            sprite,
            center,
            radius,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Euclidean distance between two centers
    #[inline]
    pub fn distance_to(&self, other: &Body) -> f32 {
        center_distance(self.center, other.center)
    }

    /// Whether the two circles touch or intersect
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.distance_to(other) <= self.radius + other.radius
    }
}

/// Euclidean distance between two integer points
#[inline]
pub fn center_distance(a: IVec2, b: IVec2) -> f32 {
    a.as_vec2().distance(b.as_vec2())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_touching_circles_overlap() {
        let a = Body::at(Sprite::Asteroid, 20.0, IVec2::new(0, 0));
        let b = Body::at(Sprite::Crosshair, 24.0, IVec2::new(44, 0));
        assert!(a.overlaps(&b));

        let c = Body::at(Sprite::Crosshair, 24.0, IVec2::new(45, 0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_diagonal_distance() {
        let a = Body::at(Sprite::Moon, 1.0, IVec2::new(0, 0));
        let b = Body::at(Sprite::Moon, 1.0, IVec2::new(3, 4));
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-6);
        assert!(!a.overlaps(&b));
        let big = Body::at(Sprite::Moon, 4.0, IVec2::new(3, 4));
        assert!(a.overlaps(&big));
    }

    #[test]
    fn test_concentric_always_overlap() {
        let a = Body::at(Sprite::Earth, 0.0, IVec2::new(640, 480));
        let b = Body::at(Sprite::Asteroid, 0.0, IVec2::new(640, 480));
        assert!(a.overlaps(&b));
    }

    proptest! {
        #[test]
        fn prop_overlap_matches_definition(
            ax in -2000i32..2000, ay in -2000i32..2000,
            bx in -2000i32..2000, by in -2000i32..2000,
            ra in 0.0f32..200.0, rb in 0.0f32..200.0,
        ) {
            let a = Body::at(Sprite::Asteroid, ra, IVec2::new(ax, ay));
            let b = Body::at(Sprite::Crosshair, rb, IVec2::new(bx, by));
            let dx = (ax - bx) as f32;
            let dy = (ay - by) as f32;
            let expected = (dx * dx + dy * dy).sqrt() <= ra + rb;
            prop_assert_eq!(a.overlaps(&b), expected);
        }

        #[test]
        fn prop_overlap_is_symmetric(
            ax in -2000i32..2000, ay in -2000i32..2000,
            bx in -2000i32..2000, by in -2000i32..2000,
            ra in 0.0f32..200.0, rb in 0.0f32..200.0,
        ) {
            let a = Body::at(Sprite::Moon, ra, IVec2::new(ax, ay));
            let b = Body::at(Sprite::Asteroid, rb, IVec2::new(bx, by));
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
