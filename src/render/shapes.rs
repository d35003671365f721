use nalgebra::{Isometry3, Point3};

use super::{Primitive, Topology};
use crate::math::geometry::{circle_loop, circle_path};

/// Number of segments used to approximate every circle in the scene.
pub const TESSELLATION: usize = 100;

/// Orbit paths are always drawn in gray, whatever the body looks like.
pub const ORBIT_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// How far outside the body surface each ring of a ring system sits.
pub const RING_OFFSETS: [f32; 2] = [0.1, 0.3];

/// The circle a body travels along, centered on its parent.
///
/// `parent` is the parent's world transform; only its position matters, since
/// every orbit lies in the shared orbital plane.
pub fn orbit_path(parent: Isometry3<f32>, distance: f32) -> Primitive {
    let t = parent.translation.vector;
    let center = Isometry3::translation(t.x, t.y, t.z);
    Primitive::new(
        Topology::LineLoop,
        Point3::from(ORBIT_COLOR),
        circle_loop(center, distance, TESSELLATION),
    )
}

/// A filled disc, as a fan around its center.
pub fn disc(center: Point3<f32>, radius: f32, color: Point3<f32>) -> Primitive {
    let frame = Isometry3::translation(center.x, center.y, center.z);
    let hub = std::iter::once(center);
    let rim = circle_path(frame, radius, TESSELLATION);
    Primitive::new(Topology::TriangleFan, color, hub.chain(rim))
}

/// The two loops of a ring system around a body of the given radius.
pub fn ring_loops(center: Point3<f32>, radius: f32, color: Point3<f32>) -> [Primitive; 2] {
    let frame = Isometry3::translation(center.x, center.y, center.z);
    RING_OFFSETS.map(|offset| {
        Primitive::new(
            Topology::LineLoop,
            color,
            circle_loop(frame, radius + offset, TESSELLATION),
        )
    })
}
