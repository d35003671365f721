use nalgebra::{Isometry3, Point3, Vector3};

/// Degrees in one full revolution.
pub const FULL_REVOLUTION: f64 = 360.0;

/// Brings an angle (in degrees) back into [0, 360).
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_REVOLUTION);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= FULL_REVOLUTION {
        0.0
    } else {
        wrapped
    }
}

/// Returns the transform for a point on a circular orbit: rotate by `angle`
/// degrees around the orbital plane normal (+z), then push out by `distance`
/// along +x.
pub fn polar_transform(angle: f64, distance: f64) -> Isometry3<f64> {
    let rotation = Isometry3::rotation(Vector3::z() * angle.to_radians());
    rotation * Isometry3::translation(distance, 0.0, 0.0)
}

/// Evaluates `f` at `segments + 1` evenly spaced parameters running from
/// `start` to `end`. Both ends are hit exactly.
pub fn sample_parametric<F, S>(
    f: F,
    start: S,
    end: S,
    segments: usize,
) -> impl Iterator<Item = Point3<f32>>
where
    F: Fn(S) -> Point3<f32>,
    S: nalgebra::RealField + simba::scalar::SupersetOf<usize> + Copy,
{
    let segments = segments.max(1);
    let n: S = nalgebra::convert(segments);
    (0..=segments).map(move |i| {
        if i == segments {
            f(end)
        } else {
            let i: S = nalgebra::convert(i);
            f(start + (end - start) * i / n)
        }
    })
}

/// Points on a circle of the given radius, lying in the xy-plane of `frame`
/// and centered on its origin. The first point is repeated at the end, so
/// this yields `num_segments + 1` points.
pub fn circle_path(
    frame: Isometry3<f32>,
    radius: f32,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>> {
    let f = move |theta: f32| frame * Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0);
    sample_parametric(f, 0.0, std::f32::consts::TAU, num_segments)
}

/// Like [circle_path], but without the repeated closing point.
pub fn circle_loop(
    frame: Isometry3<f32>,
    radius: f32,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>> {
    circle_path(frame, radius, num_segments).take(num_segments)
}
