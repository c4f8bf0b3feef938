//! Circle arithmetic on ecliptic longitudes (degrees).

/// Normalize an angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Smallest arc between two longitudes, in `[0, 180]`.
///
/// Symmetric in its arguments bit-for-bit: `|a - b|` is computed first.
pub fn separation(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Signed difference `a - b` wrapped into `(-180, 180]`.
pub fn signed_delta(a: f64, b: f64) -> f64 {
    let d = (a - b + 180.0).rem_euclid(360.0) - 180.0;
    if d <= -180.0 {
        d + 360.0
    } else {
        d
    }
}

/// Counter-clockwise span from `start` to `end`, in `[0, 360)`.
pub fn arc_span(start: f64, end: f64) -> f64 {
    normalize_degrees(end - start)
}

pub(crate) fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

pub(crate) fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

pub(crate) fn tan_deg(x: f64) -> f64 {
    x.to_radians().tan()
}

pub(crate) fn atan2_deg(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert!(normalize_degrees(-1e-17) < 360.0);
    }

    #[test]
    fn test_separation_wraps() {
        assert_eq!(separation(10.0, 190.0), 180.0);
        assert_eq!(separation(350.0, 10.0), 20.0);
        assert_eq!(separation(10.0, 350.0), 20.0);
        assert_eq!(separation(0.0, 61.0), 61.0);
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(signed_delta(10.0, 350.0), 20.0);
        assert_eq!(signed_delta(350.0, 10.0), -20.0);
        assert_eq!(signed_delta(190.0, 10.0), 180.0);
    }

    #[test]
    fn test_arc_span() {
        assert_eq!(arc_span(350.0, 20.0), 30.0);
        assert_eq!(arc_span(20.0, 350.0), 330.0);
    }
}
