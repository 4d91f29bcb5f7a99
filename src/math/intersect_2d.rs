use super::{cross_2d, Point2, Vector2, TOLERANCE};

/// Contact between two bounded segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentContact {
    /// A single shared point, at parameter `t` on the first segment and `u`
    /// on the second. Both are clamped to `[0, 1]`.
    Point { point: Point2, t: f64, u: f64 },
    /// Collinear overlap covering `[t0, t1]` of the first segment, `t0 < t1`.
    Overlap { t0: f64, t1: f64 },
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = cross_2d(d1, d2);
    if cross.abs() <= TOLERANCE * d1.norm() * d2.norm() {
        return None;
    }
    let d = p2 - p1;
    let t = cross_2d(&d, d2) / cross;
    let u = cross_2d(&d, d1) / cross;
    Some((t, u))
}

/// Bounded segment-segment contact in 2D.
///
/// Parameters within `TOLERANCE` (measured in map units along each segment)
/// of the segment ends are accepted, so near-tangent contacts at endpoints
/// are not lost to rounding. Collinear segments report their overlap; an
/// overlap shorter than `TOLERANCE` collapses to a point contact.
///
/// Zero-length segments never produce a contact.
#[must_use]
pub fn segment_contact_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<SegmentContact> {
    let da = a1 - a0;
    let db = b1 - b0;
    let len_a = da.norm();
    let len_b = db.norm();
    if len_a < TOLERANCE || len_b < TOLERANCE {
        return None;
    }

    let Some((t, u)) = line_line_intersect_2d(a0, &da, b0, &db) else {
        // Parallel: only collinear segments can touch.
        let offset = cross_2d(&da, &(b0 - a0)).abs() / len_a;
        if offset > TOLERANCE {
            return None;
        }
        return collinear_contact(a0, &da, len_a, b0, b1);
    };

    let eps_t = TOLERANCE / len_a;
    let eps_u = TOLERANCE / len_b;
    if t < -eps_t || t > 1.0 + eps_t || u < -eps_u || u > 1.0 + eps_u {
        return None;
    }
    let t = t.clamp(0.0, 1.0);
    let u = u.clamp(0.0, 1.0);
    Some(SegmentContact::Point {
        point: point_at(a0, &da, t),
        t,
        u,
    })
}

/// Linear interpolation: `origin + dir * t`.
#[must_use]
pub fn point_at(origin: &Point2, dir: &Vector2, t: f64) -> Point2 {
    origin + dir * t
}

fn collinear_contact(
    a0: &Point2,
    da: &Vector2,
    len_a: f64,
    b0: &Point2,
    b1: &Point2,
) -> Option<SegmentContact> {
    let inv = 1.0 / (len_a * len_a);
    let tb0 = (b0 - a0).dot(da) * inv;
    let tb1 = (b1 - a0).dot(da) * inv;
    let lo = tb0.min(tb1).max(0.0);
    let hi = tb0.max(tb1).min(1.0);

    let eps_t = TOLERANCE / len_a;
    if lo > hi + eps_t {
        return None;
    }
    if hi - lo <= eps_t {
        let t = (0.5 * (lo + hi)).clamp(0.0, 1.0);
        let point = point_at(a0, da, t);
        let db = b1 - b0;
        let u = ((point - b0).dot(&db) / db.norm_squared()).clamp(0.0, 1.0);
        return Some(SegmentContact::Point { point, t, u });
    }
    Some(SegmentContact::Overlap { t0: lo, t1: hi })
}
