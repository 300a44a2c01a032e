//! Re-validation of provider results against the true circular radius.
//!
//! Provider-side shapes only bound the requested circle: the nearby search
//! circle is capped server-side and the text search rectangle necessarily
//! covers more area than the circle it encloses. Every result therefore
//! gets a great-circle distance check before it may be ranked.

use tracing::debug;

use super::Candidate;
use crate::geo::{Coordinate, haversine_m};

/// Keep the candidates within `radius_m` meters of `center`, preserving
/// input order.
///
/// The computed distance is attached to each surviving candidate. The
/// boundary is inclusive: a candidate exactly at the radius stays. A
/// candidate without a coordinate cannot be judged and is retained as the
/// provider delivered it. Filtering an already-filtered set with the same
/// radius changes nothing.
#[must_use]
pub fn filter_by_radius(
    candidates: Vec<Candidate>,
    center: Coordinate,
    radius_m: f64,
) -> Vec<Candidate> {
    let before = candidates.len();
    let kept: Vec<Candidate> = candidates
        .into_iter()
        .filter_map(|mut candidate| match candidate.location {
            Some(location) => {
                let distance = haversine_m(center, location);
                if distance <= radius_m {
                    candidate.distance_m = Some(distance);
                    Some(candidate)
                } else {
                    None
                }
            }
            None => Some(candidate),
        })
        .collect();
    debug!(before, after = kept.len(), radius_m, "radius filter applied");
    kept
}
