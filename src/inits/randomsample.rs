use crate::{ClusterResult, Primitive};
use rand::prelude::*;

/// Random sample initialization (a.k.a. Forgy).
///
/// Picks `state.k` distinct rows, sampled without replacement, and copies them into
/// `state.centroids` as the initial centroid positions.
#[inline(always)]
pub(crate) fn calculate<T: Primitive, R: Rng + ?Sized>(rows: &[Vec<T>], state: &mut ClusterResult<T>, rnd: &mut R) {
    state.centroids.clear();
    rand::seq::index::sample(rnd, rows.len(), state.k).iter()
        .for_each(|ri| state.centroids.push(rows[ri].clone()));
}
