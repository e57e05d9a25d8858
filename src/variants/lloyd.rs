use crate::{AbortStrategy, ClusterEngine, ClusterResult, IterationDoneCallbackFn, Primitive};
use rayon::prelude::*;
use rand::Rng;
use tracing::trace;

/// One attempt of the classic (Lloyd) k-means algorithm with a pluggable distance function.
pub(crate) struct Lloyd<T: Primitive> {
	_p: std::marker::PhantomData<T>
}
impl<T: Primitive> Lloyd<T> {
    /// Assign every row to its nearest centroid.
    /// ## Returns
    /// Amount of rows whose assignment changed
    fn update_cluster_assignments(engine: &ClusterEngine<T>, rows: &[Vec<T>], state: &mut ClusterResult<T>) -> usize {
        let (centroids, assignments, centroid_distances) = (&state.centroids, &mut state.assignments, &mut state.centroid_distances);
        rows.par_iter()
            .zip(assignments.par_iter_mut())
            .zip(centroid_distances.par_iter_mut())
            .map(|((row, assignment), centroid_dist)| {
                let (best_idx, best_dist) = engine.nearest(row, centroids);
                let changed = *assignment != best_idx;
                *assignment = best_idx;
                *centroid_dist = best_dist;
                changed as usize
            })
            .sum()
    }

    /// Recount the rows of each cluster.
    /// ## Returns
    /// Amount of clusters with at least one row
    fn update_cluster_frequencies(assignments: &[usize], centroid_frequency: &mut [usize]) -> usize {
        centroid_frequency.iter_mut().for_each(|v| *v = 0);
        let mut used_centroids_cnt = 0;
        assignments.iter().cloned()
            .for_each(|centroid_id| {
                if centroid_frequency[centroid_id] == 0 {
                    used_centroids_cnt += 1; // Count the amount of centroids with more than 0 rows
                }
                centroid_frequency[centroid_id] += 1;
            });
        used_centroids_cnt
    }

    /// Move every centroid to the mean of its rows. Centroids without rows keep their position.
    fn update_centroids(rows: &[Vec<T>], state: &mut ClusterResult<T>) {
        let used_centroids_cnt = Self::update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);
        if used_centroids_cnt != state.k {
            trace!(empty = state.k - used_centroids_cnt, "empty clusters keep their previous centroid");
        }

        // Sum all rows in a cluster together into new_centroids
        let sample_dims = rows[0].len();
        let mut new_centroids = vec![vec![T::zero(); sample_dims]; state.k];
        rows.iter()
            .zip(state.assignments.iter().cloned())
            .for_each(|(row, centroid_id)| {
                new_centroids[centroid_id].iter_mut().zip(row.iter()).for_each(|(c, s)| *c += s);
            });

        state.centroids.iter_mut()
            .zip(new_centroids)
            .zip(state.centroid_frequency.iter().cloned())
            .filter(|(_, cfreq)| *cfreq != 0)
            .for_each(|((c, nc), cfreq)| {
                let cfreq = T::from(cfreq).unwrap();
                c.iter_mut().zip(nc).for_each(|(c, nc)| *c = nc / cfreq);
            });
    }

    /// Run a single attempt.
    ///
    /// ## Arguments
    /// - **engine**: Provides the distance function
    /// - **rows**: Validated, non-empty feature rows
    /// - **k**: Amount of clusters (`1 <= k <= rows.len()`)
    /// - **max_iter**: Cap of refinement iterations
    /// - **attempt**: Index of this attempt, reported in the result and to the callback
    /// - **rnd**: Random generator owned by this attempt
    /// - **init**: Initialization-Method that fills the **k** initial centroids
    /// - **abort_strategy**: Decides after each iteration, whether to continue
    /// - **iteration_done**: Status callback
    #[allow(clippy::too_many_arguments)]
    pub fn calculate<R, F>(engine: &ClusterEngine<T>, rows: &[Vec<T>], k: usize, max_iter: usize, attempt: usize, rnd: &mut R,
                init: F, abort_strategy: AbortStrategy<T>, iteration_done: IterationDoneCallbackFn<'_, T>) -> ClusterResult<T>
                where R: Rng, F: FnOnce(&[Vec<T>], &mut ClusterResult<T>, &mut R) {
        let mut state = ClusterResult::new(rows.len(), k, attempt);

        // Initialize clusters and assign every row to its initial centroid
        init(rows, &mut state, rnd);
        Self::update_cluster_assignments(engine, rows, &mut state);
        let mut abort_strategy = abort_strategy.create_logic();

        for i in 1..=max_iter {
            Self::update_centroids(rows, &mut state);
            let reassigned = Self::update_cluster_assignments(engine, rows, &mut state);
            let distsum: T = state.centroid_distances.iter().cloned().sum();
            state.iterations = i;

            trace!(attempt, iteration = i, reassigned, distsum = %distsum, "iteration finished");
            iteration_done(attempt, i, reassigned, distsum);
            if !abort_strategy.next(reassigned, distsum) {
                break;
            }
        }

        // The last step was an assignment step, so assignments and distances match the final centroids
        Self::update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);
        let distsum: T = state.centroid_distances.iter().cloned().sum();
        state.average_distance = distsum / T::from(rows.len()).unwrap();
        state
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EuclideanDistance, SquaredEuclideanDistance};
    use rand::{rngs::StdRng, SeedableRng};

    fn precomputed(centroids: Vec<Vec<f64>>) -> impl FnOnce(&[Vec<f64>], &mut ClusterResult<f64>, &mut StdRng) {
        move |_, state, _| state.centroids = centroids
    }

    #[test]
    fn empty_cluster_keeps_stale_centroid() {
        let rows = vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![3.0, 0.0]];
        let engine = ClusterEngine::<f64>::with_distance(SquaredEuclideanDistance);
        let mut rnd = StdRng::seed_from_u64(1);

        let res = Lloyd::calculate(&engine, &rows, 2, 30, 0, &mut rnd,
            precomputed(vec![vec![2.0, 0.0], vec![1337.0, 0.0]]), AbortStrategy::NoReassignment, &|_, _, _, _| {});
        assert_eq!(res.assignments, vec![0, 0, 0]);
        assert_eq!(res.centroids, vec![vec![2.0, 0.0], vec![1337.0, 0.0]]);
        assert_eq!(res.centroid_frequency, vec![3, 0]);
        assert_eq!(res.centroid_distances, vec![1.0, 0.0, 1.0]);
        assert_approx_eq!(res.average_distance, 2.0 / 3.0, 1e-12);
        assert_eq!(res.iterations, 1);
    }

    #[test]
    fn converges_from_bad_initialization() {
        let rows = vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]];
        let engine = ClusterEngine::<f64>::with_distance(EuclideanDistance);
        let mut rnd = StdRng::seed_from_u64(1);

        // both initial centroids inside the left group
        let res = Lloyd::calculate(&engine, &rows, 2, 30, 3, &mut rnd,
            precomputed(vec![vec![0.0], vec![1.0]]), AbortStrategy::NoReassignment, &|_, _, _, _| {});
        assert_eq!(res.assignments, vec![0, 0, 1, 1]);
        assert_eq!(res.centroids, vec![vec![0.5], vec![10.5]]);
        assert_eq!(res.centroid_frequency, vec![2, 2]);
        assert_eq!(res.average_distance, 0.5);
        assert_eq!(res.attempt, 3);
        assert_eq!(res.iterations, 2);
    }

    #[test]
    fn iteration_cap_stops_refinement() {
        let rows = vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]];
        let engine = ClusterEngine::<f64>::with_distance(EuclideanDistance);
        let mut rnd = StdRng::seed_from_u64(1);

        let res = Lloyd::calculate(&engine, &rows, 2, 1, 0, &mut rnd,
            precomputed(vec![vec![0.0], vec![1.0]]), AbortStrategy::NoReassignment, &|_, _, _, _| {});
        assert_eq!(res.iterations, 1);
        // centroids after one update: [0], [22/3]; row 1 already moved back to the left cluster
        assert_eq!(res.assignments, vec![0, 0, 1, 1]);
        assert_eq!(res.centroid_frequency, vec![2, 2]);
        for (row, &c) in rows.iter().zip(res.assignments.iter()) {
            assert_eq!(engine.find_centroid(row, &res.centroids).unwrap(), c);
        }
    }
}
