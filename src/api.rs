use crate::{AbortStrategy, ClusterError, DistanceFunction, Primitive, Result, ZeroDistance};
use std::{cell::RefCell, sync::Arc};
use rayon::prelude::*;
use rand::{prelude::*, rngs::StdRng};
use tracing::{debug, warn};

/// Default amount of independent randomized attempts per clustering run.
pub const CLUSTER_ATTEMPTS: usize = 50;
/// Default cap of refinement iterations within a single attempt.
pub const CLUSTER_ITERATIONS: usize = 30;
/// Default amount of clusters computed per class by [`ClassModel::train_default`](crate::ClassModel::train_default).
pub const CLUSTER_COUNT: usize = 10;

pub type AttemptDoneCallbackFn<'a, T> = &'a (dyn Fn(&ClusterResult<T>) + Sync);
pub type IterationDoneCallbackFn<'a, T> = &'a (dyn Fn(usize, usize, usize, T) + Sync);

/// This is a structure holding the configuration of a clustering run, such as the amount of attempts,
/// the random number generator to seed them from, or a couple of callbacks, that can be set to get
/// status information from a running calculation.
///
/// For a more detailed information about all possible options, have a look at [`ClusterConfigBuilder`].
pub struct ClusterConfig<'a, T: Primitive> {
    /// Amount of independent randomized attempts. The attempt with the lowest average distance wins.
    pub(crate) attempts: usize,
    /// Maximum amount of refinement iterations within one attempt
    pub(crate) max_iterations: usize,
    /// Callback that is called after each finished attempt
    /// ## Arguments
    /// - **result**: Final [`ClusterResult`] of that attempt
    pub(crate) attempt_done: AttemptDoneCallbackFn<'a, T>,
    /// Callback that is called after each refinement iteration
    /// ## Arguments
    /// - **attempt**: Index of the attempt the iteration belongs to
    /// - **iteration**: Number of the iteration within the attempt (starting at 1)
    /// - **reassigned**: Amount of rows that changed their cluster
    /// - **distsum**: Summed distance of all rows to their centroid
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Random number generator the per-attempt seeds are drawn from
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// The abort-strategy every attempt uses for its refinement iterations
    pub(crate) abort_strategy: AbortStrategy<T>
}
impl<'a, T: Primitive> Default for ClusterConfig<'a, T> {
    fn default() -> Self {
        Self {
            attempts: CLUSTER_ATTEMPTS,
            max_iterations: CLUSTER_ITERATIONS,
            attempt_done: &|_| {},
            iteration_done: &|_, _, _, _| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            abort_strategy: AbortStrategy::NoReassignment
        }
    }
}
impl<'a, T: Primitive> ClusterConfig<'a, T> {
    /// Use the [`ClusterConfigBuilder`] to build a [`ClusterConfig`] instance.
    pub fn build() -> ClusterConfigBuilder<'a, T> {
        ClusterConfigBuilder { config: ClusterConfig::default() }
    }

    fn validate(&self) -> Result<()> {
        if self.attempts == 0 {
            return Err(ClusterError::InvalidConfig("at least one attempt is required"));
        }
        if self.max_iterations == 0 {
            return Err(ClusterError::InvalidConfig("at least one iteration is required"));
        }
        Ok(())
    }
}
impl<'a, T: Primitive> std::fmt::Debug for ClusterConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("attempts", &self.attempts)
            .field("max_iterations", &self.max_iterations)
            .field("abort_strategy", &self.abort_strategy)
            .finish()
    }
}

pub struct ClusterConfigBuilder<'a, T: Primitive> {
    config: ClusterConfig<'a, T>
}
impl<'a, T: Primitive> ClusterConfigBuilder<'a, T> {
    /// Set the amount of independent randomized attempts.
    /// ## Default
    /// [`CLUSTER_ATTEMPTS`]
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.config.attempts = attempts; self
    }
    /// Set the maximum amount of refinement iterations per attempt.
    /// ## Default
    /// [`CLUSTER_ITERATIONS`]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations; self
    }
    /// Set the callback that should be called after each finished attempt.
    /// Attempts run in parallel, so the callback may be invoked from multiple threads and in any order.
    pub fn attempt_done(mut self, attempt_done: AttemptDoneCallbackFn<'a, T>) -> Self {
        self.config.attempt_done = attempt_done; self
    }
    /// Set the callback that should be called after each refinement iteration of any attempt.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the random number generator that the seeds of the attempts are drawn from.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Shorthand for [`random_generator`](Self::random_generator) with a seeded [`StdRng`].
    pub fn seed(self, seed: u64) -> Self {
        self.random_generator(StdRng::seed_from_u64(seed))
    }
    /// Set the abort-strategy to use within each attempt. For more information,
    /// see documentation of [`AbortStrategy`].
    /// ## Default
    /// [`AbortStrategy::NoReassignment`]
    pub fn abort_strategy(mut self, abort_strategy: AbortStrategy<T>) -> Self {
        self.config.abort_strategy = abort_strategy; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> ClusterConfig<'a, T> { self.config }
}


/// This is the internally used data-structure, storing the state of a single attempt during calculation,
/// as well as the final result, as returned by the API.
/// All mutations are done in this structure, making [`ClusterEngine`] immutable, and therefore allowing
/// attempts to run in parallel, without having to duplicate the input-data.
///
/// ## Fields
/// - **k**: The amount of clusters that were requested
/// - **attempt**: Index of the attempt that produced this result
/// - **iterations**: Amount of refinement iterations that attempt ran. One iteration is an update step
///   followed by a reassignment, so an attempt whose initial centroids were already stable reports 1.
/// - **average_distance**: Mean distance of all rows to their assigned centroid
/// - **centroids**: Calculated cluster centers, one row per cluster
/// - **centroid_frequency**: Amount of rows in each cluster
/// - **assignments**: Vector mapping each row to its respective nearest cluster
/// - **centroid_distances**: Vector containing each row's distance to its centroid
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterResult<T: Primitive> {
    pub k: usize,
    pub attempt: usize,
    pub iterations: usize,
    pub average_distance: T,
    pub centroids: Vec<Vec<T>>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<usize>,
    pub centroid_distances: Vec<T>,
}
impl<T: Primitive> ClusterResult<T> {
    pub(crate) fn new(sample_cnt: usize, k: usize, attempt: usize) -> Self {
        Self {
            k,
            attempt,
            iterations: 0,
            average_distance: T::infinity(),
            centroids: Vec::with_capacity(k),
            centroid_frequency: vec![0usize; k],
            // no row is assigned yet, so the initial assignment step counts every row as reassigned
            assignments: vec![usize::MAX; sample_cnt],
            centroid_distances: vec![T::infinity(); sample_cnt],
        }
    }
}


/// Entrypoint of this crate's API-Surface.
///
/// A [`ClusterEngine`] owns the [`DistanceFunction`] used to compare feature rows with centroids and
/// nothing else. Every call performs a full batch clustering run from scratch.
///
/// ## States
/// - *Unconfigured*: created by [`ClusterEngine::new`]. The [`ZeroDistance`] placeholder is active, which
///   makes every row equidistant to every centroid. Clustering and classification still work, but their
///   results are meaningless.
/// - *Configured*: created by [`ClusterEngine::with_distance`], or reached via [`ClusterEngine::set_distance`].
#[derive(Clone)]
pub struct ClusterEngine<T: Primitive> {
    distance: Arc<dyn DistanceFunction<T>>,
    configured: bool,
}
impl<T: Primitive> Default for ClusterEngine<T> {
    fn default() -> Self { Self::new() }
}
impl<T: Primitive> std::fmt::Debug for ClusterEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterEngine").field("configured", &self.configured).finish()
    }
}
impl<T: Primitive> ClusterEngine<T> {
    /// Create an unconfigured engine. [`set_distance`](Self::set_distance) has to be called before its
    /// results are of any use.
    pub fn new() -> Self {
        Self { distance: Arc::new(ZeroDistance), configured: false }
    }

    /// Create an engine using the given distance function.
    pub fn with_distance<D: DistanceFunction<T> + 'static>(distance: D) -> Self {
        Self { distance: Arc::new(distance), configured: true }
    }

    /// Replace the distance function used by all subsequent operations. The last call wins.
    pub fn set_distance<D: DistanceFunction<T> + 'static>(&mut self, distance: D) {
        self.distance = Arc::new(distance);
        self.configured = true;
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    #[inline(always)]
    pub(crate) fn distance(&self, row: &[T], centroid: &[T]) -> T {
        self.distance.distance(row, centroid)
    }

    /// Linear scan over all centroids. Only a strictly smaller distance replaces the current
    /// candidate, so ties go to the lowest centroid index.
    /// `centroids` must not be empty.
    pub(crate) fn nearest(&self, row: &[T], centroids: &[Vec<T>]) -> (usize, T) {
        let mut best = (0, self.distance(row, &centroids[0]));
        for (idx, centroid) in centroids.iter().enumerate().skip(1) {
            let dist = self.distance(row, centroid);
            if dist < best.1 {
                best = (idx, dist);
            }
        }
        best
    }

    fn warn_unconfigured(&self, operation: &'static str) {
        if !self.configured {
            warn!(operation, "no distance function set, every row is equidistant to every centroid");
        }
    }

    /// Partition **rows** into **k** clusters and return only the centroids of the best attempt.
    /// See [`ClusterEngine::cluster`] for details.
    pub fn cluster_data(&self, rows: &[Vec<T>], k: usize, config: &ClusterConfig<'_, T>) -> Result<Vec<Vec<T>>> {
        self.cluster(rows, k, config).map(|res| res.centroids)
    }

    /// k-means clustering with randomized restarts.
    ///
    /// Every attempt starts from **k** distinct rows, sampled without replacement, as initial centroids and
    /// alternates between an assignment step (each row joins its nearest centroid) and an update step (each
    /// centroid moves to the mean of its rows) until the configured [`AbortStrategy`] stops it, or the
    /// iteration cap is reached. A centroid that lost all of its rows keeps its previous position.
    ///
    /// Attempts are independent and run in parallel. Each draws its own seed from the configured random
    /// generator up front, so a seeded configuration yields identical results on every run. The attempt with
    /// the lowest average distance wins, ties going to the earlier attempt.
    ///
    /// ## Arguments
    /// - **rows**: Non-empty list of feature rows, all of the same length
    /// - **k**: Amount of clusters to search for (`1 <= k <= rows.len()`)
    /// - **config**: [`ClusterConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`ClusterResult`], containing the best attempt's result.
    ///
    /// ## Example
    /// ```rust
    /// use cluster::*;
    ///
    /// let rows: Vec<Vec<f64>> = vec![
    ///     vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0],
    ///     vec![10.0, 10.0], vec![10.0, 11.0], vec![11.0, 10.0],
    /// ];
    /// let engine = ClusterEngine::with_distance(EuclideanDistance);
    /// let conf = ClusterConfig::build().seed(1337).build();
    /// let result = engine.cluster(&rows, 2, &conf).unwrap();
    ///
    /// assert_eq!(result.assignments[0], result.assignments[1]);
    /// assert_ne!(result.assignments[0], result.assignments[3]);
    /// println!("Centroids: {:?}", result.centroids);
    /// println!("Average distance: {}", result.average_distance);
    /// ```
    pub fn cluster(&self, rows: &[Vec<T>], k: usize, config: &ClusterConfig<'_, T>) -> Result<ClusterResult<T>> {
        let sample_dims = validate_rows(rows)?;
        if k == 0 {
            return Err(ClusterError::NoClusters);
        }
        if k > rows.len() {
            return Err(ClusterError::TooManyClusters { requested: k, rows: rows.len() });
        }
        config.validate()?;
        self.warn_unconfigured("cluster");
        debug!(rows = rows.len(), sample_dims, k, attempts = config.attempts, "clustering");

        let seeds: Vec<u64> = {
            let mut rnd = config.rnd.borrow_mut();
            (0..config.attempts).map(|_| rnd.next_u64()).collect()
        };
        let (max_iterations, abort_strategy) = (config.max_iterations, config.abort_strategy);
        let (attempt_done, iteration_done) = (config.attempt_done, config.iteration_done);

        let results: Vec<ClusterResult<T>> = seeds.into_par_iter().enumerate()
            .map(|(attempt, seed)| {
                let mut rnd = StdRng::seed_from_u64(seed);
                let res = crate::variants::Lloyd::calculate(
                    self, rows, k, max_iterations, attempt, &mut rnd,
                    crate::inits::randomsample::calculate, abort_strategy, iteration_done);
                debug!(attempt, iterations = res.iterations, average_distance = %res.average_distance, "attempt finished");
                attempt_done(&res);
                res
            }).collect();

        // strictly lower wins, so equal scores keep the earlier attempt
        let best = results.into_iter().fold(None, |best: Option<ClusterResult<T>>, res| match best {
            Some(best) if best.average_distance <= res.average_distance => Some(best),
            _ => Some(res),
        }).ok_or(ClusterError::InvalidConfig("at least one attempt is required"))?;
        debug!(attempt = best.attempt, average_distance = %best.average_distance, "best attempt");
        Ok(best)
    }

    /// Index of the centroid closest to **row**. Ties go to the lowest index.
    ///
    /// Used to classify previously unseen rows against a saved set of centroids. For a row that took
    /// part in a clustering run, this returns the row's entry in [`ClusterResult::assignments`].
    pub fn find_centroid(&self, row: &[T], centroids: &[Vec<T>]) -> Result<usize> {
        if centroids.is_empty() {
            return Err(ClusterError::NoCentroids);
        }
        if let Some(c) = centroids.iter().find(|c| c.len() != row.len()) {
            return Err(ClusterError::CentroidLengthMismatch { expected: c.len(), found: row.len() });
        }
        self.warn_unconfigured("find_centroid");
        Ok(self.nearest(row, centroids).0)
    }
}

/// Checks that there is at least one row, that all rows share a non-zero length, which is returned,
/// and that every value is finite.
fn validate_rows<T: Primitive>(rows: &[Vec<T>]) -> Result<usize> {
    let sample_dims = rows.first().ok_or(ClusterError::EmptyInput)?.len();
    if sample_dims == 0 {
        return Err(ClusterError::ZeroDimensions);
    }
    for (row, r) in rows.iter().enumerate() {
        if r.len() != sample_dims {
            return Err(ClusterError::RowLengthMismatch { row, expected: sample_dims, found: r.len() });
        }
        if let Some(column) = r.iter().position(|v| !v.is_finite()) {
            return Err(ClusterError::NonFinite { row, column });
        }
    }
    Ok(sample_dims)
}
