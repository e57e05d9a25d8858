//! # cluster - API documentation
//!
//! Cluster is a small rust library for k-means style clustering of fixed-width feature rows with a
//! caller-supplied distance metric, and for classifying new rows against the resulting centroids.
//!
//! ## Design target
//! Feature rows are plain `Vec`s of numbers, produced by whatever extracts features from the
//! raw samples. The engine does not know what the columns mean; everything domain specific
//! (e.g. which columns are relevant at all) goes into the [`DistanceFunction`] it is configured with.
//!
//! ## Algorithm
//! Every clustering call performs a full batch run from scratch: a fixed amount of independent,
//! randomized attempts (run in parallel), each refining its centroids for a bounded amount of iterations.
//! The attempt with the lowest average row-to-centroid distance wins. See [`ClusterEngine::cluster`].
//!
//! ## Supported distance functions
//! - [`EuclideanDistance`], [`SquaredEuclideanDistance`]
//! - [`HistogramDistance`]
//! - [`MeanAbsoluteDistance`] and [`RootMeanSquareDistance`] over a set of [`RelevantColumns`]
//! - any `Fn(&[T], &[T]) -> T + Send + Sync` closure
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use cluster::*;
//! use rand::prelude::*;
//!
//! let (sample_cnt, sample_dims, k) = (2000, 16, 4);
//!
//! // Generate some random data
//! let mut rnd = rand::rngs::StdRng::seed_from_u64(1337);
//! let samples: Vec<Vec<f64>> = (0..sample_cnt)
//!     .map(|_| (0..sample_dims).map(|_| rnd.gen()).collect())
//!     .collect();
//!
//! let engine = ClusterEngine::with_distance(EuclideanDistance);
//! let conf = ClusterConfig::build().seed(1).build();
//! let result = engine.cluster(&samples, k, &conf).unwrap();
//!
//! println!("Centroids: {:?}", result.centroids);
//! println!("Cluster-Assignments: {:?}", result.assignments);
//! println!("Average distance: {}", result.average_distance);
//!
//! // classify a new row against the computed centroids
//! let cluster = engine.find_centroid(&samples[0], &result.centroids).unwrap();
//! assert_eq!(cluster, result.assignments[0]);
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use cluster::*;
//!
//! let samples: Vec<Vec<f64>> = (0..500).map(|i| vec![(i % 17) as f64, (i % 5) as f64]).collect();
//!
//! let conf = ClusterConfig::<f64>::build()
//!     .attempts(8)
//!     .iteration_done(&|attempt, nr, reassigned, distsum|
//!         println!("Attempt {} Iteration {} - Reassigned: {} | Error: {:.2}", attempt, nr, reassigned, distsum))
//!     .attempt_done(&|res| println!("Attempt {} done - Average distance: {:.4}", res.attempt, res.average_distance))
//!     .build();
//!
//! let engine = ClusterEngine::with_distance(SquaredEuclideanDistance);
//! let centroids = engine.cluster_data(&samples, 3, &conf).unwrap();
//! assert_eq!(centroids.len(), 3);
//! ```
//!
//! ## Preconditions
//! Violated preconditions (no rows, rows of differing length, more clusters than rows, ...) are reported as
//! [`ClusterError`]. An engine without a distance function ([`ClusterEngine::new`]) is not an error: it
//! clusters with [`ZeroDistance`] and logs a warning, producing meaningless groupings.

#[macro_use] mod helpers;
mod primitive;
mod error;
mod api;
mod distances;
mod variants;
mod inits;
mod abort_strategy;
mod model;

pub use abort_strategy::AbortStrategy;
pub use api::{
    ClusterConfig, ClusterConfigBuilder, ClusterResult, ClusterEngine, AttemptDoneCallbackFn, IterationDoneCallbackFn,
    CLUSTER_ATTEMPTS, CLUSTER_ITERATIONS, CLUSTER_COUNT,
};
pub use distances::{
    DistanceFunction, ZeroDistance, EuclideanDistance, SquaredEuclideanDistance, HistogramDistance,
    RelevantColumns, MeanAbsoluteDistance, RootMeanSquareDistance,
};
pub use error::{ClusterError, Result};
pub use model::ClassModel;
pub use primitive::Primitive;
