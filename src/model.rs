use crate::{CLUSTER_COUNT, ClusterConfig, ClusterEngine, ClusterError, Primitive, Result};
use tracing::debug;

/// Centroids of several classes, each labelled with the class it was trained from.
///
/// Training clusters the rows of every class separately and concatenates the resulting centroids
/// in class order. A new row is classified by the label of its nearest centroid.
///
/// ## Example
/// ```rust
/// use cluster::*;
///
/// let pass: Vec<Vec<f64>> = vec![vec![0.0, 0.1], vec![0.2, 0.0], vec![0.1, 0.1]];
/// let fail: Vec<Vec<f64>> = vec![vec![5.0, 5.2], vec![5.1, 4.9], vec![4.8, 5.0]];
///
/// let engine = ClusterEngine::<f64>::with_distance(EuclideanDistance);
/// let conf = ClusterConfig::build().seed(1).build();
/// let model = ClassModel::train(&engine, &[("pass", pass), ("fail", fail)], 2, &conf).unwrap();
///
/// assert_eq!(model.classify(&engine, &[4.5, 4.5]).unwrap(), &"fail");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClassModel<T: Primitive, L> {
    centroids: Vec<Vec<T>>,
    labels: Vec<L>,
}
impl<T: Primitive, L: Clone> ClassModel<T, L> {
    /// Cluster every class into **clusters_per_class** clusters.
    ///
    /// ## Errors
    /// [`ClusterError::EmptyInput`] without classes, or any precondition violation of
    /// [`ClusterEngine::cluster_data`] for the rows of a class.
    pub fn train(engine: &ClusterEngine<T>, classes: &[(L, Vec<Vec<T>>)], clusters_per_class: usize,
                config: &ClusterConfig<'_, T>) -> Result<Self> {
        if classes.is_empty() {
            return Err(ClusterError::EmptyInput);
        }
        let mut model = Self { centroids: Vec::new(), labels: Vec::new() };
        for (class_idx, (label, rows)) in classes.iter().enumerate() {
            let centroids = engine.cluster_data(rows, clusters_per_class, config)?;
            debug!(class = class_idx, rows = rows.len(), clusters = centroids.len(), "class trained");
            model.labels.extend(std::iter::repeat(label.clone()).take(centroids.len()));
            model.centroids.extend(centroids);
        }
        Ok(model)
    }

    /// [`train`](Self::train) with [`CLUSTER_COUNT`] clusters per class.
    pub fn train_default(engine: &ClusterEngine<T>, classes: &[(L, Vec<Vec<T>>)], config: &ClusterConfig<'_, T>) -> Result<Self> {
        Self::train(engine, classes, CLUSTER_COUNT, config)
    }

    /// Rebuild a model from previously saved per-class centroids.
    pub fn from_class_centroids(classes: Vec<(L, Vec<Vec<T>>)>) -> Result<Self> {
        let mut model = Self { centroids: Vec::new(), labels: Vec::new() };
        for (label, centroids) in classes {
            model.labels.extend(std::iter::repeat(label).take(centroids.len()));
            model.centroids.extend(centroids);
        }
        let expected = model.centroids.first().ok_or(ClusterError::NoCentroids)?.len();
        if let Some(c) = model.centroids.iter().find(|c| c.len() != expected) {
            return Err(ClusterError::CentroidLengthMismatch { expected, found: c.len() });
        }
        Ok(model)
    }
}
impl<T: Primitive, L> ClassModel<T, L> {
    /// Label of the centroid closest to **row**.
    pub fn classify(&self, engine: &ClusterEngine<T>, row: &[T]) -> Result<&L> {
        let idx = engine.find_centroid(row, &self.centroids)?;
        Ok(&self.labels[idx])
    }

    pub fn centroids(&self) -> &[Vec<T>] {
        &self.centroids
    }

    /// Label of each centroid, parallel to [`centroids`](Self::centroids).
    pub fn labels(&self) -> &[L] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EuclideanDistance, MeanAbsoluteDistance, RelevantColumns};

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Class { Fail, Pass }

    fn class_rows(center: f64, noise_column: f64) -> Vec<Vec<f64>> {
        (0..12).map(|i| vec![center + (i % 3) as f64 * 0.1, center - (i % 4) as f64 * 0.1, noise_column * i as f64]).collect()
    }

    #[test]
    fn train_and_classify() {
        let classes = vec![(Class::Fail, class_rows(0.0, 0.0)), (Class::Pass, class_rows(8.0, 0.0))];
        let engine = ClusterEngine::<f64>::with_distance(EuclideanDistance);
        let conf = ClusterConfig::build().seed(21).build();
        let model = ClassModel::train(&engine, &classes, 3, &conf).unwrap();

        assert_eq!(model.centroids().len(), 6);
        assert_eq!(model.labels(), &[Class::Fail, Class::Fail, Class::Fail, Class::Pass, Class::Pass, Class::Pass]);
        assert_eq!(model.classify(&engine, &[0.5, -0.5, 0.0]).unwrap(), &Class::Fail);
        assert_eq!(model.classify(&engine, &[7.0, 9.0, 0.0]).unwrap(), &Class::Pass);
    }

    #[test]
    fn default_cluster_count_per_class() {
        let classes = vec![(Class::Fail, class_rows(0.0, 1.0)), (Class::Pass, class_rows(8.0, 1.0))];
        let engine = ClusterEngine::<f64>::with_distance(EuclideanDistance);
        let model = ClassModel::train_default(&engine, &classes, &ClusterConfig::build().seed(3).build()).unwrap();

        assert_eq!(model.centroids().len(), 2 * CLUSTER_COUNT);
        assert_eq!(model.labels().iter().filter(|&&l| l == Class::Fail).count(), CLUSTER_COUNT);
        assert_eq!(model.classify(&engine, &[8.0, 8.0, 5.0]).unwrap(), &Class::Pass);
    }

    #[test]
    fn irrelevant_columns_are_ignored() {
        // third column is pure noise that would dominate a full euclidean distance
        let classes = vec![(Class::Fail, class_rows(0.0, 100.0)), (Class::Pass, class_rows(8.0, 100.0))];
        let engine = ClusterEngine::<f64>::with_distance(MeanAbsoluteDistance::new(RelevantColumns::from_flags(&[true, true, false])));
        let conf = ClusterConfig::build().seed(5).build();
        let model = ClassModel::train(&engine, &classes, 2, &conf).unwrap();

        assert_eq!(model.classify(&engine, &[0.0, 0.0, 1100.0]).unwrap(), &Class::Fail);
        assert_eq!(model.classify(&engine, &[8.0, 8.0, 0.0]).unwrap(), &Class::Pass);
    }

    #[test]
    fn restored_model_classifies_like_trained_one() {
        let classes = vec![(Class::Fail, class_rows(0.0, 0.0)), (Class::Pass, class_rows(8.0, 0.0))];
        let engine = ClusterEngine::<f64>::with_distance(EuclideanDistance);
        let model = ClassModel::train(&engine, &classes, 2, &ClusterConfig::build().seed(2).build()).unwrap();

        let saved = vec![
            (Class::Fail, model.centroids()[..2].to_vec()),
            (Class::Pass, model.centroids()[2..].to_vec()),
        ];
        assert_eq!(ClassModel::from_class_centroids(saved).unwrap(), model);
    }

    #[test]
    fn training_errors() {
        let engine = ClusterEngine::<f64>::with_distance(EuclideanDistance);
        let conf = ClusterConfig::build().seed(0).build();
        let no_classes: Vec<(Class, Vec<Vec<f64>>)> = vec![];
        assert_eq!(ClassModel::train(&engine, &no_classes, 2, &conf), Err(ClusterError::EmptyInput));

        let small = vec![(Class::Fail, class_rows(0.0, 0.0)), (Class::Pass, vec![vec![1.0, 1.0, 1.0]])];
        assert_eq!(ClassModel::train(&engine, &small, 2, &conf), Err(ClusterError::TooManyClusters { requested: 2, rows: 1 }));

        let empty = vec![(Class::Pass, vec![])];
        assert_eq!(ClassModel::train(&engine, &empty, 1, &conf), Err(ClusterError::EmptyInput));
    }

    #[test]
    fn restore_errors() {
        assert_eq!(ClassModel::<f64, Class>::from_class_centroids(vec![(Class::Fail, vec![])]), Err(ClusterError::NoCentroids));
        assert_eq!(
            ClassModel::<f64, Class>::from_class_centroids(vec![(Class::Fail, vec![vec![1.0, 2.0]]), (Class::Pass, vec![vec![1.0]])]),
            Err(ClusterError::CentroidLengthMismatch { expected: 2, found: 1 })
        );
    }
}
