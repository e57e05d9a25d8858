use crate::Primitive;

/// Enum with possible abort strategies.
/// These strategies specify when the refinement iterations of a single clustering attempt are stopped
/// before the configured iteration cap is reached.
#[derive(Clone, Copy, Debug)]
pub enum AbortStrategy<T: Primitive> {
	/// Stops as soon as an assignment step left every row in the cluster it was assigned to in the
	/// previous iteration (convergence).
	NoReassignment,
	/// Stops directly after an iteration produced no improvement where `improvement > threshold`
	/// for the first time. The improvement is measured on the summed distance of all rows to their
	/// nearest centroid.
	/// ## Fields:
	/// - **threshold**: Threshold, used to detect an improvement (`improvement > threshold`)
	NoImprovement { threshold: T },
}
impl<T: Primitive> Default for AbortStrategy<T> {
	fn default() -> Self {
		AbortStrategy::NoReassignment
	}
}
impl<T: Primitive> AbortStrategy<T> {
	pub(crate) fn create_logic(&self) -> Box<dyn AbortStrategyLogic<T>> {
		match *self {
			AbortStrategy::NoReassignment => Box::new(NoReassignmentLogic),
			AbortStrategy::NoImprovement { threshold } => Box::new(NoImprovementLogic {
				threshold,
				prev_distsum: T::infinity()
			})
		}
	}
}

pub(crate) trait AbortStrategyLogic<T: Primitive> {
	/// Function that has to be called once the assignment step of an iteration finished.
	/// ## Arguments
	/// - **reassigned**: Amount of rows whose cluster changed in this iteration
	/// - **distsum**: Summed distance of all rows to their (new) nearest centroid
	/// ## Returns
	/// - **true** if the calculation should continue
	/// - **false** if the calculation should abort
	fn next(&mut self, reassigned: usize, distsum: T) -> bool;
}


pub(crate) struct NoReassignmentLogic;
impl<T: Primitive> AbortStrategyLogic<T> for NoReassignmentLogic {
	fn next(&mut self, reassigned: usize, _: T) -> bool {
		reassigned != 0
	}
}


pub(crate) struct NoImprovementLogic<T: Primitive> {
	threshold: T,
	prev_distsum: T
}
impl<T: Primitive> AbortStrategyLogic<T> for NoImprovementLogic<T> {
	fn next(&mut self, _: usize, distsum: T) -> bool {
		let improvement = self.prev_distsum - distsum;
		self.prev_distsum = distsum;
		improvement > self.threshold
	}
}
