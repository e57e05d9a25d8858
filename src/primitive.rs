use num::{Float, NumCast, Zero};
use std::{
    fmt::{Debug, Display, LowerExp},
    iter::Sum,
    ops::{AddAssign, SubAssign},
};

/// Scalar type of feature rows, centroids and distances.
pub trait Primitive: Float + NumCast + Zero + Sum + AddAssign + SubAssign + PartialOrd + Copy + Default
                + Display + Debug + LowerExp + Send + Sync + 'static
                + for<'a> AddAssign<&'a Self> {}
impl Primitive for f32 {}
impl Primitive for f64 {}
