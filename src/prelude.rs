pub use crate::autom::{AutomStats, TryIntoAutomStats};
pub use crate::canon::{IntoCanon, TryIntoCanon};
pub use crate::cmp::IsIdentical;
pub use crate::graph::{CanonDiGraph, CanonGraph, CanonUnGraph};
