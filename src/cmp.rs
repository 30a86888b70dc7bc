use petgraph::{graph::IndexType, visit::EdgeRef, EdgeType, Graph};

/// Check if two objects are identical
///
/// For graphs this is structural equality of the labelled object, not
/// isomorphism: node weights, edge endpoints and edge weights must all
/// agree position by position. Comparing canonical forms with this
/// trait is what turns it into an isomorphism test.
pub trait IsIdentical {
    fn is_identical(&self, other: &Self) -> bool;
}

impl<N: PartialEq, E: PartialEq, Ty: EdgeType, Ix: IndexType> IsIdentical
    for Graph<N, E, Ty, Ix>
{
    fn is_identical(&self, other: &Self) -> bool {
        self.node_count() == other.node_count()
            && self.edge_count() == other.edge_count()
            && self.node_weights().eq(other.node_weights())
            && self.edge_references().zip(other.edge_references()).all(
                |(e1, e2)| {
                    e1.source() == e2.source()
                        && e1.target() == e2.target()
                        && e1.weight() == e2.weight()
                },
            )
    }
}
