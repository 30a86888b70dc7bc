use canonry::prelude::*;
use canonry::{IntoCanonDense, IntoCanonSparse};
use testing::{GraphIter, randomize_labels};

use criterion::{BatchSize, black_box, criterion_group, criterion_main, Criterion};
use petgraph::{
    EdgeType,
    graph::{Graph, IndexType},
    Directed, Undirected,
};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256Plus;

fn iso_dense<Ty: EdgeType, Ix: IndexType>(
    graphs: impl IntoIterator<Item = (Graph<u8, u8, Ty, Ix>, Graph<u8, u8, Ty, Ix>)>
) -> bool {
    graphs.into_iter().all(|(g, h)| {
        g.into_canon_dense().is_identical(
            &h.into_canon_dense()
        )
    })
}

fn iso_sparse<Ty: EdgeType, Ix: IndexType>(
    graphs: impl IntoIterator<Item = (Graph<u8, u8, Ty, Ix>, Graph<u8, u8, Ty, Ix>)>
) -> bool {
    graphs.into_iter().all(|(g, h)| {
        g.into_canon_sparse().is_identical(
            &h.into_canon_sparse()
        )
    })
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(0);

    let graphs = Vec::from_iter(
        GraphIter::<Undirected>::default()
            .take(1000)
            .map(|g| (g.clone(), randomize_labels(g, &mut rng))),
    );
    let g = graphs.clone();
    c.bench_function("undirected dense", move |b| {
        b.iter_batched(|| g.clone(), |g| iso_dense(black_box(g)), BatchSize::SmallInput)
    });
    c.bench_function("undirected sparse", move |b| {
        b.iter_batched(|| graphs.clone(), |g| iso_sparse(black_box(g)), BatchSize::SmallInput)
    });

    let graphs = Vec::from_iter(
        GraphIter::<Directed>::default()
            .take(1000)
            .map(|g| (g.clone(), randomize_labels(g, &mut rng))),
    );
    c.bench_function("directed dense", move |b| {
        b.iter_batched(|| graphs.clone(), |g| iso_dense(black_box(g)), BatchSize::SmallInput)
    });

}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
