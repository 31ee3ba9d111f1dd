use criterion::{black_box, criterion_group, criterion_main, Criterion};
use phylo_link::prelude::*;

/// Balanced binary subtree with `depth` levels below each call.
fn subtree(depth: usize, counter: &mut usize) -> String {
    if depth == 0 {
        *counter += 1;
        format!("t{}:0.5", counter)
    } else {
        format!(
            "({},{}):0.25",
            subtree(depth - 1, counter),
            subtree(depth - 1, counter)
        )
    }
}

fn balanced_newick(depth: usize) -> String {
    let mut counter = 0;
    format!(
        "({},{})root;",
        subtree(depth, &mut counter),
        subtree(depth, &mut counter)
    )
}

fn bench_parse(c: &mut Criterion) {
    let text = balanced_newick(9);
    let reader = NewickReader::new();
    c.bench_function("parse_1k_leaves", |b| {
        b.iter(|| reader.read_str(black_box(&text)).unwrap())
    });
}

fn bench_write(c: &mut Criterion) {
    let text = balanced_newick(9);
    let tree = NewickReader::new().read_str(&text).unwrap();
    let writer = NewickWriter::new();
    c.bench_function("write_1k_leaves", |b| {
        b.iter(|| writer.write_str(black_box(&tree)).unwrap())
    });
}

fn bench_traversals(c: &mut Criterion) {
    let text = balanced_newick(9);
    let tree = NewickReader::new().read_str(&text).unwrap();
    c.bench_function("preorder_1k_leaves", |b| {
        b.iter(|| black_box(&tree).preorder().unwrap().count())
    });
    c.bench_function("postorder_1k_leaves", |b| {
        b.iter(|| black_box(&tree).postorder().unwrap().count())
    });
    c.bench_function("euler_tour_1k_leaves", |b| {
        b.iter(|| black_box(&tree).euler_tour().unwrap().count())
    });
}

criterion_group!(benches, bench_parse, bench_write, bench_traversals);
criterion_main!(benches);
