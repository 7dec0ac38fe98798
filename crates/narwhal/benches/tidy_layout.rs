use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use narwhal::{Tree, TreeLayout};
use std::hint::black_box;

/// A complete `fanout`-ary tree with `depth` levels below the root.
fn complete_tree(fanout: usize, depth: usize) -> Tree {
    let mut children: Vec<Vec<usize>> = vec![Vec::new()];
    let mut level = vec![0usize];
    for _ in 0..depth {
        let mut next = Vec::new();
        for &p in &level {
            for _ in 0..fanout {
                let id = children.len();
                children.push(Vec::new());
                children[p].push(id);
                next.push(id);
            }
        }
        level = next;
    }
    Tree::from_children(0, children).expect("complete tree is valid")
}

fn bench_tidy_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("tidy_layout");
    for (fanout, depth) in [(2usize, 10usize), (3, 7), (5, 5)] {
        let tree = complete_tree(fanout, depth);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("fanout{fanout}_depth{depth}")),
            &tree,
            |b, tree| {
                let layout = TreeLayout::new(190.0, 215.0);
                b.iter(|| black_box(layout.layout_default(black_box(tree))));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_tidy_layout);
criterion_main!(benches);
