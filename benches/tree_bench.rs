use std::collections::VecDeque;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use portal::config::HierarchyConfig;
use portal::db;
use portal::hierarchy::tree::assemble_forest;
use portal::hierarchy::{HierarchyManager, MemoryStore, SqliteNodeStore};
use portal::types::Organization;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::runtime::Runtime;

/// Flat rows of a balanced tree: `roots` roots, each node with `fanout`
/// children, down to `depth` levels. Rows are in breadth-first id order.
fn build_rows(roots: usize, fanout: usize, depth: i64) -> Vec<Organization> {
    let mut rows = Vec::new();
    let mut frontier: VecDeque<(i64, i64)> = VecDeque::new();
    let mut next_id = 1i64;
    for r in 0..roots {
        rows.push(org(next_id, format!("root-{r}"), 0, 1));
        frontier.push_back((next_id, 1));
        next_id += 1;
    }
    while let Some((parent, level)) = frontier.pop_front() {
        if level >= depth {
            continue;
        }
        for c in 0..fanout {
            rows.push(org(next_id, format!("node-{parent}-{c}"), parent, level + 1));
            frontier.push_back((next_id, level + 1));
            next_id += 1;
        }
    }
    rows
}

fn org(id: i64, name: String, parent_id: i64, level: i64) -> Organization {
    Organization { id, name, parent_id, level, description: String::new(), children: Vec::new() }
}

fn benchmark_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_forest");
    for (roots, fanout) in [(10, 4), (20, 6)] {
        let rows = build_rows(roots, fanout, 5);
        group.bench_with_input(BenchmarkId::from_parameter(rows.len()), &rows, |b, rows| {
            b.iter(|| black_box(assemble_forest(rows.clone())))
        });
    }
    group.finish();
}

fn benchmark_filtered_memory(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let manager = HierarchyManager::new(MemoryStore::with_rows(build_rows(10, 4, 5)), &HierarchyConfig::default());

    c.bench_function("list_tree_filtered_memory", |b| {
        b.iter(|| rt.block_on(async { black_box(manager.list_tree("node-3").await.unwrap()) }))
    });
}

fn benchmark_sqlite(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let manager = rt.block_on(async {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        db::init_db(&pool).await.unwrap();
        let manager = HierarchyManager::new(SqliteNodeStore::<Organization>::new(pool), &HierarchyConfig::default());
        let mut ids = Vec::new();
        for r in 0..10 {
            let root = manager.create(org(0, format!("root-{r}"), 0, 0)).await.unwrap();
            ids.push(root.id);
        }
        for level in 0..3 {
            let parents = std::mem::take(&mut ids);
            for parent in parents {
                for c in 0..4 {
                    let node = manager.create(org(0, format!("n{level}-{parent}-{c}"), parent, 0)).await.unwrap();
                    ids.push(node.id);
                }
            }
        }
        manager
    });

    let mut group = c.benchmark_group("sqlite_list_tree");
    group.bench_function("unfiltered", |b| b.iter(|| rt.block_on(async { black_box(manager.list_tree("").await.unwrap()) })));
    group.bench_function("filtered", |b| b.iter(|| rt.block_on(async { black_box(manager.list_tree("n2-").await.unwrap()) })));
    group.finish();
}

criterion_group!(benches, benchmark_assemble, benchmark_filtered_memory, benchmark_sqlite);
criterion_main!(benches);
