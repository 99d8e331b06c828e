/// Request construction benchmarks
///
/// Run with: cargo bench -p vecta-tests

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use vecta_client::{Comparator, ExploreParams, GroupParams, GroupType, Movement, WhereFilter};
use vecta_test_utils::{ArticleGenerator, RecordingTransport};

fn nested_filter(depth: usize) -> WhereFilter {
    let leaf = WhereFilter::leaf(["wordCount"], Comparator::GreaterThanEqual, 50);
    (0..depth).fold(leaf, |inner, i| {
        let sibling = WhereFilter::leaf(["title"], Comparator::Like, format!("news-{}*", i));
        if i % 2 == 0 {
            WhereFilter::and(vec![inner, sibling])
        } else {
            WhereFilter::or(vec![inner, sibling])
        }
    })
}

fn bench_filter_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_serialize");

    for depth in [1, 8, 64] {
        let filter = nested_filter(depth);
        group.throughput(Throughput::Elements(depth as u64 + 1));
        group.bench_with_input(BenchmarkId::new("depth", depth), &filter, |b, filter| {
            b.iter(|| black_box(filter).serialize().unwrap());
        });
    }
    group.finish();
}

fn bench_filter_from_json(c: &mut Criterion) {
    let value = json!({
        "operator": "And",
        "operands": [
            {"operator": "GreaterThanEqual", "path": ["wordCount"], "valueInt": 50},
            {"operator": "Like", "path": ["title"], "valueText": "apple*"},
            {"operator": "Equal", "path": ["inPublication", "Publication", "name"], "valueString": "NYT"}
        ]
    });

    c.bench_function("filter_from_json", |b| {
        b.iter(|| WhereFilter::from_json(black_box(&value)).unwrap());
    });
}

fn bench_get_query(c: &mut Criterion) {
    let client = RecordingTransport::new().client();
    let filter = nested_filter(4);

    c.bench_function("get_query_build", |b| {
        b.iter(|| {
            client
                .graphql()
                .get()
                .with_class_name("Article")
                .with_fields("title url wordCount")
                .with_where(filter.clone())
                .with_explore(
                    ExploreParams::new(["news"])
                        .with_certainty(0.7)
                        .with_move_to(Movement::new(["science"], 0.3)),
                )
                .with_group(GroupParams::new(GroupType::Merge, 1.0))
                .with_limit(black_box(7))
                .build()
                .unwrap()
        });
    });
}

fn bench_create_request(c: &mut Criterion) {
    let client = RecordingTransport::new().client();
    let mut gen = ArticleGenerator::new();
    let schema = gen.next_schema();

    c.bench_function("create_request_build", |b| {
        b.iter(|| {
            client
                .data()
                .creator()
                .with_class_name("Article")
                .with_schema(black_box(schema.clone()))
                .build()
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_filter_serialize,
    bench_filter_from_json,
    bench_get_query,
    bench_create_request
);
criterion_main!(benches);
