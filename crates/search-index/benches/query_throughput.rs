//! Indexing and query-throughput benchmarks for `search_index::Index`.
//!
//! Compares sequential and parallel (`_par`) read paths across corpus sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use search_index::{Index, Status};

fn generate_documents(n_docs: usize, terms_per_doc: usize, vocab_size: usize) -> Vec<String> {
    (0..n_docs)
        .map(|doc| {
            (0..terms_per_doc)
                .map(|i| format!("term{}", (doc * 7 + i * 11) % vocab_size))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn build_index(documents: &[String]) -> Index {
    let mut index = Index::new(Vec::<String>::new()).unwrap();
    for (id, text) in documents.iter().enumerate() {
        index
            .add_document(id as i64, text, Status::Actual, &[(id % 5) as i64])
            .unwrap();
    }
    index
}

fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_add_document");

    for (n_docs, terms_per_doc) in [(100, 50), (1000, 100), (10000, 200)] {
        let vocab_size = 2000;
        let documents = generate_documents(n_docs, terms_per_doc, vocab_size);

        group.bench_with_input(
            BenchmarkId::new("add_documents", format!("{n_docs}docs_{terms_per_doc}terms")),
            &documents,
            |b, docs| {
                b.iter(|| {
                    black_box(build_index(docs));
                })
            },
        );
    }

    group.finish();
}

fn bench_find_top(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_find_top");

    for (n_docs, terms_per_doc, query_len) in [(1000, 100, 5), (10000, 200, 10)] {
        let vocab_size = 2000;
        let documents = generate_documents(n_docs, terms_per_doc, vocab_size);
        let index = build_index(&documents);

        let query: Vec<String> =
            (0..query_len).map(|i| format!("term{}", (i * 13) % vocab_size)).collect();
        let query = query.join(" ");

        group.bench_with_input(
            BenchmarkId::new("sequential", format!("{n_docs}docs")),
            &query,
            |b, q| b.iter(|| black_box(index.find_top_default(q).unwrap())),
        );

        group.bench_with_input(
            BenchmarkId::new("parallel", format!("{n_docs}docs")),
            &query,
            |b, q| b.iter(|| black_box(index.find_top_par_default(q).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_indexing, bench_find_top);
criterion_main!(benches);
