use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use libcatalog::{
    codec::{decode_book, encode_book},
    core::store::CatalogStore,
    record::{BookDraft, MemberDraft},
    types::SortKey,
};

fn draft(i: u64) -> BookDraft {
    BookDraft::new(format!("Title {i} | part"), format!("Author {}", i % 97), format!("Cat {}", i % 13))
}

fn filled_store(n: u64) -> CatalogStore {
    let mut store = CatalogStore::new();
    for i in 0..n {
        let _ = store.add_book(draft(i)).expect("add");
    }
    store
}

fn bench_codec(c: &mut Criterion) {
    let store = filled_store(10_000);
    let lines: Vec<String> = store.books().map(encode_book).collect();

    c.bench_function("encode_books_10k", |b| {
        b.iter(|| store.books().map(encode_book).count());
    });
    c.bench_function("decode_books_10k", |b| {
        b.iter(|| lines.iter().filter_map(|l| decode_book(l).ok()).count());
    });
}

fn bench_issue_return(c: &mut Criterion) {
    c.bench_function("issue_return_2k", |b| {
        b.iter(|| {
            let mut store = filled_store(2_000);
            let (member, _) = store
                .add_member(MemberDraft::new("Bench", "bench@example.com"))
                .expect("member");
            for id in 100..2_100u64 {
                store.issue_book(member, id).expect("issue");
            }
            for id in 100..2_100u64 {
                store.return_book(member, id).expect("return");
            }
        });
    });
}

fn bench_sorted(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_books");
    let store = filled_store(50_000);

    for key in [SortKey::Title, SortKey::Author, SortKey::Category] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{key:?}")), &key, |b, &key| {
            b.iter(|| {
                let _ = store.sorted_books(key);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_issue_return, bench_sorted);
criterion_main!(benches);
