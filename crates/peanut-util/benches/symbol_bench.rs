//! Benchmarks for symbol interning.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use peanut_util::Symbol;

fn bench_intern_hit(c: &mut Criterion) {
    Symbol::intern("already_interned_name");
    c.bench_function("intern_hit", |b| {
        b.iter(|| Symbol::intern(black_box("already_interned_name")))
    });
}

fn bench_intern_keywords(c: &mut Criterion) {
    let keywords = ["var", "let", "if", "while", "function", "return"];
    c.bench_function("intern_keywords", |b| {
        b.iter(|| {
            for kw in &keywords {
                black_box(Symbol::intern(kw));
            }
        })
    });
}

fn bench_as_str(c: &mut Criterion) {
    let sym = Symbol::intern("resolver_target");
    c.bench_function("symbol_as_str", |b| b.iter(|| black_box(sym).as_str()));
}

criterion_group!(benches, bench_intern_hit, bench_intern_keywords, bench_as_str);
criterion_main!(benches);
