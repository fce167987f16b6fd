//! Benchmarks for the parser.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use peanut_lex::{Lexer, NoInterpolation};
use peanut_par::{NoStrictBindings, Parser};
use peanut_util::SourceFile;

fn sample_program() -> String {
    let mut source = String::new();
    for i in 0..100 {
        source.push_str(&format!(
            "function calc{i}(a, b = {i}) => a * b + {i}\n\
             var total{i} = calc{i}(2, 3) ^ 2 % 7\n\
             if total{i} > 3 then\n  print(total{i})\nelse\n  print(0)\nend\n"
        ));
    }
    source
}

fn bench_parse(c: &mut Criterion) {
    let source = sample_program();
    let file = SourceFile::new("bench.peanut", source);
    let mut interp = NoInterpolation;
    let tokens = Lexer::new(&file, &mut interp).tokenize().unwrap();

    c.bench_function("parse_sample_program", |b| {
        b.iter(|| {
            Parser::new(black_box(tokens.clone()), &NoStrictBindings)
                .parse()
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
