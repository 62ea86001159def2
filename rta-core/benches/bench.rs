use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rta_core::{Automaton, classify, diagram, parse, table, translate};

fn bench_parse(c: &mut Criterion) {
    let pattern = "(ab|c(de)^)^f(g|h|i)^";

    c.bench_function("parse", |b| b.iter(|| black_box(parse(black_box(pattern)))));
}

fn bench_build(c: &mut Criterion) {
    let extent = parse("(ab|c(de)^)^f(g|h|i)^").unwrap();

    c.bench_function("build", |b| {
        b.iter(|| black_box(Automaton::from_extent(black_box(&extent))))
    });
}

fn bench_classify(c: &mut Criterion) {
    let automaton = Automaton::from_extent(&parse("((a|b)^c(d|e^)^)^f").unwrap());

    c.bench_function("classify", |b| {
        b.iter(|| {
            let mut automaton = automaton.clone();
            classify(&mut automaton);
            black_box(automaton)
        })
    });
}

fn bench_classify_long(c: &mut Criterion) {
    let automaton = Automaton::from_extent(&parse(&format!("({})^", "a".repeat(4000))).unwrap());

    c.bench_function("classify_long", |b| {
        b.iter(|| {
            let mut automaton = automaton.clone();
            classify(&mut automaton);
            black_box(automaton)
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let mut automaton = Automaton::from_extent(&parse("(ab|c(de)^)^f(g|h|i)^").unwrap());
    classify(&mut automaton);

    c.bench_function("render", |b| {
        b.iter(|| black_box((table(&automaton), diagram(&automaton))))
    });
}

fn bench_translate_long(c: &mut Criterion) {
    let pattern = "(a|b)^c".repeat(64);

    c.bench_function("translate_long", |b| {
        b.iter(|| black_box(translate(black_box(&pattern))))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_build,
    bench_classify,
    bench_classify_long,
    bench_render,
    bench_translate_long,
);

criterion_main!(benches);
