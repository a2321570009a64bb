use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quill_text::{build, testing, AtlasConfig};

const TEXT: &str = "The quick brown fox jumps over the lazy dog. 0123456789 !@#$%^&*()";

fn bench_layout(c: &mut Criterion) {
    let font = build(testing::font_bytes(), &AtlasConfig::default()).expect("synthetic font");

    c.bench_function("measure", |b| {
        b.iter(|| font.measure(black_box(1.5), black_box(TEXT)))
    });

    c.bench_function("layout", |b| {
        b.iter(|| font.layout(black_box(10.0), black_box(40.0), black_box(1.5), black_box(TEXT)))
    });
}

fn bench_build(c: &mut Criterion) {
    let bytes = testing::font_bytes();
    let config = AtlasConfig::default().with_point_size(24.0).with_atlas_size(512);

    c.bench_function("build_atlas_24pt", |b| {
        b.iter(|| build(black_box(bytes.clone()), &config).expect("synthetic font"))
    });
}

criterion_group!(benches, bench_layout, bench_build);
criterion_main!(benches);
