use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagenet::host::{punycode, DomainName};

fn bench_punycode(c: &mut Criterion) {
    let mut group = c.benchmark_group("punycode");

    let labels = vec!["bücher", "münchen", "παράδειγμα", "例え", "العربية"];

    group.bench_function("encode_mixed_labels", |b| {
        b.iter(|| {
            for label in &labels {
                black_box(punycode::encode(label));
            }
        });
    });

    group.bench_function("domain_validation_ascii", |b| {
        b.iter(|| black_box(DomainName::new("sub.example.com")));
    });

    group.bench_function("domain_validation_unicode", |b| {
        b.iter(|| black_box(DomainName::new("www.münchen.de")));
    });

    group.finish();
}

criterion_group!(benches, bench_punycode);
criterion_main!(benches);
