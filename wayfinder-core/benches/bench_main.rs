use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use wayfinder_core::algo::haversine_distance;
use wayfinder_core::providers::AddressFields;
use wayfinder_core::resolve::assemble_address;
use wayfinder_core::routing::compute_fallback;
use wayfinder_core::{Coordinate, TransportMode};

fn bench_haversine(c: &mut Criterion) {
    let a = Coordinate::new(1.3521, 103.8198).unwrap();
    let b = Coordinate::new(1.2834, 103.8607).unwrap();
    c.bench_function("haversine_distance", |bench| {
        bench.iter(|| haversine_distance(black_box(a), black_box(b)));
    });
}

fn bench_fallback(c: &mut Criterion) {
    let a = Coordinate::new(1.3521, 103.8198).unwrap();
    let b = Coordinate::new(1.3644, 103.9915).unwrap();
    c.bench_function("compute_fallback", |bench| {
        bench.iter(|| compute_fallback(black_box(a), black_box(b), TransportMode::Train));
    });
}

fn bench_assemble_address(c: &mut Criterion) {
    let fields = AddressFields {
        block: Some("Blk 123".to_string()),
        house_number: Some("123".to_string()),
        road: Some("Lorong 1 Toa Payoh".to_string()),
        suburb: Some("Toa Payoh".to_string()),
        city: Some("Singapore".to_string()),
        country: Some("Singapore".to_string()),
        ..AddressFields::default()
    };
    c.bench_function("assemble_address", |bench| {
        bench.iter(|| assemble_address(black_box(&fields)));
    });
}

criterion_group!(benches, bench_haversine, bench_fallback, bench_assemble_address);
criterion_main!(benches);
