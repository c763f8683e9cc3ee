use criterion::{criterion_group, criterion_main, Criterion};
use geotrace::{is_datacenter_ip, is_private_ip, is_valid_ip, validate_trace_input};
use std::hint::black_box;

const INPUTS: &[&str] = &[
    "8.8.8.8",
    "10.1.2.3",
    "192.168.100.200",
    "2001:4860:4860::8888",
    "fe80::1%eth0",
    "not-an-ip",
    "256.1.1.1",
];

fn benchmark_validation(c: &mut Criterion) {
    c.bench_function("is_valid_ip", |b| {
        b.iter(|| {
            for input in INPUTS {
                black_box(is_valid_ip(black_box(input)));
            }
        })
    });

    c.bench_function("validate_trace_input", |b| {
        b.iter(|| {
            for input in INPUTS {
                let _ = black_box(validate_trace_input(black_box(input)));
            }
        })
    });
}

fn benchmark_classification(c: &mut Criterion) {
    c.bench_function("is_private_ip", |b| {
        b.iter(|| {
            for input in INPUTS {
                black_box(is_private_ip(black_box(input)));
            }
        })
    });

    c.bench_function("is_datacenter_ip", |b| {
        b.iter(|| {
            for asn in ["AS15169", "AS16509", "AS99999", ""] {
                black_box(is_datacenter_ip(black_box(asn)));
            }
        })
    });
}

criterion_group!(benches, benchmark_validation, benchmark_classification);
criterion_main!(benches);
