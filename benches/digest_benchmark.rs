//! Performance benchmarks for SpliceHash
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use splicehash::config::{Backend, DigestConfig};
use splicehash::core::DigestEngine;
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

/// Create a test file of the specified size
fn create_test_file(dir: &std::path::Path, name: &str, size: usize) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();

    let chunk_size = 64 * 1024;
    let chunk: Vec<u8> = (0..chunk_size).map(|i| (i % 256) as u8).collect();
    let mut remaining = size;

    while remaining > 0 {
        let to_write = remaining.min(chunk_size);
        file.write_all(&chunk[..to_write]).unwrap();
        remaining -= to_write;
    }

    path
}

fn bench_software_digest(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut group = c.benchmark_group("software_digest");

    for size in [1024 * 1024, 16 * 1024 * 1024] {
        let path = create_test_file(dir.path(), &format!("sw_{}.bin", size), size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new(
                "sha256",
                humansize::format_size(size as u64, humansize::BINARY),
            ),
            &size,
            |b, _| {
                b.iter(|| {
                    let config = DigestConfig {
                        algorithm: "sha256".to_string(),
                        path: path.clone(),
                        backend: Backend::Software,
                        ..Default::default()
                    };
                    let _ = black_box(DigestEngine::new(config).execute());
                });
            },
        );
    }

    group.finish();
}

#[cfg(target_os = "linux")]
fn bench_kernel_digest(c: &mut Criterion) {
    use splicehash::session::KernelSession;

    // Skip on kernels without AF_ALG
    if KernelSession::open("sha256").is_err() {
        return;
    }

    let dir = TempDir::new().unwrap();
    let mut group = c.benchmark_group("kernel_digest");

    for size in [1024 * 1024, 16 * 1024 * 1024] {
        let path = create_test_file(dir.path(), &format!("kern_{}.bin", size), size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new(
                "sha256",
                humansize::format_size(size as u64, humansize::BINARY),
            ),
            &size,
            |b, _| {
                b.iter(|| {
                    let config = DigestConfig {
                        algorithm: "sha256".to_string(),
                        path: path.clone(),
                        backend: Backend::Kernel,
                        ..Default::default()
                    };
                    let _ = black_box(DigestEngine::new(config).execute());
                });
            },
        );
    }

    group.finish();
}

#[cfg(not(target_os = "linux"))]
fn bench_kernel_digest(_c: &mut Criterion) {}

criterion_group!(benches, bench_software_digest, bench_kernel_digest);
criterion_main!(benches);
