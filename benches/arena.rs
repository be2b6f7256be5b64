use std::alloc::{alloc, dealloc, Layout};

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use vmarena::Arena;

const ALLOC_SIZE: usize = 64;
const RESERVE: usize = 1 << 30; // 1 GiB of address space
const COMMIT_STEP: usize = 64 << 10;

fn bench_alloc(c: &mut Criterion) {
    let mut group = c.benchmark_group("alloc_64bytes");
    group.throughput(Throughput::Elements(1));

    let mut arena = Arena::new(RESERVE, COMMIT_STEP).expect("reserve bench arena");
    group.bench_function("arena", |b| {
        b.iter(|| {
            // black_box keeps the optimizer from deleting the loop
            let ptr = match arena.alloc(ALLOC_SIZE) {
                Ok(ptr) => ptr,
                Err(_) => {
                    arena.reset();
                    arena.alloc(ALLOC_SIZE).expect("alloc after reset")
                }
            };
            black_box(ptr);
        });
    });

    group.bench_function("system", |b| {
        let layout = Layout::from_size_align(ALLOC_SIZE, 8).expect("layout");
        b.iter(|| unsafe {
            let ptr = alloc(layout);
            assert!(!ptr.is_null());
            black_box(ptr);
            dealloc(ptr, layout);
        });
    });

    group.finish();
}

fn bench_frame_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_cycle");
    group.throughput(Throughput::Elements((1u64 << 20) / ALLOC_SIZE as u64));

    // Fill a 1 MiB arena to the ceiling, then reset. After the first
    // iteration every cycle runs on already-committed pages.
    let mut arena = Arena::new(1 << 20, COMMIT_STEP).expect("reserve frame arena");
    group.bench_function("fill_and_reset", |b| {
        b.iter(|| {
            while let Ok(ptr) = arena.alloc(ALLOC_SIZE) {
                black_box(ptr);
            }
            arena.reset();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_alloc, bench_frame_cycle);
criterion_main!(benches);
