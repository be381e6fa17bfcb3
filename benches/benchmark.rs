use criterion::{Criterion, criterion_group, criterion_main};
use filemap::{Arena, MappedFile, get_file_size, round_up_to_multiple};
use std::hint::black_box;

const FILE_SIZE: usize = 1 << 20;

fn open_close_benchmark(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.bin");
    std::fs::write(&path, vec![0u8; FILE_SIZE]).unwrap();
    let path = path.to_str().unwrap();

    c.bench_function("filemap:open_close", |b| {
        b.iter(|| {
            let mut file = MappedFile::new();
            assert!(file.open(black_box(path)));
            file.close();
        });
    });
    c.bench_function("filemap:get_file_size", |b| {
        b.iter(|| get_file_size(black_box(path)))
    });
    c.bench_function("std:metadata_len", |b| {
        b.iter(|| std::fs::metadata(black_box(path)).unwrap().len())
    });
}

fn access_benchmark(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.bin");
    std::fs::write(&path, vec![0u8; FILE_SIZE]).unwrap();
    let mut file = MappedFile::from_path(path.to_str().unwrap()).unwrap();
    let block = [0xa5u8; 4096];

    c.bench_function("filemap:write_blocks", |b| {
        b.iter(|| {
            for offset in (0..FILE_SIZE as u64).step_by(block.len()) {
                file.write(black_box(&block), offset).unwrap();
            }
        })
    });
    c.bench_function("filemap:round_up", |b| {
        b.iter(|| round_up_to_multiple(black_box(4097), black_box(4096)))
    });
}

criterion_group!(benches, open_close_benchmark, access_benchmark);
criterion_main!(benches);
