//! Benchmark for beatmap document decoding.

use criterion::{Criterion, Throughput};
use osumap_rs::{decode, encode};

struct BeatmapFile {
    name: String,
    source: String,
}

fn scan_fixture_files() -> Vec<BeatmapFile> {
    let dir = "tests/files";

    std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.to_string_lossy().ends_with(".osu"))
        .filter_map(|path| {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(String::from)?;

            let source = std::fs::read_to_string(&path).expect("Failed to load fixture");

            Some(BeatmapFile { name, source })
        })
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let files = scan_fixture_files();
    let mut group = c.benchmark_group("decode_beatmap");

    for file in files.iter() {
        group.throughput(Throughput::Bytes(file.source.len() as u64));
        group.bench_function(&file.name, |b| {
            b.iter(|| decode(std::hint::black_box(&file.source)));
        });
    }

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let files = scan_fixture_files();
    let mut group = c.benchmark_group("encode_beatmap");

    for file in files.iter() {
        let beatmap = decode(&file.source).expect("fixture must decode");
        group.bench_function(&file.name, |b| {
            b.iter(|| encode(std::hint::black_box(&beatmap)));
        });
    }

    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_decode(&mut criterion);
    bench_round_trip(&mut criterion);
}
