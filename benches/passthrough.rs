//! Throughput benchmarks for the aligner.

use align_streams::align::OffsetAligner;
use align_streams::block::{InputChunk, Sample, SyncBlock, WorkContext};
use align_streams::event::StreamTag;
use align_streams::pipeline::{AlignStreams, BlockDriver};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_aligned_passthrough(c: &mut Criterion) {
    let mut group = c.benchmark_group("aligned_passthrough");

    for streams in [2usize, 4, 8] {
        let len = 4096;
        let input: Vec<Sample> = (0..len).map(|i| Sample::new(i as f32, -(i as f32))).collect();
        let mut outputs = vec![vec![Sample::default(); len]; streams];
        let mut aligner = OffsetAligner::new(streams, true).unwrap();
        aligner.start().unwrap();

        group.throughput(Throughput::Elements((len * streams) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(streams), &streams, |b, _| {
            b.iter(|| {
                let inputs = (0..streams)
                    .map(|_| InputChunk::untagged(&input, 0))
                    .collect();
                let outs = outputs.iter_mut().map(|o| &mut o[..]).collect();
                let mut ctx = WorkContext::new(inputs, outs).unwrap();
                black_box(aligner.work(&mut ctx).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_tagged_driver(c: &mut Criterion) {
    let mut group = c.benchmark_group("tagged_driver");
    let len = 64 * 1024;
    let tag_period = 1024u64;
    let samples = vec![Sample::new(1.0, 0.5); len];

    group.throughput(Throughput::Elements(2 * len as u64));
    group.bench_function("two_streams_lead_50", |b| {
        b.iter(|| {
            let mut driver = BlockDriver::new(AlignStreams::new(2, true).unwrap()).unwrap();
            driver.start().unwrap();
            for (i, lead) in [0u64, 50].into_iter().enumerate() {
                driver.push_samples(i, &samples).unwrap();
                driver.push_tag(i, StreamTag::rx_rate(0, 1e6)).unwrap();
                for offset in (0..len as u64).step_by(tag_period as usize) {
                    let nanos = ((lead + offset) * 1_000) as f64 * 1e-9;
                    driver
                        .push_tag(i, StreamTag::rx_time(offset, 100, nanos))
                        .unwrap();
                }
            }
            black_box(driver.run().unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_aligned_passthrough, bench_tagged_driver);
criterion_main!(benches);
