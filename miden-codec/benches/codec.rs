use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use miden_codec::{
    ByteReader, ByteWriter, Deserializable, Serializable, SliceReader, SliceWriter, VarInt,
    decode, encode, measure,
};

fn varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");

    // one value per encoded length, from 1 to 10 groups
    for groups in 1..=10u32 {
        let value = if groups == 10 { u64::MAX } else { (1u64 << (7 * groups)) - 1 };
        let mut buffer = [0u8; 10];

        group.bench_with_input(BenchmarkId::new("encode", groups), &value, |b, value| {
            b.iter(|| {
                let mut writer = SliceWriter::new(&mut buffer);
                writer.write_varint(black_box(*value)).unwrap();
            });
        });

        SliceWriter::new(&mut buffer).write_varint(value).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", groups), &buffer, |b, buffer| {
            b.iter(|| SliceReader::new(black_box(buffer)).read_varint::<u64>().unwrap());
        });
    }

    group.finish();
}

fn sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequences");

    for len in [16usize, 1024, 65536] {
        let values: Vec<u64> = (0..len as u64).collect();
        let size = measure(&values).unwrap();
        let mut buffer = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("encode Vec<u64>", len), &values, |b, values| {
            b.iter(|| encode(black_box(values), &mut buffer).unwrap());
        });

        let bytes = values.to_bytes().unwrap();
        group.bench_with_input(BenchmarkId::new("decode Vec<u64>", len), &bytes, |b, bytes| {
            b.iter(|| decode::<Vec<u64>>(black_box(bytes)).unwrap());
        });

        let varints: Vec<VarInt<u64>> = values.iter().copied().map(VarInt).collect();
        let bytes = varints.to_bytes().unwrap();
        group.bench_with_input(
            BenchmarkId::new("decode Vec<VarInt<u64>>", len),
            &bytes,
            |b, bytes| {
                b.iter(|| Vec::<VarInt<u64>>::read_from_bytes(black_box(bytes)).unwrap());
            },
        );
    }

    group.finish();
}

fn strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");

    for len in [8usize, 256, 4096] {
        let value = "x".repeat(len);
        let bytes = value.to_bytes().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("measure", len), &value, |b, value| {
            b.iter(|| measure(black_box(value)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode", len), &bytes, |b, bytes| {
            b.iter(|| String::read_from_bytes(black_box(bytes)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(codec_group, varint, sequences, strings);
criterion_main!(codec_group);
