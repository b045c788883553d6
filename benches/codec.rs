use bytes::Bytes;
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use lxpalette::{Palette, PaletteCommand, Rgb12, SlotIndex, SlotStatus, decode, encode};

fn query_response() -> Vec<u8> {
    let slot = SlotIndex::new(4).unwrap();
    let mut palette = Palette::new(slot, SlotStatus::UserLoaded);
    palette.track_btn = [[Rgb12::new(4095, 2048, 17); 3]; 4];

    let mut frame = vec![0xF0, 0x77, 0x01, 0x41, 0x02, 0x01];
    frame.extend(palette.to_payload().unwrap());
    frame.push(0xF7);
    frame
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let mut payload = vec![0x02, 0x03, 0x01, 0x02];
    payload.extend_from_slice(&Rgb12::new(4095, 0, 2048).encode().unwrap());
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("encode_set_rgb", |b| {
        b.iter(|| {
            black_box(encode(PaletteCommand::SetRgb, black_box(&payload)).unwrap());
        });
    });

    let color = Rgb12::new(1234, 567, 4095);
    group.bench_function("encode_color", |b| {
        b.iter(|| {
            black_box(black_box(color).encode().unwrap());
        });
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let frame = Bytes::from(query_response());
    group.throughput(Throughput::Bytes(frame.len() as u64));
    group.bench_function("decode_query_frame", |b| {
        b.iter(|| {
            black_box(decode(frame.clone(), PaletteCommand::Query).unwrap());
        });
    });

    let data = decode(frame.clone(), PaletteCommand::Query)
        .unwrap()
        .into_result()
        .unwrap();
    group.bench_function("parse_palette", |b| {
        b.iter(|| {
            black_box(Palette::from_payload(black_box(&data)).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
