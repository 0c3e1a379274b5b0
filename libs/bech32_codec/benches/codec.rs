#![allow(unused_crate_dependencies)]
use std::hint::black_box;

use bech32_codec::Variant;
use criterion::{Criterion, criterion_group, criterion_main};
use smallvec::SmallVec;

fn bench_encode(c: &mut Criterion) {
    fn bench(c: &mut Criterion, name: &str, data: &[u8]) {
        c.bench_function(name, |b| {
            b.iter(|| bech32_codec::to_string("bc", black_box(data), Variant::Bech32m))
        });
    }

    bench(c, "encode_small", &create_data::<20>());
    bench(c, "encode_large", &create_data::<2000>());
}

fn bench_decode(c: &mut Criterion) {
    fn bench(c: &mut Criterion, name: &str, data: &[u8]) {
        let data = bech32_codec::to_string("bc", data, Variant::Bech32m).expect("data is valid");

        c.bench_function(name, |b| {
            b.iter(|| {
                let mut vec = <SmallVec<[u8; 32]>>::new();
                black_box(bech32_codec::decode(&mut vec, &data)).expect("data is valid");
                vec
            })
        });
    }

    bench(c, "decode_small", &create_data::<20>());
    bench(c, "decode_large", &create_data::<2000>());
}

fn create_data<const LEN: usize>() -> [u8; LEN] {
    let mut buf = [0u8; LEN];

    #[expect(clippy::cast_possible_truncation)]
    for (index, b) in buf.iter_mut().enumerate() {
        *b = u8::MAX - index as u8;
    }

    buf
}

criterion_group!(codec, bench_encode, bench_decode);
criterion_main!(codec);
