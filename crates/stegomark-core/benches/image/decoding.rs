use criterion::{criterion_group, criterion_main, Criterion};
use stegomark_core::{api, CoverImage, Registry};

fn carrier_image() -> CoverImage {
    let buffer = (0..512u32 * 512 * 3).map(|i| (i % 251) as u8).collect();
    CoverImage::new(512, 512, 3, buffer).expect("Cannot create carrier image")
}

pub fn image_decoding(c: &mut Criterion) {
    let registry = Registry::with_defaults();
    let stego = api::prepare(&registry)
        .embed(Some(&carrier_image()), "message.txt", "Hello World!".repeat(100).as_bytes())
        .expect("Cannot hide secret message");

    c.bench_function("Image Decoding", |b| {
        let engine = api::prepare(&registry);

        b.iter(|| engine.extract(&stego).expect("Cannot unveil secret message"))
    });
}

criterion_group!(benches, image_decoding);
criterion_main!(benches);
