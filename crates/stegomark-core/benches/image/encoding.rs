use criterion::{criterion_group, criterion_main, Criterion};
use stegomark_core::{api, CoverImage, Registry, StegoConfig};

fn carrier_image() -> CoverImage {
    let buffer = (0..512u32 * 512 * 3).map(|i| (i % 251) as u8).collect();
    CoverImage::new(512, 512, 3, buffer).expect("Cannot create carrier image")
}

pub fn image_encoding(c: &mut Criterion) {
    let registry = Registry::with_defaults();
    let cover = carrier_image();
    let secret_message = "Hello World!".repeat(100);

    c.bench_function("Image Encoding", |b| {
        let engine = api::prepare(&registry).with_config(
            StegoConfig::builder()
                .use_compression(false)
                .build()
                .expect("Cannot build config"),
        );

        b.iter(|| {
            engine
                .embed(Some(&cover), "message.txt", secret_message.as_bytes())
                .expect("Cannot hide secret message")
        })
    });
}

criterion_group!(benches, image_encoding);
criterion_main!(benches);
