use stegomark_core::watermark::{check_mark, embed_mark, Signature, WatermarkOptions};
use stegomark_core::{api, CoverImage, Registry, StegoConfig, StegoError};

/// a soft diagonal gradient with some deterministic texture
fn photo_like_image(width: u32, height: u32) -> CoverImage {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut buffer = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let base = 60 + (x + y) * 80 / (width + height);
            buffer.extend([base + 20, base + 10, base].map(|v| (v + rng.u32(0..10)) as u8));
        }
    }
    CoverImage::new(width, height, 3, buffer).expect("Cannot create image")
}

#[test]
fn should_tell_marked_from_unmarked_images() {
    let options = WatermarkOptions::default();
    let signature = Signature::generate("alice");
    let cover = photo_like_image(160, 120);

    let marked = embed_mark(&cover, &signature, &options).unwrap();

    let marked_score = check_mark(&marked, &signature, &options).unwrap();
    let unmarked_score = check_mark(&cover, &signature, &options).unwrap();
    let foreign_score = check_mark(&marked, &Signature::generate("bob"), &options).unwrap();

    assert!(marked_score > 0.5, "marked {marked_score}");
    assert!(
        marked_score > unmarked_score + 0.3,
        "marked {marked_score}, unmarked {unmarked_score}"
    );
    assert!(
        marked_score > foreign_score + 0.3,
        "marked {marked_score}, foreign {foreign_score}"
    );
    for score in [marked_score, unmarked_score, foreign_score] {
        assert!((-1.0..=1.0).contains(&score));
    }
}

#[test]
fn should_keep_the_mark_through_png_encoding() {
    let options = WatermarkOptions::default();
    let signature = Signature::generate("alice");
    let marked = embed_mark(&photo_like_image(96, 96), &signature, &options).unwrap();

    let decoded = CoverImage::decode(&marked.encode("png").unwrap(), None).unwrap();

    assert_eq!(decoded, marked);
    assert!(check_mark(&decoded, &signature, &options).unwrap() > 0.5);
}

#[test]
fn should_keep_the_signature_through_its_file_format() {
    let registry = Registry::with_defaults();
    let engine = api::prepare(&registry)
        .with_config(StegoConfig::builder().with_password("alice").build().unwrap());

    let signature = engine.generate_signature().unwrap();
    let restored = Signature::from_bytes(&signature.to_bytes().unwrap()).unwrap();
    let marked = engine
        .embed_mark(Some(&photo_like_image(64, 64)), Some(&restored))
        .unwrap();

    assert!(engine.check_mark(&marked, &signature).unwrap() > 0.5);
}

#[test]
fn should_need_a_password_for_a_signature() {
    let registry = Registry::with_defaults();

    assert!(matches!(
        api::prepare(&registry).generate_signature(),
        Err(StegoError::MissingPassword)
    ));
}

#[test]
fn should_refuse_tiny_images() {
    let tiny = CoverImage::new(3, 3, 3, vec![100; 27]).unwrap();

    assert!(matches!(
        embed_mark(&tiny, &Signature::generate("alice"), &WatermarkOptions::default()),
        Err(StegoError::ImageTooSmallForWatermark)
    ));
}
