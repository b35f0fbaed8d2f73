use stegomark_core::media::diff_images;
use stegomark_core::media::image::LsbCodec;
use stegomark_core::{api, CoverImage, EncryptionAlgorithm, Registry, StegoConfig, StegoError};

const HELLO: &[u8] = b"HELLOWRLD";

fn carrier_image(width: u32, height: u32) -> CoverImage {
    let buffer = (0..width * height * 3)
        .map(|i| (((i * 7) % 160) + 40) as u8)
        .collect();
    CoverImage::new(width, height, 3, buffer).expect("Cannot create carrier image")
}

fn plain_config(max_bits: u8) -> StegoConfig {
    StegoConfig::builder()
        .use_compression(false)
        .with_max_bits_per_channel(max_bits)
        .build()
        .expect("Cannot build config")
}

#[test]
fn should_hide_and_extract_hello_world() {
    let registry = Registry::with_defaults();
    let cover = carrier_image(100, 100);

    let stego = api::prepare(&registry)
        .embed(Some(&cover), "hello.txt", HELLO)
        .expect("Cannot hide message");
    let extracted = api::prepare(&registry)
        .extract(&stego)
        .expect("Cannot extract message");

    assert_eq!(extracted.file_name, "hello.txt");
    assert_eq!(extracted.data, HELLO);
}

#[test]
fn should_hide_and_extract_with_every_bit_depth() {
    let registry = Registry::with_defaults();
    let cover = carrier_image(100, 100);

    for bits in 1..=8 {
        let stego = api::prepare(&registry)
            .with_config(plain_config(bits))
            .embed(Some(&cover), "", HELLO)
            .expect("Cannot hide message");

        // extraction needs no bit depth, the header carries it
        let extracted = api::prepare(&registry).extract(&stego).unwrap();
        assert_eq!(extracted.data, HELLO, "bits {bits}");
        assert_eq!(LsbCodec::read_header(&stego).unwrap().channel_bits_used, bits);
    }
}

#[test]
fn should_hide_and_extract_encrypted_with_every_algorithm() {
    let registry = Registry::with_defaults();
    let cover = carrier_image(100, 100);

    for algorithm in EncryptionAlgorithm::ALL {
        let config = StegoConfig::builder()
            .use_encryption(true)
            .with_password("Secret42")
            .with_encryption_algorithm(algorithm)
            .build()
            .unwrap();
        let stego = api::prepare(&registry)
            .with_config(config.clone())
            .embed(Some(&cover), "secret.bin", HELLO)
            .unwrap();

        let extracted = api::prepare(&registry).with_config(config).extract(&stego).unwrap();
        assert_eq!(extracted.data, HELLO, "{algorithm}");
        assert_eq!(
            LsbCodec::read_header(&stego).unwrap().encryption,
            Some(algorithm)
        );
    }
}

#[test]
fn should_accept_an_empty_payload() {
    let registry = Registry::with_defaults();
    let stego = api::prepare(&registry)
        .embed(Some(&carrier_image(20, 20)), "empty", b"")
        .unwrap();

    let extracted = api::prepare(&registry).extract(&stego).unwrap();
    assert!(extracted.data.is_empty());
    assert_eq!(extracted.file_name_or("untitled"), "empty");
}

#[test]
fn should_fill_the_image_exactly_but_not_beyond() {
    let registry = Registry::with_defaults();
    // 4x4x3 samples at 4 bits make 192 bits, the header without file name takes 14 bytes
    let cover = carrier_image(4, 4);
    let engine = api::prepare(&registry).with_config(plain_config(4));

    let stego = engine
        .embed(Some(&cover), "", &[0xa5; 10])
        .expect("Exactly full capacity must fit");
    assert_eq!(engine.extract(&stego).unwrap().data, [0xa5; 10]);

    let result = engine.embed(Some(&cover), "", &[0xa5; 11]);
    assert!(matches!(
        result,
        Err(StegoError::ImageSizeInsufficient {
            required: 200,
            available: 192
        })
    ));
}

#[test]
fn should_only_touch_the_configured_bit_planes() {
    let registry = Registry::with_defaults();
    let cover = carrier_image(30, 30);
    let stego = api::prepare(&registry)
        .with_config(plain_config(2))
        .embed(Some(&cover), "note", HELLO)
        .unwrap();

    for (a, b) in cover.as_bytes().iter().zip(stego.as_bytes()) {
        assert_eq!(a & 0b1111_1100, b & 0b1111_1100);
    }
}

#[test]
fn should_ignore_changes_outside_of_the_used_bit_planes() {
    let registry = Registry::with_defaults();
    let mut stego = api::prepare(&registry)
        .with_config(plain_config(1))
        .embed(Some(&carrier_image(30, 30)), "note", HELLO)
        .unwrap();

    for sample in stego.as_bytes_mut() {
        *sample ^= 0b1000_0000;
    }

    assert_eq!(api::prepare(&registry).extract(&stego).unwrap().data, HELLO);
}

#[test]
fn should_detect_a_damaged_magic_stamp() {
    let registry = Registry::with_defaults();
    let mut stego = api::prepare(&registry)
        .embed(Some(&carrier_image(30, 30)), "note", HELLO)
        .unwrap();

    // the first header bit lives in the lowest bit of the first sample
    stego.as_bytes_mut()[0] ^= 1;

    assert!(matches!(
        LsbCodec::read_header(&stego),
        Err(StegoError::InvalidStegoHeader)
    ));
    assert!(matches!(
        api::prepare(&registry).with_algorithm("LSB").extract(&stego),
        Err(StegoError::InvalidStegoHeader)
    ));
}

#[test]
fn should_refuse_the_wrong_password() {
    let registry = Registry::with_defaults();
    let config = StegoConfig::builder()
        .use_encryption(true)
        .with_password("Secret42")
        .build()
        .unwrap();
    let stego = api::prepare(&registry)
        .with_config(config)
        .embed(Some(&carrier_image(50, 50)), "", HELLO)
        .unwrap();

    for wrong in ["Secret43", "secret42", "Secret42 "] {
        let result = api::prepare(&registry)
            .with_config(StegoConfig::builder().with_password(wrong).build().unwrap())
            .extract(&stego);
        assert!(matches!(result, Err(StegoError::InvalidPassword)), "{wrong}");
    }
}

#[test]
fn should_produce_identical_stego_images_for_identical_input() {
    let registry = Registry::with_defaults();
    let cover = carrier_image(50, 50);
    let config = StegoConfig::builder()
        .use_encryption(true)
        .with_password("Secret42")
        .build()
        .unwrap();
    let engine = api::prepare(&registry).with_config(config);

    let first = engine.embed(Some(&cover), "a", HELLO).unwrap();
    let second = engine.embed(Some(&cover), "a", HELLO).unwrap();

    assert_eq!(first, second);
}

#[test]
fn should_survive_png_encoding() {
    let registry = Registry::with_defaults();
    let stego = api::prepare(&registry)
        .embed(Some(&carrier_image(40, 40)), "hello.txt", HELLO)
        .unwrap();

    let bytes = stego.encode("png").unwrap();
    let decoded = CoverImage::decode(&bytes, Some("png")).unwrap();

    assert_eq!(api::prepare(&registry).extract(&decoded).unwrap().data, HELLO);
}

#[test]
fn should_show_the_changes_in_the_diff() {
    let registry = Registry::with_defaults();
    let cover = carrier_image(40, 40);
    let stego = api::prepare(&registry)
        .embed(Some(&cover), "hello.txt", HELLO)
        .unwrap();

    let same = diff_images(&stego, &stego).unwrap();
    assert!(same.as_bytes().iter().all(|d| *d == 0));

    let diff = diff_images(&stego, &cover).unwrap();
    assert!(diff.as_bytes().iter().any(|d| *d == 255));
    for ((d, a), b) in diff.as_bytes().iter().zip(stego.as_bytes()).zip(cover.as_bytes()) {
        assert_eq!(*d == 0, a == b);
    }
}
