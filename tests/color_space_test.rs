// 色空間解決とDecode配列導出のテスト

use pdf_image_census::pdf::color_space::ColorSpace;
use pdf_image_census::pdf::image_xobject::decode_values;

use lopdf::{Document, Object, Stream, dictionary};

// ============================================================
// 1. 名前形式の色空間
// ============================================================

#[test]
fn test_device_color_space_names() {
    let doc = Document::new();
    assert_eq!(
        ColorSpace::from_object(&doc, &Object::Name(b"DeviceRGB".to_vec())),
        ColorSpace::DeviceRgb
    );
    assert_eq!(
        ColorSpace::from_object(&doc, &Object::Name(b"DeviceGray".to_vec())),
        ColorSpace::DeviceGray
    );
    assert_eq!(
        ColorSpace::from_object(&doc, &Object::Name(b"DeviceCMYK".to_vec())),
        ColorSpace::DeviceCmyk
    );
}

#[test]
fn test_inline_abbreviated_names() {
    let doc = Document::new();
    assert_eq!(
        ColorSpace::from_object(&doc, &Object::Name(b"RGB".to_vec())),
        ColorSpace::DeviceRgb
    );
    assert_eq!(
        ColorSpace::from_object(&doc, &Object::Name(b"G".to_vec())),
        ColorSpace::DeviceGray
    );
    assert_eq!(
        ColorSpace::from_object(&doc, &Object::Name(b"CMYK".to_vec())),
        ColorSpace::DeviceCmyk
    );
}

#[test]
fn test_unknown_name_is_other() {
    let doc = Document::new();
    let cs = ColorSpace::from_object(&doc, &Object::Name(b"Pattern".to_vec()));
    assert_eq!(cs, ColorSpace::Other("Pattern".to_string()));
    assert_eq!(cs.components(), 0);
}

// ============================================================
// 2. ICCBased
// ============================================================

#[test]
fn test_icc_based_with_alternate() {
    let mut doc = Document::new();
    let icc_stream = Stream::new(
        dictionary! {
            "N" => 3,
            "Alternate" => "DeviceRGB",
        },
        vec![0u8; 8],
    );
    let stream_id = doc.add_object(Object::Stream(icc_stream));
    let cs_array = Object::Array(vec![
        Object::Name(b"ICCBased".to_vec()),
        Object::Reference(stream_id),
    ]);

    let cs = ColorSpace::from_object(&doc, &cs_array);
    assert_eq!(
        cs,
        ColorSpace::IccBased {
            components: 3,
            alternate: Some(Box::new(ColorSpace::DeviceRgb)),
        }
    );
    assert_eq!(cs.components(), 3);
}

#[test]
fn test_icc_based_without_alternate() {
    let mut doc = Document::new();
    let icc_stream = Stream::new(dictionary! { "N" => 4 }, vec![0u8; 8]);
    let stream_id = doc.add_object(Object::Stream(icc_stream));
    let cs_array = Object::Array(vec![
        Object::Name(b"ICCBased".to_vec()),
        Object::Reference(stream_id),
    ]);

    let cs = ColorSpace::from_object(&doc, &cs_array);
    assert_eq!(
        cs,
        ColorSpace::IccBased {
            components: 4,
            alternate: None,
        }
    );
    assert_eq!(cs.components(), 4);
}

// ============================================================
// 3. Indexed
// ============================================================

#[test]
fn test_indexed_with_named_base() {
    let doc = Document::new();
    let cs_array = Object::Array(vec![
        Object::Name(b"Indexed".to_vec()),
        Object::Name(b"DeviceRGB".to_vec()),
        255.into(),
        Object::String(vec![0u8; 768], lopdf::StringFormat::Hexadecimal),
    ]);

    let cs = ColorSpace::from_object(&doc, &cs_array);
    assert_eq!(
        cs,
        ColorSpace::Indexed {
            base: Box::new(ColorSpace::DeviceRgb),
            hival: 255,
        }
    );
    // Indexedのサンプルはパレットインデックス1成分
    assert_eq!(cs.components(), 1);
}

#[test]
fn test_indexed_with_array_base() {
    // ベース色空間が配列（ICCBased）のIndexed
    let mut doc = Document::new();
    let icc_stream = Stream::new(dictionary! { "N" => 3 }, vec![0u8; 8]);
    let stream_id = doc.add_object(Object::Stream(icc_stream));
    let base = Object::Array(vec![
        Object::Name(b"ICCBased".to_vec()),
        Object::Reference(stream_id),
    ]);
    let cs_array = Object::Array(vec![Object::Name(b"I".to_vec()), base, 15.into()]);

    let cs = ColorSpace::from_object(&doc, &cs_array);
    match cs {
        ColorSpace::Indexed { base, hival } => {
            assert_eq!(hival, 15);
            assert_eq!(
                *base,
                ColorSpace::IccBased {
                    components: 3,
                    alternate: None,
                }
            );
        }
        other => panic!("expected Indexed, got {other:?}"),
    }
}

// ============================================================
// 4. Decode配列
// ============================================================

#[test]
fn test_explicit_decode_array_is_used() {
    let doc = Document::new();
    let dict = dictionary! {
        "Decode" => vec![1.into(), 0.into()],
    };
    let decode = decode_values(&doc, &dict, &ColorSpace::DeviceGray, 8);
    assert_eq!(decode, Some(vec![1.0, 0.0]));
}

#[test]
fn test_default_decode_for_device_spaces() {
    let doc = Document::new();
    let dict = lopdf::Dictionary::new();
    assert_eq!(
        decode_values(&doc, &dict, &ColorSpace::DeviceGray, 8),
        Some(vec![0.0, 1.0])
    );
    assert_eq!(
        decode_values(&doc, &dict, &ColorSpace::DeviceRgb, 8),
        Some(vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0])
    );
    assert_eq!(
        decode_values(&doc, &dict, &ColorSpace::DeviceCmyk, 8),
        Some(vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0])
    );
}

#[test]
fn test_default_decode_for_indexed_uses_bits() {
    // Indexedのデフォルト上限は 2^bits - 1
    let doc = Document::new();
    let dict = lopdf::Dictionary::new();
    let cs = ColorSpace::Indexed {
        base: Box::new(ColorSpace::DeviceRgb),
        hival: 255,
    };
    assert_eq!(decode_values(&doc, &dict, &cs, 4), Some(vec![0.0, 15.0]));
    assert_eq!(decode_values(&doc, &dict, &cs, 8), Some(vec![0.0, 255.0]));
}

#[test]
fn test_no_default_decode_for_unresolved_space() {
    let doc = Document::new();
    let dict = lopdf::Dictionary::new();
    assert_eq!(
        decode_values(&doc, &dict, &ColorSpace::Other("Lab".to_string()), 8),
        None
    );
    assert_eq!(decode_values(&doc, &dict, &ColorSpace::Unspecified, 8), None);
}
