// 画像XObject/インライン画像の辞書検査: マスク種別の分類とメタデータ読み取り

use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object};

use crate::pdf::color_space::{ColorSpace, resolve};

/// 画像辞書の分類結果。
///
/// 分類は排他的で、整形された画像辞書に対しては必ずいずれか1つに決まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// マスクを持たない、固有色の画像。
    Colored,
    /// 1-bitステンシルマスク（ImageMask/IM が true）。
    ImageMask,
    /// 画像でマスクされた画像（SMaskエントリ、またはStream値のMaskエントリ）。
    MaskedByImage,
    /// 色範囲でマスクされた画像（Array値のMaskエントリ）。
    MaskedByColor,
    /// MaskエントリがStreamでもArrayでもない。分類不能、カウント対象外。
    MalformedMask,
}

/// 画像辞書を分類する。
///
/// 固定の優先順位で判定し、最初に合致したものが結果となる:
/// 1. ImageMask（またはインライン省略形のIM）がtrue → ImageMask
/// 2. SMaskエントリあり → MaskedByImage
/// 3. Maskエントリあり → Stream値ならMaskedByImage、Array値ならMaskedByColor、
///    それ以外はMalformedMask
/// 4. いずれも無し → Colored
///
/// キーの不在は各段階で正常な条件であり、エラーではない。
pub fn classify_image(doc: &Document, dict: &Dictionary) -> ImageKind {
    if stencil_mask_flag(dict) {
        return ImageKind::ImageMask;
    }

    // アルファ画像でマスクされた画像はSMaskエントリを持つ。
    // SMaskの値は整形済みPDFなら画像XObjectのはず。値の型は確認しない。
    if dict.get(b"SMask").is_ok() {
        return ImageKind::MaskedByImage;
    }

    // 画像または色範囲でマスクされた画像はMaskエントリを持つ。
    // Stream値なら画像マスク、Array値なら色範囲マスク。
    if let Ok(mask) = dict.get(b"Mask") {
        return match resolve(doc, mask) {
            Object::Stream(_) => ImageKind::MaskedByImage,
            Object::Array(_) => ImageKind::MaskedByColor,
            _ => ImageKind::MalformedMask,
        };
    }

    ImageKind::Colored
}

/// ImageMask（またはIM）のbool値を読む。
///
/// ImageMaskがbool値として存在すればその値で確定する。falseでも
/// IMは確認しない（同じキーの別綴りにすぎないため）。
fn stencil_mask_flag(dict: &Dictionary) -> bool {
    for key in [&b"ImageMask"[..], &b"IM"[..]] {
        if let Ok(value) = dict.get(key)
            && let Ok(flag) = value.as_bool()
        {
            return flag;
        }
    }
    false
}

/// 画像XObjectのメタデータ。詳細ログと書き出しファイル名の決定に使用する。
#[derive(Debug, Clone)]
pub struct ImageMeta {
    pub width: i64,
    pub height: i64,
    pub bits_per_component: i64,
    pub color_space: ColorSpace,
    pub filter: Option<String>,
}

impl ImageMeta {
    /// 画像のストリーム辞書（またはインライン画像辞書）からメタデータを読み取る。
    pub fn from_dict(doc: &Document, dict: &Dictionary) -> crate::error::Result<Self> {
        let width = dict_get_i64(doc, dict, &[&b"Width"[..], &b"W"[..]]).ok_or_else(|| {
            crate::error::PdfCensusError::image_xobject("image has no Width entry")
        })?;
        let height = dict_get_i64(doc, dict, &[&b"Height"[..], &b"H"[..]]).ok_or_else(|| {
            crate::error::PdfCensusError::image_xobject("image has no Height entry")
        })?;
        // BitsPerComponent不在時のデフォルトは8（ImageMaskでは1）
        let default_bits = if stencil_mask_flag(dict) { 1 } else { 8 };
        let bits_per_component = dict_get_i64(doc, dict, &[&b"BitsPerComponent"[..], &b"BPC"[..]])
            .unwrap_or(default_bits);

        let color_space = match dict.get(b"ColorSpace").or_else(|_| dict.get(b"CS")) {
            Ok(obj) => ColorSpace::from_object(doc, obj),
            Err(_) => ColorSpace::Unspecified,
        };

        let filter = first_filter(doc, dict);

        Ok(Self {
            width,
            height,
            bits_per_component,
            color_space,
            filter,
        })
    }
}

/// 辞書から整数値を読む。省略名キーにも対応し、参照は辿る。
fn dict_get_i64(doc: &Document, dict: &Dictionary, keys: &[&[u8]]) -> Option<i64> {
    for key in keys {
        if let Ok(obj) = dict.get(key)
            && let Ok(value) = resolve(doc, obj).as_i64()
        {
            return Some(value);
        }
    }
    None
}

/// Filterエントリの先頭フィルタ名を返す。
///
/// フィルタ連鎖（Array）の場合は最初のフィルタを取得する。
fn first_filter(doc: &Document, dict: &Dictionary) -> Option<String> {
    let obj = dict.get(b"Filter").or_else(|_| dict.get(b"F")).ok()?;
    match resolve(doc, obj) {
        Object::Name(name) => Some(String::from_utf8_lossy(name).to_string()),
        Object::Array(arr) => arr.first().and_then(|obj| {
            if let Object::Name(name) = resolve(doc, obj) {
                Some(String::from_utf8_lossy(name).to_string())
            } else {
                None
            }
        }),
        _ => None,
    }
}

/// 画像辞書のDecode配列を返す。
///
/// Decodeエントリがあればその値を、無ければ色空間モデルと
/// BitsPerComponentから導出したデフォルト値を返す。
/// 未解決の色空間ではデフォルトを導出できないためNone。
pub fn decode_values(
    doc: &Document,
    dict: &Dictionary,
    color_space: &ColorSpace,
    bits_per_component: i64,
) -> Option<Vec<f64>> {
    if let Ok(obj) = dict.get(b"Decode").or_else(|_| dict.get(b"D"))
        && let Object::Array(arr) = resolve(doc, obj)
    {
        let values: Vec<f64> = arr
            .iter()
            .filter_map(|o| match resolve(doc, o) {
                Object::Integer(i) => Some(*i as f64),
                Object::Real(r) => Some(*r as f64),
                _ => None,
            })
            .collect();
        return Some(values);
    }

    match color_space {
        // Indexedのデフォルト上限はパレットインデックスの最大値 2^bits - 1
        ColorSpace::Indexed { .. } => {
            let high = f64::from(2u32.pow(bits_per_component.clamp(0, 16) as u32)) - 1.0;
            Some(vec![0.0, high])
        }
        _ => {
            let n = color_space.components();
            if n <= 0 {
                return None;
            }
            let mut values = Vec::with_capacity(n as usize * 2);
            for _ in 0..n {
                values.push(0.0);
                values.push(1.0);
            }
            Some(values)
        }
    }
}

/// 画像XObjectのストリームデータをファイルへ書き出す。
///
/// ファイル名は page{page}_im{index}.{ext}。拡張子はフィルタから決める:
/// DCTDecodeはjpg、JPXDecodeはjp2、それ以外は展開済みデータをbinとして書く。
/// 戻り値は書き出したファイルのパス。
pub fn export_image_data(
    stream: &lopdf::Stream,
    meta: &ImageMeta,
    dir: &Path,
    page_num: u32,
    index: u32,
) -> crate::error::Result<PathBuf> {
    let (ext, data) = match meta.filter.as_deref() {
        Some("DCTDecode") => ("jpg", stream.content.clone()),
        Some("JPXDecode") => ("jp2", stream.content.clone()),
        _ => (
            "bin",
            stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
        ),
    };

    let path = dir.join(format!("page{page_num}_im{index}.{ext}"));
    std::fs::write(&path, data)?;
    Ok(path)
}
