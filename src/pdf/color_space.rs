use std::fmt;

use lopdf::{Document, Object};

/// 画像XObjectのColorSpaceエントリを解決した結果。
///
/// 分類カウントには影響しない。画像詳細のログ出力と
/// デフォルトDecode配列の導出にのみ使用する。
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    /// ICCBasedストリーム。N（成分数）とAlternateを保持する。
    IccBased {
        components: i64,
        alternate: Option<Box<ColorSpace>>,
    },
    /// Indexed（パレット）色空間。ベース色空間とhival（最大インデックス）。
    Indexed {
        base: Box<ColorSpace>,
        hival: i64,
    },
    /// 解決しない色空間（Separation, DeviceN, Lab等）。名前のみ保持する。
    Other(String),
    /// ColorSpaceエントリ自体が無い（ImageMask等では正常）。
    Unspecified,
}

impl ColorSpace {
    /// ColorSpaceオブジェクトを解決する。
    ///
    /// 参照は辿る。名前形式（インライン画像の省略名 G/RGB/CMYK/I を含む）と
    /// 配列形式（ICCBased, Indexed）に対応する。
    pub fn from_object(doc: &Document, obj: &Object) -> Self {
        let obj = resolve(doc, obj);
        match obj {
            Object::Name(name) => Self::from_name(name),
            Object::Array(arr) => Self::from_array(doc, arr),
            _ => Self::Unspecified,
        }
    }

    fn from_name(name: &[u8]) -> Self {
        match name {
            b"DeviceGray" | b"G" => Self::DeviceGray,
            b"DeviceRGB" | b"RGB" => Self::DeviceRgb,
            b"DeviceCMYK" | b"CMYK" => Self::DeviceCmyk,
            other => Self::Other(String::from_utf8_lossy(other).into_owned()),
        }
    }

    fn from_array(doc: &Document, arr: &[Object]) -> Self {
        let Some(family) = arr.first().map(|o| resolve(doc, o)) else {
            return Self::Unspecified;
        };
        let Ok(family) = family.as_name() else {
            return Self::Unspecified;
        };

        match family {
            b"ICCBased" => {
                // [/ICCBased stream] — ストリーム辞書のNが成分数、
                // Alternateがあれば代替色空間。
                let Some(stream) = arr.get(1).map(|o| resolve(doc, o)) else {
                    return Self::Other("ICCBased".to_string());
                };
                let Ok(stream) = stream.as_stream() else {
                    return Self::Other("ICCBased".to_string());
                };
                let components = stream
                    .dict
                    .get(b"N")
                    .and_then(Object::as_i64)
                    .unwrap_or(0);
                let alternate = stream
                    .dict
                    .get(b"Alternate")
                    .ok()
                    .map(|alt| Box::new(Self::from_object(doc, alt)));
                Self::IccBased {
                    components,
                    alternate,
                }
            }
            b"Indexed" | b"I" => {
                // [/Indexed base hival lookup] — baseは再帰的に解決する。
                let base = match arr.get(1) {
                    Some(base_obj) => Self::from_object(doc, base_obj),
                    None => Self::Unspecified,
                };
                let hival = arr
                    .get(2)
                    .map(|o| resolve(doc, o))
                    .and_then(|o| o.as_i64().ok())
                    .unwrap_or(0);
                Self::Indexed {
                    base: Box::new(base),
                    hival,
                }
            }
            other => Self::Other(String::from_utf8_lossy(other).into_owned()),
        }
    }

    /// 色空間の成分数を返す。デフォルトDecode配列の長さ導出に使用する。
    /// 未解決の色空間は0。
    pub fn components(&self) -> i64 {
        match self {
            Self::DeviceGray => 1,
            Self::DeviceRgb => 3,
            Self::DeviceCmyk => 4,
            Self::IccBased { components, .. } => *components,
            // Indexedのサンプル値はパレットへのインデックス1成分
            Self::Indexed { .. } => 1,
            Self::Other(_) | Self::Unspecified => 0,
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceGray => write!(f, "DeviceGray"),
            Self::DeviceRgb => write!(f, "DeviceRGB"),
            Self::DeviceCmyk => write!(f, "DeviceCMYK"),
            Self::IccBased {
                components,
                alternate,
            } => match alternate {
                Some(alt) => write!(f, "ICCBased(N={components}, alternate={alt})"),
                None => write!(f, "ICCBased(N={components})"),
            },
            Self::Indexed { base, hival } => write!(f, "Indexed(base={base}, hival={hival})"),
            Self::Other(name) => write!(f, "{name}"),
            Self::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// 参照を辿ってオブジェクトを解決する。
///
/// 壊れた参照や循環は元のオブジェクトのまま返す（呼び出し側が
/// 型不一致として処理する）。
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    let mut current = obj;
    // 参照チェーンの循環に備えて辿る回数を制限する
    for _ in 0..16 {
        match current {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(target) => current = target,
                Err(_) => return current,
            },
            _ => return current,
        }
    }
    current
}
