use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ScanOptions;
use crate::pdf::image_xobject::{
    ImageKind, ImageMeta, classify_image, decode_values, export_image_data,
};
use crate::pdf::reader::PdfReader;

/// 1ページ分の画像分類カウンタ。
///
/// ページスキャン開始時にゼロで生成し、そのページのスキャン中にのみ
/// 加算される。整形された画像1つにつき必ずいずれか1つだけ増える。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageCounts {
    /// マスクを持たない固有色の画像数
    pub colored: u32,
    /// 1-bitステンシルマスク数
    pub image_masks: u32,
    /// 画像でマスクされた画像数（SMaskまたはStream値のMask）
    pub masked_by_image: u32,
    /// 色範囲でマスクされた画像数（Array値のMask）
    pub masked_by_color: u32,
}

impl PageCounts {
    /// 分類済み画像の合計を返す。
    pub fn total(&self) -> u32 {
        self.colored + self.image_masks + self.masked_by_image + self.masked_by_color
    }

    /// 全カウンタがゼロかどうか。
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// 1ページのコンテンツストリームを走査し、画像を分類してカウントする。
///
/// Doオペレータ（XObject呼び出し）とインライン画像だけを拾い、
/// 他のオペレータは無視する。オペレータ単位のエラーはすべてログに
/// 記録してスキップし、走査は継続する。
pub struct ContentScanner<'a> {
    reader: &'a PdfReader,
    options: &'a ScanOptions,
    page_num: u32,
    counts: PageCounts,
    malformed_masks: u32,
    images_seen: u32,
}

impl<'a> ContentScanner<'a> {
    pub fn new(reader: &'a PdfReader, options: &'a ScanOptions, page_num: u32) -> Self {
        Self {
            reader,
            options,
            page_num,
            counts: PageCounts::default(),
            malformed_masks: 0,
            images_seen: 0,
        }
    }

    /// 現在のカウンタを返す。
    pub fn counts(&self) -> PageCounts {
        self.counts
    }

    /// MaskエントリがStreamでもArrayでもなかった画像数を返す。
    /// どの分類カウンタにも含まれない。
    pub fn malformed_masks(&self) -> u32 {
        self.malformed_masks
    }

    /// コンテンツストリームのバイト列を走査する。
    ///
    /// 空バイト列は正常（画像なし）。トークナイザがストリームを最後まで
    /// 消費できない場合はエラーを返すが、それまでに加算したカウントは残る。
    pub fn scan_bytes(&mut self, content_bytes: &[u8]) -> crate::error::Result<()> {
        if content_bytes.is_empty() {
            return Ok(());
        }

        let content = Content::decode(content_bytes)
            .map_err(|e| crate::error::PdfCensusError::content_stream(e.to_string()))?;
        self.scan_operations(&content.operations);
        Ok(())
    }

    /// デコード済みオペレータ列を走査する。
    pub fn scan_operations(&mut self, operations: &[Operation]) {
        for op in operations {
            match op.operator.as_str() {
                "Do" => self.op_do(&op.operands),
                // インライン画像はトークナイザがBI〜EIを1オペレーションに
                // まとめる。どちらのオペレータ名に載るかは問わない。
                "BI" | "EI" => self.op_inline_image(&op.operands),
                _ => {}
            }
        }
    }

    /// Doオペレータ: 名前オペランドをXObjectリソースに解決し、
    /// Subtype=Imageなら分類する。
    ///
    /// フォームやパターンの内部にある画像は辿らない。数えるのは
    /// ページ直下で呼び出される画像XObjectのみ。
    fn op_do(&mut self, operands: &[Object]) {
        let reader = self.reader;
        let page_num = self.page_num;

        let name = match operands.first().map(Object::as_name) {
            Some(Ok(name)) => name,
            _ => {
                warn!("page {page_num}: Do operand is not a name");
                return;
            }
        };

        let stream = match reader.xobject_stream(page_num, name) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("page {page_num}: {e}");
                return;
            }
        };

        let subtype = match stream.dict.get(b"Subtype").and_then(Object::as_name) {
            Ok(subtype) => subtype,
            Err(_) => {
                warn!(
                    "page {page_num}: XObject '{}' has no Subtype name",
                    String::from_utf8_lossy(name)
                );
                return;
            }
        };

        if subtype != b"Image" {
            // FormなどImage以外のXObjectは対象外
            debug!(
                "page {page_num}: ignoring {} XObject '{}'",
                String::from_utf8_lossy(subtype),
                String::from_utf8_lossy(name)
            );
            return;
        }

        self.record(classify_image(reader.document(), &stream.dict));
        self.log_image_detail(name, &stream.dict);

        if let Some(dir) = &self.options.extract_dir {
            match ImageMeta::from_dict(reader.document(), &stream.dict) {
                Ok(meta) => {
                    if let Err(e) =
                        export_image_data(stream, &meta, dir, page_num, self.images_seen)
                    {
                        warn!(
                            "page {page_num}: could not export image '{}': {e}",
                            String::from_utf8_lossy(name)
                        );
                    }
                }
                Err(e) => {
                    warn!(
                        "page {page_num}: could not read metadata of image '{}': {e}",
                        String::from_utf8_lossy(name)
                    );
                }
            }
        }
    }

    /// インライン画像: オペランドに載った画像辞書を取り出して分類する。
    ///
    /// BI〜ID間のエントリはトークナイザが組み立て済み。省略キー
    /// （IM/CS/BPC等）はXObjectと同じ分類規則で処理される。
    fn op_inline_image(&mut self, operands: &[Object]) {
        let page_num = self.page_num;

        let dict = match inline_image_dict(operands) {
            Some(dict) => dict,
            None => {
                warn!("page {page_num}: inline image has no usable dictionary");
                return;
            }
        };

        self.record(classify_image(self.reader.document(), &dict));
    }

    /// 分類結果をカウンタに反映する。
    fn record(&mut self, kind: ImageKind) {
        match kind {
            ImageKind::Colored => self.counts.colored += 1,
            ImageKind::ImageMask => self.counts.image_masks += 1,
            ImageKind::MaskedByImage => self.counts.masked_by_image += 1,
            ImageKind::MaskedByColor => self.counts.masked_by_color += 1,
            ImageKind::MalformedMask => {
                warn!(
                    "page {}: Mask entry in image object is not well formed",
                    self.page_num
                );
                self.malformed_masks += 1;
            }
        }
        self.images_seen += 1;
    }

    /// 画像の色空間・Decode配列の詳細をdebugレベルで記録する。
    fn log_image_detail(&self, name: &[u8], dict: &Dictionary) {
        let doc = self.reader.document();
        let Ok(meta) = ImageMeta::from_dict(doc, dict) else {
            return;
        };
        let decode = decode_values(doc, dict, &meta.color_space, meta.bits_per_component);
        debug!(
            "page {}: image '{}' {}x{} bpc={} colorspace={} decode={:?}",
            self.page_num,
            String::from_utf8_lossy(name),
            meta.width,
            meta.height,
            meta.bits_per_component,
            meta.color_space,
            decode
        );
    }
}

/// インライン画像オペレーションから画像辞書を取り出す。
///
/// トークナイザの表現差を吸収する: Streamオペランド（辞書＋データ）、
/// 辞書オペランド、名前/値が交互に並ぶ形式のいずれも受け付ける。
fn inline_image_dict(operands: &[Object]) -> Option<Dictionary> {
    for operand in operands {
        match operand {
            Object::Stream(stream) => return Some(stream.dict.clone()),
            Object::Dictionary(dict) => return Some(dict.clone()),
            _ => {}
        }
    }

    // 名前/値の交互列（BI〜IDのエントリがそのまま並んだ形式）
    if operands.len() >= 2 && operands.len() % 2 == 0 {
        let mut dict = Dictionary::new();
        for pair in operands.chunks(2) {
            let Object::Name(key) = &pair[0] else {
                return None;
            };
            dict.set(key.clone(), pair[1].clone());
        }
        return Some(dict);
    }

    None
}
