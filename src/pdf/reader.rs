use std::path::Path;

use lopdf::{Document, Object};

pub struct PdfReader {
    doc: Document,
}

impl PdfReader {
    /// PDFファイルを開いてPdfReaderを作成する。
    pub fn open(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let doc = Document::load(path)?;
        Ok(Self { doc })
    }

    /// 内部のlopdf Documentへの参照を返す。
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// ページ数を返す。
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// 指定ページ(1-indexed)のコンテンツストリームをバイト列として返す。
    /// 複数のContentストリームがある場合は結合して返す。
    pub fn page_content_stream(&self, page_num: u32) -> crate::error::Result<Vec<u8>> {
        let page_id = self.get_page_id(page_num)?;
        Ok(self.doc.get_page_content(page_id)?)
    }

    /// 指定ページ(1-indexed)のXObjectリソースから名前でStreamを解決する。
    ///
    /// ページ辞書に直接埋め込まれたResourcesと、参照されているResources
    /// （親ページツリーから継承されたものも含む）の両方を探索する。
    /// 名前が見つからない場合と、見つかったオブジェクトがStreamでない
    /// 場合は別のエラーメッセージを返す。
    pub fn xobject_stream(
        &self,
        page_num: u32,
        name: &[u8],
    ) -> crate::error::Result<&lopdf::Stream> {
        let page_id = self.get_page_id(page_num)?;
        let (resource_dict, resource_ids) = self.doc.get_page_resources(page_id)?;

        if let Some(dict) = resource_dict
            && let Some(found) = self.lookup_xobject_in_dict(dict, name)
        {
            return found;
        }

        for res_id in resource_ids {
            let dict = self.doc.get_dictionary(res_id)?;
            if let Some(found) = self.lookup_xobject_in_dict(dict, name) {
                return found;
            }
        }

        Err(crate::error::PdfCensusError::resource(format!(
            "XObject '{}' not found in page resources",
            String::from_utf8_lossy(name)
        )))
    }

    /// リソース辞書のXObjectエントリから名前を引く。
    ///
    /// エントリ自体が無い・名前が無い場合はNone（呼び出し側が次の
    /// リソース辞書を探索する）。名前は見つかったがStreamに解決できない
    /// 場合はSome(Err)。
    fn lookup_xobject_in_dict<'a>(
        &'a self,
        dict: &'a lopdf::Dictionary,
        name: &[u8],
    ) -> Option<crate::error::Result<&'a lopdf::Stream>> {
        let xobject_entry = dict.get(b"XObject").ok()?;

        let xobject_dict = match xobject_entry {
            Object::Dictionary(d) => d,
            Object::Reference(id) => self
                .doc
                .get_object(*id)
                .and_then(Object::as_dict)
                .ok()?,
            _ => return None,
        };

        let value = xobject_dict.get(name).ok()?;
        let stream = match value {
            Object::Stream(s) => Ok(s),
            Object::Reference(id) => self
                .doc
                .get_object(*id)
                .and_then(Object::as_stream)
                .map_err(|_| {
                    crate::error::PdfCensusError::resource(format!(
                        "XObject '{}' is not a stream",
                        String::from_utf8_lossy(name)
                    ))
                }),
            _ => Err(crate::error::PdfCensusError::resource(format!(
                "XObject '{}' is not a stream",
                String::from_utf8_lossy(name)
            ))),
        };
        Some(stream)
    }

    /// ページ番号(1-indexed)からObjectIdを取得する。
    fn get_page_id(&self, page_num: u32) -> crate::error::Result<lopdf::ObjectId> {
        let pages = self.doc.get_pages();
        pages.get(&page_num).copied().ok_or_else(|| {
            crate::error::PdfCensusError::pdf_read(format!("page {} not found", page_num))
        })
    }
}
