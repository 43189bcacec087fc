// Whole-document scan: open -> sequential page scans -> totals

use std::path::Path;

use crate::config::ScanOptions;
use crate::pipeline::page_scanner::scan_page;
use crate::pdf::reader::PdfReader;
use crate::report::{DocumentReport, PageReport};

/// Scan an entire document, page by page, and build the document report.
///
/// Pages are scanned strictly in order, one at a time; a page that cannot
/// be scanned is reported with its partial counts and the scan moves on.
/// The only fatal error is an input file that cannot be opened.
pub fn scan_document(input: &Path, options: &ScanOptions) -> crate::error::Result<DocumentReport> {
    let reader = PdfReader::open(input)?;
    let page_count = reader.page_count();

    if let Some(dir) = &options.extract_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut pages: Vec<PageReport> = Vec::with_capacity(page_count as usize);
    let mut total_images: u32 = 0;

    for page_num in 1..=page_count {
        let page = scan_page(&reader, options, page_num);
        total_images += page.counts.total();
        pages.push(PageReport {
            page: page.page_num,
            counts: page.counts,
            malformed_masks: page.malformed_masks,
            complete: page.complete,
        });
    }

    Ok(DocumentReport {
        input: input.to_path_buf(),
        page_count,
        pages,
        total_images,
    })
}
