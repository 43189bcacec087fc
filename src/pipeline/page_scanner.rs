// Per-page scan: fresh counters -> content stream walk -> page result

use tracing::warn;

use crate::config::ScanOptions;
use crate::pdf::content_stream::{ContentScanner, PageCounts};
use crate::pdf::reader::PdfReader;

/// Result of scanning a single page.
#[derive(Debug, Clone)]
pub struct PageScanResult {
    /// 1-based page number.
    pub page_num: u32,
    pub counts: PageCounts,
    /// Images whose Mask entry could not be classified (audit only).
    pub malformed_masks: u32,
    /// False when the content stream could not be read or fully consumed.
    /// Counts accumulated before the failure are kept as-is.
    pub complete: bool,
}

/// Scan one page's content stream and classify every image it invokes.
///
/// Counters start at zero for every page. A page whose content stream
/// cannot be read or fully scanned yields its partial counts with
/// `complete = false`; the failure is logged here and never propagated,
/// so the caller simply moves on to the next page.
pub fn scan_page(reader: &PdfReader, options: &ScanOptions, page_num: u32) -> PageScanResult {
    let mut scanner = ContentScanner::new(reader, options, page_num);

    let complete = match reader.page_content_stream(page_num) {
        Ok(content) => match scanner.scan_bytes(&content) {
            Ok(()) => true,
            Err(e) => {
                warn!("could not scan all of page {page_num}: {e}");
                false
            }
        },
        Err(e) => {
            warn!("could not read content stream of page {page_num}: {e}");
            false
        }
    };

    PageScanResult {
        page_num,
        counts: scanner.counts(),
        malformed_masks: scanner.malformed_masks(),
        complete,
    }
}
