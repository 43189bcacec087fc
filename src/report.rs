use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::pdf::content_stream::PageCounts;

/// Per-page portion of the document report.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    /// 1-based page number.
    pub page: u32,
    #[serde(flatten)]
    pub counts: PageCounts,
    /// Images skipped because their Mask entry had an unrecognized type.
    pub malformed_masks: u32,
    /// False when the page's content stream could not be fully scanned.
    pub complete: bool,
}

/// Whole-document scan report.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub input: PathBuf,
    pub page_count: u32,
    pub pages: Vec<PageReport>,
    /// Sum of all per-page classification counts. Excludes images with
    /// malformed Mask entries, which are never classified.
    pub total_images: u32,
}

/// Write the human-readable report.
///
/// One line per non-zero counter per page; a page with nothing counted
/// prints nothing. Ends with the document summary.
pub fn write_text(report: &DocumentReport, out: &mut impl Write) -> std::io::Result<()> {
    for page in &report.pages {
        write_page_text(page, out)?;
    }
    writeln!(
        out,
        "\nSummary: {} page document contains {} images.\n",
        report.page_count, report.total_images
    )
}

fn write_page_text(page: &PageReport, out: &mut impl Write) -> std::io::Result<()> {
    let p = page.page;
    if page.counts.colored > 0 {
        writeln!(
            out,
            "Found {} images with intrinsic color on Page {}.",
            page.counts.colored, p
        )?;
    }
    if page.counts.image_masks > 0 {
        writeln!(out, "Found {} image masks on Page {}.", page.counts.image_masks, p)?;
    }
    if page.counts.masked_by_image > 0 {
        writeln!(
            out,
            "Found {} images masked with masks on Page {}.",
            page.counts.masked_by_image, p
        )?;
    }
    if page.counts.masked_by_color > 0 {
        writeln!(
            out,
            "Found {} images masked with colors on Page {}.",
            page.counts.masked_by_color, p
        )?;
    }
    if page.malformed_masks > 0 {
        writeln!(
            out,
            "Found {} images with malformed Mask entries on Page {}.",
            page.malformed_masks, p
        )?;
    }
    Ok(())
}

/// Write the report as pretty-printed JSON.
pub fn write_json(report: &DocumentReport, out: &mut impl Write) -> crate::error::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
