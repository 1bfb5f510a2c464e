pub mod layout;
pub mod rst;

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{IoContext, Result};
use crate::pages::PageRegistry;
use layout::OutputLayout;

/// Counts of generated reStructuredText documents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EmitStats {
    pub section_indexes: usize,
    pub stubs: usize,
}

/// Write the top index, one index per non-empty section and one stub per
/// page. Empty sections get neither a directory nor an index.
pub fn write_site(
    registry: &PageRegistry,
    layout: &OutputLayout,
    repo_url: &str,
) -> Result<EmitStats> {
    let mut stats = EmitStats::default();

    let man_dir = layout.man_dir();
    fs::create_dir_all(&man_dir).at(&man_dir)?;
    write(&layout.top_index(), &rst::top_index(repo_url))?;

    for section in registry.sections() {
        let dir = layout.section_dir(section);
        fs::create_dir_all(&dir).at(&dir)?;
        write(
            &layout.section_index(section),
            &rst::section_index(repo_url, section),
        )?;
        stats.section_indexes += 1;

        for page in registry.pages(section) {
            write(&layout.stub_path(page), &rst::page_stub(repo_url, page))?;
            stats.stubs += 1;
        }
    }

    info!(
        "Wrote {} section indexes and {} page stubs",
        stats.section_indexes, stats.stubs
    );
    Ok(stats)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    debug!("Writing {:?}", path);
    fs::write(path, contents).at(path)
}
