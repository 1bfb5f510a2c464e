//! Build helper that turns a tree of man pages into documentation-site
//! input: mandoc HTML fragments, Sphinx index and stub pages, and
//! cross-reference links between the fragments.

pub mod crossref;
pub mod discover;
pub mod emit;
pub mod error;
pub mod pages;
pub mod render;
pub mod settings;

use std::path::Path;

use tracing::info;

pub use emit::layout::OutputLayout;
pub use error::{Error, Result};
pub use pages::{Page, PageRegistry, Section};
pub use render::{Mandoc, Renderer};
pub use settings::Settings;

/// What a run produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub sections: usize,
    pub stubs: usize,
    pub crosslinked: usize,
}

/// Discover → render → emit indexes and stubs → add crosslinks.
/// The first error aborts the run.
pub fn run(
    man_dir: &Path,
    out_dir: &Path,
    settings: &Settings,
    renderer: &dyn Renderer,
) -> Result<RunSummary> {
    info!("Converting man pages from {:?} into {:?}", man_dir, out_dir);
    let layout = OutputLayout::new(out_dir);

    let registry = discover::discover(man_dir)?;
    let pages = render::render_all(renderer, &registry, &layout, settings.progress)?;
    let emitted = emit::write_site(&registry, &layout, &settings.repo_url)?;
    let crosslinked = crossref::add_hyperlinks(&registry, &layout)?;

    Ok(RunSummary {
        pages,
        sections: emitted.section_indexes,
        stubs: emitted.stubs,
        crosslinked,
    })
}
