use std::path::PathBuf;

use crate::pages::{Page, Section};

/// Rendered fragments, relative to the output root.
pub const BUILD_DIR: &str = "_build/man";
/// Generated reStructuredText, relative to the output root.
pub const MAN_DIR: &str = "man";
pub const INDEX_FILE: &str = "index.rst";

/// Every path the pipeline writes, derived from the output root.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        OutputLayout { root: root.into() }
    }

    /// `<out>/_build/man/man8`
    pub fn fragment_dir(&self, section: Section) -> PathBuf {
        self.root.join(BUILD_DIR).join(section.dir_name())
    }

    /// `<out>/_build/man/man8/zpool.8.html`
    pub fn fragment_path(&self, page: &Page) -> PathBuf {
        self.fragment_dir(page.section).join(page.fragment_file_name())
    }

    /// `<out>/man`
    pub fn man_dir(&self) -> PathBuf {
        self.root.join(MAN_DIR)
    }

    pub fn top_index(&self) -> PathBuf {
        self.man_dir().join(INDEX_FILE)
    }

    /// `<out>/man/8`
    pub fn section_dir(&self, section: Section) -> PathBuf {
        self.man_dir().join(section.to_string())
    }

    pub fn section_index(&self, section: Section) -> PathBuf {
        self.section_dir(section).join(INDEX_FILE)
    }

    /// `<out>/man/8/zpool.rst`
    pub fn stub_path(&self, page: &Page) -> PathBuf {
        self.section_dir(page.section).join(page.stub_file_name())
    }
}

/// Fragment path as seen from a stub in `man/<N>/`.
pub fn fragment_from_stub(page: &Page) -> String {
    format!(
        "../../{}/{}/{}",
        BUILD_DIR,
        page.section.dir_name(),
        page.fragment_file_name()
    )
}
