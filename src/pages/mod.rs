pub mod sections;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use sections::Section;

/// Suffix of man sources that still go through configure substitution.
pub const TEMPLATE_SUFFIX: &str = ".in";

/// A man page discovered in the source tree. Identity is (section, name);
/// `name` never carries the `.<section>` or `.in` suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub section: Section,
    pub name: String,
    pub source: PathBuf,
}

impl Page {
    pub fn new(section: Section, name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Page {
            section,
            name: name.into(),
            source: source.into(),
        }
    }

    /// `zpool.8`: the source file name without `.in`, used as stub title.
    pub fn stem(&self) -> String {
        format!("{}.{}", self.name, self.section)
    }

    pub fn fragment_file_name(&self) -> String {
        format!("{}.html", self.stem())
    }

    pub fn stub_file_name(&self) -> String {
        format!("{}.rst", self.name)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Section → pages in discovery order. Filled once by the discovery walk,
/// read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct PageRegistry {
    pages: BTreeMap<Section, Vec<Page>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, page: Page) {
        self.pages.entry(page.section).or_default().push(page);
    }

    /// Sections holding at least one page, in numeric order.
    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        self.pages
            .iter()
            .filter(|(_, pages)| !pages.is_empty())
            .map(|(section, _)| *section)
    }

    pub fn pages(&self, section: Section) -> &[Page] {
        self.pages.get(&section).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.values().flatten()
    }

    /// Whether `name` is a page in any section.
    pub fn contains_name(&self, name: &str) -> bool {
        self.iter().any(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
