use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{IoContext, Result};
use crate::pages::{Page, PageRegistry, Section, TEMPLATE_SUFFIX};

static PAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<name>.+)\.(?P<num>[0-9])(?:{})?$",
        regex::escape(TEMPLATE_SUFFIX)
    ))
    .unwrap()
});

/// Walk the top level of `man_dir` and register every page found in a
/// recognized section directory. Entries are visited in file-name order.
pub fn discover(man_dir: &Path) -> Result<PageRegistry> {
    let mut registry = PageRegistry::new();

    for (dir_name, path) in sorted_entries(man_dir)? {
        if !path.is_dir() {
            continue;
        }
        let Some(section) = Section::from_dir_name(&dir_name) else {
            debug!("Skipping {:?}: not a man section", path);
            continue;
        };

        for (file_name, file_path) in sorted_entries(&path)? {
            if file_path.is_dir() {
                continue;
            }
            match page_name(&file_name, section) {
                Some(name) => {
                    debug!("Found {} page {}", section, file_name);
                    registry.insert(Page::new(section, name, file_path));
                }
                None => debug!("Ignoring {:?}", file_path),
            }
        }
    }

    info!(
        "Discovered {} pages in {} sections",
        registry.len(),
        registry.sections().count()
    );
    Ok(registry)
}

/// Page name for a file in section `section`: `zpool.8` and `zpool.8.in`
/// both give `zpool`. Files belonging to another section give `None`.
pub fn page_name(file_name: &str, section: Section) -> Option<&str> {
    let caps = PAGE_RE.captures(file_name)?;
    if Section::parse(&caps["num"]) != Some(section) {
        return None;
    }
    caps.name("name").map(|m| m.as_str())
}

fn sorted_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).at(dir)? {
        let entry = entry.at(dir)?;
        let Ok(name) = entry.file_name().into_string() else {
            debug!("Skipping non UTF-8 entry {:?}", entry.path());
            continue;
        };
        entries.push((name, entry.path()));
    }
    entries.sort();
    Ok(entries)
}
