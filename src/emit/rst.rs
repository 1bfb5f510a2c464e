//! reStructuredText documents consumed by Sphinx. Field order, indentation
//! and blank lines are what the site theme expects; keep them byte-exact.

use crate::emit::layout::fragment_from_stub;
use crate::pages::{Page, Section};

pub const HEADER: &str = ".. THIS FILE IS AUTOGENERATED, DO NOT EDIT!";
pub const MAN_TITLE: &str = "Man Pages";
pub const CONTAINER_CLASS: &str = "man_container";

/// `Title` followed by an `=` underline of the same width.
fn heading(title: &str) -> String {
    format!("{}\n{}", title, "=".repeat(title.chars().count()))
}

fn preamble(github_url: &str, title: &str) -> String {
    format!("{HEADER}\n\n:github_url: {github_url}\n\n{}\n", heading(title))
}

/// Last line of every document: indentation only, no newline.
fn trailer(width: usize) -> String {
    " ".repeat(width)
}

fn glob_toctree(pattern: &str) -> String {
    format!(".. toctree::\n    :maxdepth: 1\n    :glob:\n\n    {pattern}\n")
}

/// `man/index.rst`: one entry per section index.
pub fn top_index(repo_url: &str) -> String {
    let url = format!("{repo_url}blob/master/man/");
    preamble(&url, MAN_TITLE) + &glob_toctree("*/index") + &trailer(12)
}

/// `man/<N>/index.rst`: globs every page of the section.
pub fn section_index(repo_url: &str, section: Section) -> String {
    let url = format!("{repo_url}blob/master/man/{}/", section.dir_name());
    let title = format!("{} ({})", section.title(), section);
    preamble(&url, &title) + &glob_toctree("*") + &trailer(16)
}

/// `man/<N>/<name>.rst`: embeds the rendered fragment in a styled container.
pub fn page_stub(repo_url: &str, page: &Page) -> String {
    let stem = page.stem();
    let url = format!(
        "{repo_url}blob/master/man/{}/{}",
        page.section.dir_name(),
        stem
    );
    format!(
        "{}.. raw:: html\n\n   <div class=\"{CONTAINER_CLASS}\">\n\n\
         .. raw:: html\n   :file: {}\n\n\
         .. raw:: html\n\n   </div>\n{}",
        preamble(&url, &stem),
        fragment_from_stub(page),
        trailer(20),
    )
}
