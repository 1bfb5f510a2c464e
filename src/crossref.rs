use std::borrow::Cow;
use std::fs;
use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::emit::layout::OutputLayout;
use crate::error::{IoContext, Result};
use crate::pages::PageRegistry;

/// CSS class mandoc puts on cross-reference anchors.
pub const XREF_CLASS: &str = "Xr";

static REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>[^\s()<>&]+)\((?P<num>[1-9])\)$").unwrap());

/// A resolved reference anchor: byte range in the fragment plus its
/// replacement markup.
struct Link {
    start: usize,
    end: usize,
    html: String,
}

/// Anchor being read: where its start tag began, its class attribute and
/// the text seen so far.
struct Pending {
    start: usize,
    class: String,
    text: Option<String>,
}

/// Rewrite every rendered fragment so references to known pages become
/// relative links. Returns how many files changed.
pub fn add_hyperlinks(registry: &PageRegistry, layout: &OutputLayout) -> Result<usize> {
    let mut changed = 0usize;

    for page in registry.iter() {
        let path = layout.fragment_path(page);
        let bytes = fs::read(&path).at(&path)?;
        let Ok(html) = String::from_utf8(bytes) else {
            warn!("{:?} is not UTF-8, leaving references unresolved", path);
            continue;
        };

        let linked = match link_references(&html, registry) {
            Ok(linked) => linked,
            Err(e) => {
                warn!("Could not tokenize {:?}: {}", path, e);
                continue;
            }
        };

        if let Cow::Owned(new_html) = linked {
            if new_html != html {
                debug!("Crosslinks detected in {:?}, generate", path);
                fs::write(&path, new_html).at(&path)?;
                changed += 1;
            }
        }
    }

    info!("Added crosslinks to {} fragments", changed);
    Ok(changed)
}

/// Replace `<a class="Xr">name(N)</a>` with a link to `../N/name.N.html`
/// when `name` is a registered page in any section; `N` is kept as written.
/// Anchors with nested markup or unknown names are left as they are.
pub fn link_references<'a>(
    html: &'a str,
    registry: &PageRegistry,
) -> std::result::Result<Cow<'a, str>, quick_xml::Error> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut links = Vec::new();
    let mut pending: Option<Pending> = None;

    loop {
        let event = reader.read_event()?;
        let pos = reader.buffer_position() as usize;
        match event {
            Event::Start(e) if e.name().as_ref() == b"a" => {
                // `e` holds everything between '<' and '>'
                let start = pos.saturating_sub(e.len() + 2);
                pending = xref_class(&e)
                    .filter(|_| html.as_bytes().get(start) == Some(&b'<'))
                    .map(|class| Pending {
                        start,
                        class,
                        text: None,
                    });
            }
            Event::Text(t) => {
                // a second text run means the anchor held more than the reference
                let text = std::str::from_utf8(&t).ok();
                pending = pending.take().and_then(|mut p| {
                    if p.text.is_some() {
                        return None;
                    }
                    p.text = Some(text?.to_string());
                    Some(p)
                });
            }
            Event::End(e) if e.name().as_ref() == b"a" => {
                if let Some(link) = pending.take().and_then(|p| resolve(p, pos, registry)) {
                    links.push(link);
                }
            }
            Event::Eof => break,
            _ => pending = None,
        }
    }

    if links.is_empty() {
        return Ok(Cow::Borrowed(html));
    }

    let mut out = String::with_capacity(html.len() + links.len() * 32);
    let mut last = 0;
    for link in &links {
        out.push_str(&html[last..link.start]);
        out.push_str(&link.html);
        last = link.end;
    }
    out.push_str(&html[last..]);
    Ok(Cow::Owned(out))
}

/// Class attribute of an anchor if it lists the cross-reference class.
fn xref_class(start: &BytesStart) -> Option<String> {
    start
        .html_attributes()
        .with_checks(false)
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == b"class")
        .and_then(|a| String::from_utf8(a.value.into_owned()).ok())
        .filter(|class| class.split_ascii_whitespace().any(|c| c == XREF_CLASS))
}

fn resolve(pending: Pending, end: usize, registry: &PageRegistry) -> Option<Link> {
    let text = pending.text?;
    let caps = REF_RE.captures(&text)?;
    let name = &caps["name"];
    let section = &caps["num"];
    if !registry.contains_name(name) {
        return None;
    }
    Some(Link {
        start: pending.start,
        end,
        html: format!(
            r#"<a href="../{section}/{name}.{section}.html" class="{}">{name}({section})</a>"#,
            pending.class
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::{Page, Section};

    fn registry(pages: &[(u8, &str)]) -> PageRegistry {
        let mut reg = PageRegistry::new();
        for &(code, name) in pages {
            reg.insert(Page::new(Section::from_code(code).unwrap(), name, name));
        }
        reg
    }

    #[test]
    fn links_known_reference() {
        let reg = registry(&[(8, "zpool")]);
        let html = r#"<p>See <a class="Xr">zpool(8)</a> for details.</p>"#;
        let out = link_references(html, &reg).unwrap();
        assert_eq!(
            out,
            r#"<p>See <a href="../8/zpool.8.html" class="Xr">zpool(8)</a> for details.</p>"#
        );
    }

    #[test]
    fn replaces_existing_href_and_title() {
        let reg = registry(&[(8, "zfs")]);
        let html = r#"<a class="Xr" href="man8/zfs.8.html" title="zfs">zfs(8)</a>"#;
        let out = link_references(html, &reg).unwrap();
        assert_eq!(out, r#"<a href="../8/zfs.8.html" class="Xr">zfs(8)</a>"#);
    }

    #[test]
    fn unknown_reference_untouched() {
        let reg = registry(&[(8, "zpool")]);
        let html = r#"<a class="Xr">mount(8)</a>"#;
        assert!(matches!(link_references(html, &reg).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn links_digit_as_written() {
        let reg = registry(&[(8, "zfs")]);
        let html = r#"<a class="Xr">zfs(4)</a> <a class="Xr">zfs(9)</a>"#;
        assert_eq!(
            link_references(html, &reg).unwrap(),
            r#"<a href="../4/zfs.4.html" class="Xr">zfs(4)</a> <a href="../9/zfs.9.html" class="Xr">zfs(9)</a>"#
        );
    }

    #[test]
    fn other_classes_untouched() {
        let reg = registry(&[(8, "zpool")]);
        let html = r#"<a class="Lk">zpool(8)</a> <a href="x">zpool(8)</a>"#;
        assert_eq!(link_references(html, &reg).unwrap(), html);
    }

    #[test]
    fn substring_names_are_distinct() {
        let reg = registry(&[(8, "zfs"), (8, "zfs-mount")]);
        let html = r#"<a class="Xr">zfs-mount(8)</a> <a class="Xr">zfs(8)</a> <a class="Xr">zf(8)</a>"#;
        let out = link_references(html, &reg).unwrap();
        assert_eq!(
            out,
            r#"<a href="../8/zfs-mount.8.html" class="Xr">zfs-mount(8)</a> <a href="../8/zfs.8.html" class="Xr">zfs(8)</a> <a class="Xr">zf(8)</a>"#
        );
    }

    #[test]
    fn regex_metacharacters_in_names() {
        let reg = registry(&[(3, "libzfs.so"), (1, "c++")]);
        let html = r#"<a class="Xr">libzfs.so(3)</a><a class="Xr">libzfsXso(3)</a><a class="Xr">c++(1)</a>"#;
        let out = link_references(html, &reg).unwrap();
        assert_eq!(
            out,
            r#"<a href="../3/libzfs.so.3.html" class="Xr">libzfs.so(3)</a><a class="Xr">libzfsXso(3)</a><a href="../1/c++.1.html" class="Xr">c++(1)</a>"#
        );
    }

    #[test]
    fn nested_markup_untouched() {
        let reg = registry(&[(8, "zpool")]);
        let html = r#"<a class="Xr"><b>zpool</b>(8)</a>"#;
        assert_eq!(link_references(html, &reg).unwrap(), html);
    }

    #[test]
    fn multi_class_anchor_keeps_class() {
        let reg = registry(&[(8, "zpool")]);
        let html = r#"<a class="Xr extra">zpool(8)</a>"#;
        assert_eq!(
            link_references(html, &reg).unwrap(),
            r#"<a href="../8/zpool.8.html" class="Xr extra">zpool(8)</a>"#
        );
    }

    #[test]
    fn tolerates_html_void_elements() {
        let reg = registry(&[(8, "zpool")]);
        let html = "<div>line<br>\n<a class=\"Xr\">zpool(8)</a>,\n<hr></div>";
        assert_eq!(
            link_references(html, &reg).unwrap(),
            "<div>line<br>\n<a href=\"../8/zpool.8.html\" class=\"Xr\">zpool(8)</a>,\n<hr></div>"
        );
    }

    #[test]
    fn mandoc_fragment_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/zpool-list.8.html").unwrap();
        let reg = registry(&[(8, "zpool"), (8, "zpool-status"), (7, "zpoolprops")]);
        let out = link_references(&html, &reg).unwrap();
        assert!(out.contains(r#"<a href="../8/zpool-status.8.html" class="Xr">zpool-status(8)</a>"#));
        assert!(out.contains(r#"<a href="../7/zpoolprops.7.html" class="Xr">zpoolprops(7)</a>"#));
        // not registered
        assert!(out.contains(r#"<a class="Xr">zfs(8)</a>"#));
        assert_eq!(out.matches("class=\"Xr\"").count(), html.matches("class=\"Xr\"").count());
    }
}
