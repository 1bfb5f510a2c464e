use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::emit::layout::OutputLayout;
use crate::error::{Error, IoContext, Result};
use crate::pages::PageRegistry;

/// Turns one man page source into an HTML fragment (no `<html>`/`<body>`
/// wrapper).
pub trait Renderer {
    fn render(&self, source: &Path) -> Result<Vec<u8>>;
}

/// `mandoc -T html -O fragment <source>`, fragment read from stdout.
#[derive(Debug, Clone)]
pub struct Mandoc {
    program: String,
}

impl Mandoc {
    pub fn new(program: impl Into<String>) -> Self {
        Mandoc {
            program: program.into(),
        }
    }
}

impl Default for Mandoc {
    fn default() -> Self {
        Mandoc::new("mandoc")
    }
}

impl Renderer for Mandoc {
    fn render(&self, source: &Path) -> Result<Vec<u8>> {
        let output = Command::new(&self.program)
            .args(["-T", "html", "-O", "fragment"])
            .arg(source)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Render {
                source_path: source.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// Render every registered page into its fragment file. Stops at the first
/// failure; fragments already written stay on disk.
pub fn render_all(
    renderer: &dyn Renderer,
    registry: &PageRegistry,
    layout: &OutputLayout,
    progress: bool,
) -> Result<usize> {
    let pb = if progress {
        ProgressBar::new(registry.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }

    let mut rendered = 0usize;
    for section in registry.sections() {
        let dir = layout.fragment_dir(section);
        fs::create_dir_all(&dir).at(&dir)?;

        for page in registry.pages(section) {
            debug!("Generate {} page", page.stem());
            pb.set_message(page.stem());
            let html = renderer.render(page.source())?;
            let path = layout.fragment_path(page);
            fs::write(&path, html).at(&path)?;
            rendered += 1;
            pb.inc(1);
        }
    }

    pb.finish_and_clear();
    info!("Rendered {} fragments", rendered);
    Ok(rendered)
}
