//! Indented console listing of crawled pages

use crate::crawler::Page;
use std::io::{self, Write};
use url::Url;

/// Renders a page as an indented listing
///
/// The page line is indented one space per level of distance from the seed,
/// each link one level deeper:
///
/// ```text
/// / "Welcome"
///  /about
///  /help
/// ```
pub fn render_page(page: &Page) -> String {
    let mut out = format!(
        "{}{} \"{}\"\n",
        " ".repeat(page.depth),
        display_path(&page.url),
        page.title
    );
    for link in &page.links {
        out.push_str(&" ".repeat(page.depth + 1));
        out.push_str(&display_path(link));
        out.push('\n');
    }
    out
}

/// Path plus query, without scheme and host
fn display_path(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Writes pages to any output as they arrive
pub struct ConsolePrinter<W: Write> {
    out: W,
}

impl<W: Write> ConsolePrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn print_page(&mut self, page: &Page) -> io::Result<()> {
        self.out.write_all(render_page(page).as_bytes())?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
