//! Plain-text rendering of the listing.

use std::io::{self, Write};

use crate::catalog::Product;
use crate::session::{NavAffordance, SessionStatus};
use crate::ui::browse::BrowseState;
use crate::ui::view::ViewModel;

const EMPTY_HINT: &str =
    "No products match your current filters. Try adjusting your price range or clearing all filters.";

/// Everything a renderer needs for one frame.
pub struct Screen<'a> {
    pub view: &'a ViewModel,
    pub state: &'a BrowseState,
    pub session: SessionStatus,
}

pub trait Renderer {
    fn render(&mut self, screen: &Screen<'_>) -> io::Result<()>;
}

/// Writes each frame as text to any writer.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, screen: &Screen<'_>) -> io::Result<()> {
        self.out.write_all(render_text(screen).as_bytes())?;
        self.out.flush()
    }
}

pub fn render_text(screen: &Screen<'_>) -> String {
    let view = screen.view;
    let mut lines = Vec::new();

    let nav = NavAffordance::for_status(screen.session)
        .items()
        .iter()
        .map(|item| format!("[{}]", item))
        .collect::<Vec<_>>()
        .join(" ");
    lines.push(format!("Products{:>width$}", nav, width = 60));
    lines.push(format!(
        "Sort: {} | {}",
        screen.state.sort().label(),
        view.summary()
    ));
    if let Some(chip) = screen.state.filters().chip_label() {
        lines.push(format!("[{} x]", chip));
    }
    lines.push(String::new());

    if let Some(kind) = view.error_kind {
        lines.push("Oops! Something went wrong".to_string());
        lines.push(kind.user_message().to_string());
    } else if view.is_loading && view.products.is_empty() {
        lines.push("Loading...".to_string());
    } else if view.is_empty_result() {
        lines.push("No products found".to_string());
        lines.push(EMPTY_HINT.to_string());
    } else {
        lines.extend(view.products.iter().map(product_line));
    }

    if view.shows_pagination() && view.error_kind.is_none() {
        lines.push(String::new());
        lines.push(pagination_line(view.meta.current_page, view.meta.total_pages));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn product_line(product: &Product) -> String {
    let year = product
        .release_year
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    format!(
        "  #{:<6} {:<40} ${}{}",
        product.id, product.name, product.price, year
    )
}

fn pagination_line(current: u32, total: u32) -> String {
    if total == 0 {
        format!("Page {}", current)
    } else {
        let prev = if current > 1 { "< prev" } else { "      " };
        let next = if current < total { "next >" } else { "" };
        format!("{}  Page {} of {}  {}", prev, current, total, next)
            .trim_end()
            .to_string()
    }
}
