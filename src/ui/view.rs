//! The snapshot handed to renderers.

use crate::catalog::Product;

/// How a failed fetch is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Server,
    Validation,
}

impl ErrorKind {
    /// User-friendly message for display.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Network => "Could not reach the catalog. Check your connection and try again.",
            ErrorKind::Server => "Failed to load products. Please try again later.",
            ErrorKind::Validation => "The catalog rejected the current filters.",
        }
    }
}

/// Pagination block of the view model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Meta {
    pub from: u32,
    pub to: u32,
    pub total: u64,
    pub current_page: u32,
    pub total_pages: u32,
}

/// One consistent snapshot of the listing.
///
/// Always replaced as a whole; nothing mutates a published view model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewModel {
    pub products: Vec<Product>,
    pub meta: Meta,
    pub is_loading: bool,
    pub error_kind: Option<ErrorKind>,
}

impl ViewModel {
    /// Loading snapshot that keeps showing the previous page until the new
    /// one commits.
    pub fn loading(previous: &ViewModel) -> Self {
        Self {
            products: previous.products.clone(),
            meta: previous.meta,
            is_loading: true,
            error_kind: None,
        }
    }

    /// Error snapshot. Never carries products.
    pub fn error(kind: ErrorKind, current_page: u32) -> Self {
        Self {
            products: Vec::new(),
            meta: Meta {
                current_page,
                ..Meta::default()
            },
            is_loading: false,
            error_kind: Some(kind),
        }
    }

    pub fn summary(&self) -> String {
        if self.is_loading {
            "Loading...".to_string()
        } else if self.meta.total > 0 && !self.products.is_empty() {
            format!(
                "Showing {}-{} of {} products",
                self.meta.from, self.meta.to, self.meta.total
            )
        } else {
            "No products".to_string()
        }
    }

    /// Settled, successful, and nothing matched.
    pub fn is_empty_result(&self) -> bool {
        !self.is_loading && self.error_kind.is_none() && self.products.is_empty()
    }

    pub fn shows_pagination(&self) -> bool {
        !self.products.is_empty()
    }
}
