//! Adaptive shortening of long hexadecimal identifiers (addresses, hashes).
//!
//! The layout is measured by the rendering surface and handed in as
//! [`LayoutMetrics`]; everything here is pure arithmetic on those numbers.

use crate::constant::{
    DEFAULT_MIN_VISIBLE_CHARS, ELLIPSIS, ELLIPSIS_CHARS, MEASURE_SAMPLE, MIN_PREFIX_CHARS, MIN_SUFFIX_CHARS,
    PREFIX_SHARE,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Horizontal measurements of an identifier's container and its surroundings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    /// Inner width of the parent element.
    pub parent_width: f64,
    /// Left plus right padding of the parent.
    pub parent_padding: f64,
    /// Combined width of the parent's other children.
    pub siblings_width: f64,
    /// Breathing room kept free inside the parent.
    pub slack: f64,
    pub label_width: Option<f64>,
    pub icon_width: Option<f64>,
    pub container_padding: f64,
    pub container_border: f64,
    /// Gap between the container's children; 4 when unset.
    pub gap: Option<f64>,
    /// Rendered width of [`MEASURE_SAMPLE`] in the identifier's font.
    pub sample_width: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            parent_width: 0.0,
            parent_padding: 0.0,
            siblings_width: 0.0,
            slack: 8.0,
            label_width: None,
            icon_width: None,
            container_padding: 0.0,
            container_border: 0.0,
            gap: None,
            sample_width: 0.0,
        }
    }
}

impl LayoutMetrics {
    /// A fixed-width text surface `columns` characters wide.
    pub fn monospace(columns: usize) -> Self {
        Self {
            parent_width: columns as f64,
            slack: 0.0,
            gap: Some(0.0),
            sample_width: MEASURE_SAMPLE.len() as f64,
            ..Self::default()
        }
    }

    pub fn available_text_width(&self) -> f64 {
        let available_parent = self.parent_width - self.parent_padding - self.siblings_width - self.slack;
        let fixed = self.label_width.map_or(0.0, |w| w + 4.0)
            + self.icon_width.map_or(0.0, |w| w + 6.0)
            + self.container_padding
            + self.container_border
            + self.gap.unwrap_or(4.0) * 2.0;
        available_parent - fixed
    }

    pub fn char_width(&self) -> f64 {
        self.sample_width / MEASURE_SAMPLE.len() as f64
    }

    /// Characters that fit next to an ellipsis, or `None` when the font is unmeasured.
    pub fn max_chars(&self) -> Option<i64> {
        let char_width = self.char_width();
        if char_width <= 0.0 || !char_width.is_finite() {
            return None;
        }
        let ellipsis_width = char_width * ELLIPSIS_CHARS as f64;
        Some(((self.available_text_width() - ellipsis_width) / char_width).floor() as i64)
    }
}

fn head(identifier: &str, n: usize) -> &str {
    match identifier.char_indices().nth(n) {
        Some((idx, _)) => &identifier[..idx],
        None => identifier,
    }
}

fn tail(identifier: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match identifier.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &identifier[idx..],
        None => identifier,
    }
}

fn join(identifier: &str, prefix: usize, suffix: usize) -> String {
    if prefix + suffix >= identifier.chars().count() {
        return identifier.to_string();
    }
    format!("{}{}{}", head(identifier, prefix), ELLIPSIS, tail(identifier, suffix))
}

/// Half/half split keeping `min_chars` characters in total.
pub fn shorten_to_minimum(identifier: &str, min_chars: usize) -> String {
    let half = min_chars / 2;
    join(identifier, half, half)
}

/// 60/40 split of `max_chars`, never fewer than 4 leading or 2 trailing characters.
pub fn shorten(identifier: &str, max_chars: usize) -> String {
    let start = (max_chars as f64 * PREFIX_SHARE).ceil() as usize;
    let end = max_chars.saturating_sub(start);
    join(identifier, start.max(MIN_PREFIX_CHARS), end.max(MIN_SUFFIX_CHARS))
}

/// Fit `identifier` into the measured space, degrading to the minimum split
/// rather than disappearing.
pub fn truncate_identifier(identifier: &str, metrics: &LayoutMetrics, min_chars: usize) -> String {
    if identifier.is_empty() {
        return String::new();
    }

    if metrics.available_text_width() <= 0.0 {
        return shorten_to_minimum(identifier, min_chars);
    }

    let Some(max_chars) = metrics.max_chars() else {
        return identifier.to_string();
    };

    if max_chars >= identifier.chars().count() as i64 {
        identifier.to_string()
    } else if max_chars < min_chars as i64 {
        shorten_to_minimum(identifier, min_chars)
    } else {
        shorten(identifier, max_chars as usize)
    }
}

/// An identifier whose display form tracks the space it is rendered in.
#[derive(Debug, Clone)]
pub struct AdaptiveIdentifier {
    identifier: String,
    min_chars: usize,
    truncate: bool,
    display: String,
}

impl AdaptiveIdentifier {
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            display: identifier.clone(),
            identifier,
            min_chars: DEFAULT_MIN_VISIBLE_CHARS,
            truncate: true,
        }
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn without_truncation(mut self) -> Self {
        self.truncate = false;
        self
    }

    pub fn full(&self) -> &str {
        &self.identifier
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn relayout(&mut self, metrics: &LayoutMetrics) -> &str {
        self.display = if self.truncate {
            truncate_identifier(&self.identifier, metrics, self.min_chars)
        } else {
            self.identifier.clone()
        };
        &self.display
    }

    /// Recompute the display form on every layout change until the layout
    /// sender is dropped.
    pub fn observe(mut self, mut layout: watch::Receiver<LayoutMetrics>) -> (watch::Receiver<String>, JoinHandle<()>) {
        let initial = self.relayout(&layout.borrow_and_update()).to_string();
        let (tx, rx) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            while layout.changed().await.is_ok() {
                let metrics = *layout.borrow_and_update();
                let display = self.relayout(&metrics).to_string();
                tx.send_if_modified(|current| {
                    if *current == display {
                        false
                    } else {
                        *current = display;
                        true
                    }
                });
            }
        });

        (rx, handle)
    }
}
