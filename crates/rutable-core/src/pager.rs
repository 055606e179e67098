//! Pager button descriptors handed to the renderer

use serde::{Deserialize, Serialize};

/// Kind of navigation button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonKind {
    First,
    Prev,
    Page,
    Ellipsis,
    Next,
    Last,
}

/// One pager button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagerButton {
    pub kind: ButtonKind,
    pub label: String,
    /// Target page; 0 for ellipsis markers
    pub page: usize,
    pub active: bool,
    pub ellipsis: bool,
}

impl PagerButton {
    fn nav(kind: ButtonKind, page: usize, label: &str) -> Self {
        PagerButton {
            kind,
            label: label.to_string(),
            page,
            active: false,
            ellipsis: false,
        }
    }

    fn page(page: usize, current: usize) -> Self {
        PagerButton {
            kind: ButtonKind::Page,
            label: page.to_string(),
            page,
            active: page == current,
            ellipsis: false,
        }
    }

    fn ellipsis(label: &str) -> Self {
        PagerButton {
            kind: ButtonKind::Ellipsis,
            label: label.to_string(),
            page: 0,
            active: false,
            ellipsis: true,
        }
    }
}

/// Labels for the navigation buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PagerTexts {
    pub prev_text: String,
    pub next_text: String,
    pub first_text: String,
    pub last_text: String,
    pub ellipsis_text: String,
}

impl Default for PagerTexts {
    fn default() -> Self {
        PagerTexts {
            prev_text: "\u{2039}".to_string(),
            next_text: "\u{203a}".to_string(),
            first_text: "\u{ab}".to_string(),
            last_text: "\u{bb}".to_string(),
            ellipsis_text: "\u{2026}".to_string(),
        }
    }
}

/// How the pager is laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerLayout {
    pub next_prev: bool,
    pub first_last: bool,
    pub truncate: bool,
    pub delta: usize,
    pub texts: PagerTexts,
}

impl Default for PagerLayout {
    fn default() -> Self {
        PagerLayout {
            next_prev: true,
            first_last: false,
            truncate: true,
            delta: 2,
            texts: PagerTexts::default(),
        }
    }
}

/// Build the pager for `current` of `total` pages. A single page needs no pager.
pub fn build_pager(current: usize, total: usize, layout: &PagerLayout) -> Vec<PagerButton> {
    if total <= 1 {
        return Vec::new();
    }

    let texts = &layout.texts;
    let prev = if current <= 1 { 1 } else { current - 1 };
    let next = if current >= total { total } else { current + 1 };

    let mut buttons = Vec::new();

    if layout.first_last {
        buttons.push(PagerButton::nav(ButtonKind::First, 1, &texts.first_text));
    }
    if layout.next_prev {
        buttons.push(PagerButton::nav(ButtonKind::Prev, prev, &texts.prev_text));
    }

    if layout.truncate {
        buttons.extend(truncated_pages(current, total, layout.delta, &texts.ellipsis_text));
    } else {
        buttons.extend((1..=total).map(|page| PagerButton::page(page, current)));
    }

    if layout.next_prev {
        buttons.push(PagerButton::nav(ButtonKind::Next, next, &texts.next_text));
    }
    if layout.first_last {
        buttons.push(PagerButton::nav(ButtonKind::Last, total, &texts.last_text));
    }

    buttons
}

/// Page numbers with the first and last page always shown and a window of
/// `delta` pages around the current one. The window widens near either end
/// so the button count stays constant. A gap of one page is filled with its
/// number; longer gaps collapse into an ellipsis.
fn truncated_pages(current: usize, total: usize, delta: usize, ellipsis: &str) -> Vec<PagerButton> {
    let page = current as i64;
    let pages = total as i64;
    let delta = delta as i64;
    let span = delta * 2;

    let mut left = page - delta;
    let mut right = page + delta;

    if page < 4 - delta + span {
        right = 3 + span;
    } else if page > pages - (3 - delta + span) {
        left = pages - (2 + span);
    }

    let shown: Vec<i64> = (1..=pages)
        .filter(|&i| i == 1 || i == pages || (i >= left && i <= right))
        .collect();

    let mut buttons = Vec::with_capacity(shown.len() + 2);
    let mut previous: Option<i64> = None;

    for index in shown {
        if let Some(n) = previous {
            if index - n == 2 {
                buttons.push(PagerButton::page((n + 1) as usize, current));
            } else if index - n != 1 {
                buttons.push(PagerButton::ellipsis(ellipsis));
            }
        }
        buttons.push(PagerButton::page(index as usize, current));
        previous = Some(index);
    }

    buttons
}
