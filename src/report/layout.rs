//! Report pagination.
//!
//! Text lines flow onto fixed-height pages. Every line is measured against
//! the remaining space on the current page before it is emitted; a line that
//! would overflow starts a fresh page instead. A line is never dropped: even
//! a line taller than a whole page is emitted on its own fresh page.

use crate::session::Exchange;

pub const REPORT_TITLE: &str = "InsightPulse Report";

/// Page geometry and vertical spacing, in points (1/72 inch).
#[derive(Debug, Clone, Copy)]
pub struct PageMetrics {
    pub page_width: f64,
    pub page_height: f64,
    /// Left edge of every line.
    pub margin_x: f64,
    /// Distance from the top edge down to the first baseline.
    pub top_offset: f64,
    /// Lines never go below this y coordinate.
    pub bottom_margin: f64,
    /// Vertical advance after an ordinary body line.
    pub line_height: f64,
    /// Vertical advance after a chat answer line.
    pub answer_gap: f64,
    /// Vertical advance after the report title.
    pub title_gap: f64,
    /// Extra space before a section header.
    pub header_gap: f64,
}

impl Default for PageMetrics {
    fn default() -> Self {
        // US letter.
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin_x: 50.0,
            top_offset: 40.0,
            bottom_margin: 50.0,
            line_height: 15.0,
            answer_gap: 25.0,
            title_gap: 30.0,
            header_gap: 20.0,
        }
    }
}

/// Text role, mapped to a font by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Bold, 16pt.
    Title,
    /// Bold, 12pt.
    Header,
    /// Regular, 10pt.
    Body,
}

/// A line placed at an absolute position on a page. `y` is measured from the
/// bottom edge, PDF-style.
#[derive(Debug, Clone, PartialEq)]
pub struct DocLine {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub lines: Vec<DocLine>,
}

/// Places lines top-down, breaking pages on overflow.
#[derive(Debug)]
pub struct PageComposer {
    metrics: PageMetrics,
    pages: Vec<Page>,
    current: Page,
    cursor_y: f64,
}

impl PageComposer {
    pub fn new(metrics: PageMetrics) -> Self {
        let cursor_y = metrics.page_height - metrics.top_offset;
        Self {
            metrics,
            pages: Vec::new(),
            current: Page::default(),
            cursor_y,
        }
    }

    fn top_y(&self) -> f64 {
        self.metrics.page_height - self.metrics.top_offset
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.cursor_y = self.top_y();
    }

    /// Emits one line, advancing the cursor by `advance`. The overflow check
    /// runs before emission: if the line would end below the bottom margin,
    /// a fresh page is started first. On a fresh page the line is emitted
    /// unconditionally so that no line is ever lost.
    pub fn push(&mut self, text: impl Into<String>, style: TextStyle, advance: f64) {
        let fits = self.cursor_y - advance >= self.metrics.bottom_margin;
        if !fits && !self.current.lines.is_empty() {
            self.break_page();
        }
        self.current.lines.push(DocLine {
            x: self.metrics.margin_x,
            y: self.cursor_y,
            text: text.into(),
            style,
        });
        self.cursor_y -= advance;
    }

    /// Moves the cursor down without emitting a line. A gap that overflows
    /// simply pins the cursor at the bottom margin; the next `push` breaks
    /// the page.
    pub fn gap(&mut self, advance: f64) {
        self.cursor_y = (self.cursor_y - advance).max(self.metrics.bottom_margin - 1.0);
    }

    /// Finishes the document. Always yields at least one page.
    pub fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Lays out the full report: title, timestamp, summary section, then the
/// chat transcript when one exists.
pub fn paginate_report(
    summary: &str,
    history: &[Exchange],
    responder_label: &str,
    generated: Option<&str>,
    metrics: PageMetrics,
) -> Vec<Page> {
    let mut composer = PageComposer::new(metrics);

    composer.push(REPORT_TITLE, TextStyle::Title, metrics.title_gap);
    if let Some(timestamp) = generated {
        composer.push(
            format!("Generated {timestamp}"),
            TextStyle::Body,
            metrics.line_height,
        );
    }

    composer.gap(metrics.header_gap - metrics.line_height);
    composer.push("Summary:", TextStyle::Header, metrics.line_height);
    for line in summary.trim_end().lines() {
        composer.push(line, TextStyle::Body, metrics.line_height);
    }

    if !history.is_empty() {
        composer.gap(metrics.header_gap);
        composer.push("Chat History:", TextStyle::Header, metrics.line_height);
        for exchange in history {
            composer.push(
                format!("User: {}", exchange.question),
                TextStyle::Body,
                metrics.line_height,
            );
            composer.push(
                format!("{responder_label}: {}", exchange.answer),
                TextStyle::Body,
                metrics.answer_gap,
            );
        }
    }

    composer.finish()
}
