//! Lines of text and attachment runs, measured on demand.

use std::sync::Arc;

use runbridge_core::delegate::{
    RunDelegateHandle, RunMetrics, TextRunDelegate, OBJECT_REPLACEMENT_CHAR,
};

/// Proportions for plain text runs, scaled by point size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub size: f64,
}

impl FontMetrics {
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    pub fn ascent(&self) -> f64 {
        self.size * 0.8
    }

    pub fn descent(&self) -> f64 {
        self.size * 0.2
    }

    /// Fixed advance per character.
    pub fn advance(&self) -> f64 {
        self.size * 0.5
    }
}

/// One run of a line.
#[derive(Debug)]
pub enum Run {
    Text { text: String, font: FontMetrics },
    /// Sized entirely by its delegate; renders as U+FFFC.
    Attachment { handle: RunDelegateHandle },
}

impl Run {
    pub fn metrics(&self) -> RunMetrics {
        match self {
            Run::Text { text, font } => RunMetrics {
                ascent: font.ascent(),
                descent: font.descent(),
                width: font.advance() * text.chars().count() as f64,
            },
            Run::Attachment { handle } => RunMetrics {
                ascent: handle.ascent(),
                descent: handle.descent(),
                width: handle.width(),
            },
        }
    }
}

/// A single laid-out line.
#[derive(Debug, Default)]
pub struct Line {
    runs: Vec<Run>,
}

impl Line {
    pub fn new() -> Self {
        Self { runs: Vec::new() }
    }

    pub fn push_text(&mut self, text: impl Into<String>, font: FontMetrics) {
        self.runs.push(Run::Text {
            text: text.into(),
            font,
        });
    }

    /// Takes ownership of `handle`; it is released with the run.
    pub fn push_attachment(&mut self, handle: RunDelegateHandle) {
        self.runs.push(Run::Attachment { handle });
    }

    /// Exports `delegate` and appends it as an attachment run.
    ///
    /// Returns false (and leaves the line unchanged) if the export fails.
    pub fn attach(&mut self, delegate: &Arc<TextRunDelegate>) -> bool {
        match delegate.export_handle() {
            Some(handle) => {
                self.push_attachment(handle);
                true
            }
            None => {
                tracing::warn!("run delegate export failed; attachment skipped");
                false
            }
        }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Line bounds: widest ascent and descent, summed width.
    pub fn metrics(&self) -> RunMetrics {
        self.runs
            .iter()
            .map(Run::metrics)
            .fold(RunMetrics::default(), |acc, m| RunMetrics {
                ascent: acc.ascent.max(m.ascent),
                descent: acc.descent.max(m.descent),
                width: acc.width + m.width,
            })
    }

    /// Line content, with one replacement character per attachment.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            match run {
                Run::Text { text, .. } => out.push_str(text),
                Run::Attachment { .. } => out.push(OBJECT_REPLACEMENT_CHAR),
            }
        }
        out
    }

    pub fn attachment_count(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| matches!(r, Run::Attachment { .. }))
            .count()
    }

    /// Delegates behind this line's attachments, in run order.
    pub fn delegates(&self) -> Vec<Arc<TextRunDelegate>> {
        self.runs
            .iter()
            .filter_map(|r| match r {
                Run::Attachment { handle } => TextRunDelegate::from_handle(handle),
                Run::Text { .. } => None,
            })
            .collect()
    }

    /// Drops every attachment run, releasing its handle. Returns how many.
    pub fn remove_attachments(&mut self) -> usize {
        let before = self.runs.len();
        self.runs.retain(|r| matches!(r, Run::Text { .. }));
        let removed = before - self.runs.len();
        if removed > 0 {
            tracing::debug!(removed, "attachment runs released");
        }
        removed
    }
}
