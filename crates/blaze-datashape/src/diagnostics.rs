//! Builder-pattern printer for rendering datashape errors.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};
use rowan::TextRange;

use crate::Error;

/// Renders an [`Error`] as an annotated snippet of the source it came from.
///
/// Lexical and grammar errors remember their input, so they render without a
/// source. Builder errors only carry a span and need [`ErrorPrinter::source`].
pub struct ErrorPrinter<'e, 's> {
    error: &'e Error,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> ErrorPrinter<'e, 's> {
    pub fn new(error: &'e Error) -> Self {
        Self {
            error,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let source: Option<&str> = match self.source {
            Some(source) => Some(source),
            None => self.error.input(),
        };
        let (Some(source), Some(span)) = (source, self.error.span()) else {
            return write!(w, "{}", self.error);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let message = self.error.to_string();
        let range = adjust_range(span, source.len());
        let mut snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(range).label(self.label()));
        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        let report = vec![Level::ERROR.primary_title(&message).element(snippet)];
        write!(w, "{}", renderer.render(&report))
    }

    /// Short annotation next to the highlighted span.
    fn label(&self) -> String {
        match self.error {
            Error::Lex { .. } => "unrecognized character".to_string(),
            Error::Syntax { expected, .. } | Error::UnexpectedEof { expected, .. } => {
                format!("expected {expected}")
            }
            Error::UnknownConstructor { .. } => "not a type constructor".to_string(),
            Error::ParametrizedTypeUnsupported { .. } => "declared with parameters".to_string(),
            Error::InvalidNode { kind, .. } => format!("unexpected {kind:?}"),
            Error::InvalidConstructorArguments { reason, .. } => reason.clone(),
            Error::RecursionLimitExceeded { .. } => String::new(),
        }
    }
}

/// Empty spans (end of input) are widened to one column so they stay visible.
fn adjust_range(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}

impl Error {
    /// Source text embedded in lexical and grammar errors.
    pub fn input(&self) -> Option<&str> {
        match self {
            Error::Lex { input, .. }
            | Error::Syntax { input, .. }
            | Error::UnexpectedEof { input, .. } => Some(input),
            _ => None,
        }
    }

    pub fn printer(&self) -> ErrorPrinter<'_, '_> {
        ErrorPrinter::new(self)
    }

    /// Annotated report for errors that know their input, the plain message otherwise.
    pub fn render(&self, colored: bool) -> String {
        self.printer().colored(colored).render()
    }
}
