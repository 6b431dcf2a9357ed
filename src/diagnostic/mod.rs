pub mod ansi;
pub mod json;
pub mod source_map;

pub use source_map::SourceMap;

use crate::json::JsonError;
use crate::state::RuntimeError;

/// Byte range within input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

/// An error report on input text. Hosts render it with [`ansi`] or [`json`].
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<&'static str>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestion: Option<String>,
    pub source: Option<String>,
    /// Where the source came from, e.g. a file path or `<stdin>`.
    pub origin: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestion: None,
            source: None,
            origin: None,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_span(mut self, span: Span, label: impl Into<String>) -> Self {
        self.labels.push(Label { span, message: label.into() });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// A diagnostic for `err`, pointing into `source` when the error has a location.
    pub fn for_input(err: &JsonError, source: &str) -> Self {
        let d = Diagnostic::from(err);
        match err.location() {
            Some((line, col)) => {
                let start = SourceMap::new(source).offset(line, col);
                let end = (start + 1).min(source.len()).max(start);
                d.with_span(Span { start, end }, "here").with_source(source)
            }
            None => d,
        }
    }
}

/// Stable code for each error kind.
pub fn code_for(err: &JsonError) -> &'static str {
    match err {
        JsonError::Parse(_) => "LJSON-D001",
        JsonError::Function => "LJSON-E001",
        JsonError::Channel => "LJSON-E002",
        JsonError::State => "LJSON-E003",
        JsonError::UserData => "LJSON-E004",
        JsonError::NestedTables => "LJSON-E005",
    }
}

// ---- From impls for error types ----

impl From<&JsonError> for Diagnostic {
    fn from(e: &JsonError) -> Self {
        let d = Diagnostic::error(e.to_string()).with_code(code_for(e));
        match e {
            JsonError::NestedTables => d.with_note("a table contains itself, directly or through other tables"),
            JsonError::Function | JsonError::Channel | JsonError::State | JsonError::UserData => {
                d.with_suggestion("encode only nil, booleans, numbers, strings and tables")
            }
            JsonError::Parse(_) => d,
        }
    }
}

impl From<&RuntimeError> for Diagnostic {
    fn from(e: &RuntimeError) -> Self {
        Diagnostic::error(&e.message).with_code("LJSON-R001")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_error_builder() {
        let d = Diagnostic::error("something went wrong");
        assert_eq!(d.message, "something went wrong");
        assert!(d.code.is_none());
        assert!(d.labels.is_empty());
        assert!(d.notes.is_empty());
        assert!(d.suggestion.is_none());
    }

    #[test]
    fn from_nested_tables_error() {
        let d = Diagnostic::from(&JsonError::NestedTables);
        assert_eq!(d.message, "cannot encode recursively nested tables to JSON");
        assert_eq!(d.code, Some("LJSON-E005"));
        assert_eq!(d.notes.len(), 1);
        assert!(d.labels.is_empty());
    }

    #[test]
    fn from_unsupported_kind_error() {
        let d = Diagnostic::from(&JsonError::UserData);
        assert_eq!(d.code, Some("LJSON-E004"));
        assert!(d.suggestion.is_some());
    }

    #[test]
    fn parse_error_points_into_input() {
        let source = "[1,\n  2,\n  x]";
        let err = crate::json::decode(source).unwrap_err();
        let d = Diagnostic::for_input(&err, source);
        assert_eq!(d.code, Some("LJSON-D001"));
        let label = &d.labels[0];
        assert_eq!(&source[label.span.start..label.span.end], "x");
        assert_eq!(d.source.as_deref(), Some(source));
    }

    #[test]
    fn encode_error_for_input_has_no_span() {
        let d = Diagnostic::for_input(&JsonError::Channel, "[]");
        assert!(d.labels.is_empty());
        assert!(d.source.is_none());
    }

    #[test]
    fn from_runtime_error() {
        let e = RuntimeError::new("bad argument #1 to 'decode' (string expected, got boolean)");
        let d = Diagnostic::from(&e);
        assert!(d.message.contains("string expected"));
        assert_eq!(d.code, Some("LJSON-R001"));
    }

    #[test]
    fn every_error_kind_has_its_own_code() {
        let errors = [
            JsonError::Function,
            JsonError::Channel,
            JsonError::State,
            JsonError::UserData,
            JsonError::NestedTables,
        ];
        let mut codes: Vec<&str> = errors.iter().map(code_for).collect();
        codes.push(code_for(&crate::json::decode("[").unwrap_err()));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 6);
    }
}
