use super::{Diagnostic, Label, SourceMap};

pub struct AnsiRenderer {
    pub use_color: bool,
}

impl AnsiRenderer {
    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color { format!("\x1b[{code}m{s}\x1b[0m") } else { s.to_string() }
    }

    fn bold(&self, s: &str) -> String {
        self.paint("1", s)
    }

    fn red(&self, s: &str) -> String {
        self.paint("1;31", s)
    }

    fn cyan(&self, s: &str) -> String {
        self.paint("36", s)
    }

    fn dim(&self, s: &str) -> String {
        self.paint("2", s)
    }

    pub fn render(&self, d: &Diagnostic) -> String {
        let mut out = self.heading(d);

        if let (Some(label), Some(source)) = (d.labels.first(), &d.source) {
            self.snippet(&mut out, d, label, source);
        }

        let footer = d.notes.iter()
            .map(|n| format!("note: {n}"))
            .chain(d.suggestion.iter().map(|s| format!("suggestion: {s}")));
        for line in footer {
            out.push_str(&format!("  {} {}\n", self.dim("="), line));
        }

        out
    }

    /// `error[CODE]: message`
    fn heading(&self, d: &Diagnostic) -> String {
        let heading = match d.code {
            Some(code) => format!("error[{code}]"),
            None => "error".to_string(),
        };
        format!("{}: {}\n", self.red(&heading), self.bold(&d.message))
    }

    fn snippet(&self, out: &mut String, d: &Diagnostic, label: &Label, source: &str) {
        let map = SourceMap::new(source);
        let (line, col) = map.lookup(label.span.start);
        let line_text = map.line_text(source, line);

        let location = match &d.origin {
            Some(origin) => format!("{origin}:{line}:{col}"),
            None => format!("{line}:{col}"),
        };
        out.push_str(&format!("  {} {}\n", self.cyan("-->"), location));

        let gutter = line.to_string().len();
        let pipe = self.cyan("|");
        let pad = " ".repeat(gutter);
        let line_num = self.cyan(&format!("{line:>gutter$}"));

        // Carets stay on the reported line even for spans that run past it.
        let room = line_text.len().saturating_sub(col - 1).max(1);
        let width = label.span.end.saturating_sub(label.span.start).clamp(1, room);
        let carets = self.red(&"^".repeat(width));
        let indent = " ".repeat(col - 1);
        let message = if label.message.is_empty() {
            String::new()
        } else {
            format!(" {}", self.red(&label.message))
        };

        out.push_str(&format!("{pad} {pipe}\n"));
        out.push_str(&format!("{line_num} {pipe} {line_text}\n"));
        out.push_str(&format!("{pad} {pipe} {indent}{carets}{message}\n"));
        out.push_str(&format!("{pad} {pipe}\n"));
    }
}
