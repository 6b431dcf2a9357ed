use serde_json::{Map, Value};

use super::{Diagnostic, Label, SourceMap};

/// One-line JSON rendering for machine consumers.
pub fn render(d: &Diagnostic) -> String {
    let source_map = d.source.as_deref().map(SourceMap::new);
    let labels: Vec<Value> = d.labels.iter().map(|l| label(l, source_map.as_ref())).collect();

    let mut obj = Map::new();
    obj.insert("severity".into(), "error".into());
    if let Some(code) = d.code {
        obj.insert("code".into(), code.into());
    }
    obj.insert("message".into(), d.message.as_str().into());
    if let Some(origin) = &d.origin {
        obj.insert("origin".into(), origin.as_str().into());
    }
    obj.insert("labels".into(), Value::Array(labels));
    obj.insert("notes".into(), d.notes.iter().map(|n| Value::from(n.as_str())).collect());
    if let Some(s) = &d.suggestion {
        obj.insert("suggestion".into(), s.as_str().into());
    }

    Value::Object(obj).to_string()
}

fn label(l: &Label, source_map: Option<&SourceMap>) -> Value {
    let mut obj = Map::new();
    obj.insert("start".into(), l.span.start.into());
    obj.insert("end".into(), l.span.end.into());
    obj.insert("message".into(), l.message.as_str().into());
    if let Some(map) = source_map {
        let (line, col) = map.lookup(l.span.start);
        obj.insert("line".into(), line.into());
        obj.insert("col".into(), col.into());
    }
    Value::Object(obj)
}
