/// Everything `decode` and `encode` can report.
///
/// Messages are surfaced to scripts verbatim.
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    /// Malformed input; carries the parser's own message.
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("cannot encode function to JSON")]
    Function,
    #[error("cannot encode channel to JSON")]
    Channel,
    #[error("cannot encode state to JSON")]
    State,
    #[error("cannot encode userdata to JSON")]
    UserData,
    #[error("cannot encode recursively nested tables to JSON")]
    NestedTables,
}

impl JsonError {
    /// Parse failures have a location in the input text.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            JsonError::Parse(e) if e.line() > 0 => Some((e.line(), e.column())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_messages() {
        assert_eq!(JsonError::Function.to_string(), "cannot encode function to JSON");
        assert_eq!(JsonError::Channel.to_string(), "cannot encode channel to JSON");
        assert_eq!(JsonError::State.to_string(), "cannot encode state to JSON");
        assert_eq!(JsonError::UserData.to_string(), "cannot encode userdata to JSON");
        assert_eq!(
            JsonError::NestedTables.to_string(),
            "cannot encode recursively nested tables to JSON"
        );
    }

    #[test]
    fn parse_message_passes_through() {
        let inner = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let expected = inner.to_string();
        let err = JsonError::from(inner);
        assert_eq!(err.to_string(), expected);
        assert_eq!(err.location(), Some((1, 2)));
    }

    #[test]
    fn encode_errors_have_no_location() {
        assert_eq!(JsonError::NestedTables.location(), None);
    }
}
