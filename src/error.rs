/// Errors returned by pattern registration, compilation and extraction.
///
/// All of these are deterministic input errors: retrying the same call with
/// the same registry yields the same error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `%{...}` reference does not follow `NAME[:SEMANTIC][:TYPE]`.
    #[error("invalid pattern %{{{0}}}")]
    InvalidPlaceholder(String),

    #[error("no pattern found for %{{{0}}}")]
    UnknownPattern(String),

    /// The names still waiting for each other when ordering stopped.
    #[error("cyclic dependency between patterns: {}", .0.join(", "))]
    CyclicDependency(Vec<String>),

    #[error("expanded pattern is not a valid regex: {source}\n  expanded: {expanded}")]
    Regex {
        expanded: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    #[error("regex engine failed while matching: {0}")]
    Match(#[source] Box<fancy_regex::Error>),

    /// `value` is `None` when the pattern declares the type but did not match.
    #[error("field {field}: cannot convert {} to {ty}", describe_value(.value))]
    UnsupportedType {
        field: String,
        value: Option<String>,
        ty: String,
    },

    #[error("field {field}: {value:?} is not a valid {ty}")]
    InvalidNumber {
        field: String,
        value: String,
        ty: &'static str,
        #[source]
        reason: NumberError,
    },

    #[error("cannot nest under already used key {0:?}")]
    NestedFieldCollision(String),
}

/// Why a captured value failed numeric conversion.
#[derive(Debug, thiserror::Error)]
pub enum NumberError {
    #[error(transparent)]
    Parse(#[from] std::num::ParseFloatError),

    #[error("value is not finite")]
    NotFinite,

    #[error("value is outside the 64-bit integer range")]
    OutOfRange,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn describe_value(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "a value".to_string(),
    }
}
