/// Everything that can stop a translation. All variants are fatal: the
/// translator never returns a partial grammar.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A token regex ends inside a character class or an escape sequence.
    #[error("malformed token pattern `{pattern}`: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    /// The language uses a feature the grammar cannot express.
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    /// A type refers to a concept the language does not declare.
    #[error("unknown concept `{0}`")]
    UnknownConcept(String),

    #[error("concept `{concept}` extends unknown concept `{parent}`")]
    UnknownParent { concept: String, parent: String },

    #[error("inheritance cycle through concept `{0}`")]
    InheritanceCycle(String),

    /// A concept name cannot be turned into a rule name or a type path.
    #[error("`{0}` is not a valid identifier or path")]
    InvalidIdentifier(String),

    #[error("language `{0}` declares no top-level concept")]
    EmptyLanguage(String),
}

impl Error {
    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Error::UnsupportedConstruct(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
