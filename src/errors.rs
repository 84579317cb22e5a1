#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("an error occurred requesting the registry")]
    Connection(#[from] ureq::Error),

    #[error("the registry response could not be read")]
    InvalidResponse,

    #[error("IN \"{identifier}\". {message}")]
    NotFound {
        identifier: String,
        message: String,
        code: i64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    JsonSerialize(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    #[error("the document has no root element")]
    Empty,

    #[error("the document has more than one root element")]
    MultipleRoots,

    #[error("unexpected text outside of the root element")]
    TextOutsideRoot,

    #[error("unexpected closing tag")]
    UnmatchedEnd,

    #[error("the document ended with {0} unclosed elements")]
    Unclosed(usize),
}
