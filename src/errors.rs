use std::num::ParseFloatError;

// type alias for Result for use across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while reading path data text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected '{found}' at position {position}")]
    MalformedToken { position: usize, found: String },
    #[error("command '{command}' expects {expected} values, found {found}")]
    ArityMismatch {
        command: char,
        expected: usize,
        found: usize,
    },
    #[error("invalid arc flag '{0}'")]
    InvalidFlag(char),
    #[error("path data must begin with a moveto, found '{0}'")]
    MissingMoveTo(char),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("arc has a zero radius or coincident endpoints")]
    DegenerateArc,
    #[error("curve has coincident control points")]
    DegenerateCurve,
    #[error("arc segments must be converted to cubics before measuring")]
    UnsupportedArc,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("quadratic approximation exceeds tolerance {tolerance} after {segments} segments")]
    ToleranceNotMet { tolerance: f64, segments: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("fit error: {0}")]
    Fit(#[from] FitError),
    #[error("invalid value for {0}: '{1}'")]
    InvalidValue(String, String),
    #[error("transform error: {0}")]
    Transform(String),
    #[error("document error: {0}")]
    Document(String),
    #[error("command line error: {0}")]
    Cli(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(String),
    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap an arbitrary error from a dependency.
    pub fn from_err<T>(err: T) -> Self
    where
        T: std::error::Error + Send + Sync + 'static,
    {
        Error::Other(Box::new(err))
    }
}

impl From<ParseFloatError> for Error {
    fn from(err: ParseFloatError) -> Self {
        Error::Parse(ParseError::InvalidNumber(err.to_string()))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
