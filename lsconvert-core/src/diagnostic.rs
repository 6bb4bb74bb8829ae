//! Advisory conditions reported alongside a successful conversion

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A local image was converted without an explicit source URL, so the
    /// task records the file path instead
    UrlNotSet { path: PathBuf },
}

impl Diagnostic {
    pub fn message(&self) -> &'static str {
        match self {
            Diagnostic::UrlNotSet { .. } => {
                "URL should be set when converting local files. Otherwise, they will not be \
                 automatically linked to your LabelStudio entry."
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UrlNotSet { path } => {
                write!(f, "{} ({})", self.message(), path.display())
            }
        }
    }
}
