//! Child output classification.
//!
//! Classification only decides presentation; it never feeds back into the
//! session.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::OutputConfig;

/// Presentation tag of one child output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineClass {
    Default,
    Success,
    Error,
    Warning,
    Debug,
    Developer,
}

/// Marker of engine-side developer messages.
const DEVELOPER_MARKER: &str = "[INFO][Developer]";

/// Case-insensitive keywords, first match wins.
const KEYWORDS: [(&str, LineClass); 4] = [
    ("SUC", LineClass::Success),
    ("ERROR", LineClass::Error),
    ("WARN", LineClass::Warning),
    ("DEBUG", LineClass::Debug),
];

/// Classifies stdout lines.
#[derive(Debug, Clone)]
pub struct StdoutClassifier {
    noise: Vec<String>,
}

impl StdoutClassifier {
    pub fn new(noise: Vec<String>) -> Self {
        Self { noise }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.noise.clone())
    }

    /// `None` for noise lines that should not be shown at all.
    pub fn classify(&self, line: &str) -> Option<LineClass> {
        if self.noise.iter().any(|n| !n.is_empty() && line.contains(n.as_str())) {
            return None;
        }
        if line.contains(DEVELOPER_MARKER) {
            return Some(LineClass::Developer);
        }

        let upper = line.to_ascii_uppercase();
        let class = KEYWORDS
            .iter()
            .find(|(kw, _)| upper.contains(kw))
            .map_or(LineClass::Default, |&(_, class)| class);
        Some(class)
    }
}

impl Default for StdoutClassifier {
    fn default() -> Self {
        Self::from_config(&OutputConfig::default())
    }
}

static FILE_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"File "([A-Za-z0-9_.]+)", line ([0-9]+)"#).unwrap());

/// Rewrites traceback citations of dotted modules into source paths.
///
/// `File "pkg.mod.a", line 12` becomes `File "pkg/mod/a.py", line 12`.
/// Stderr lines are always tagged [`LineClass::Error`].
#[derive(Debug, Clone)]
pub struct StderrRewriter {
    extension: String,
}

impl StderrRewriter {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Use the first configured source extension, `py` when none.
    pub fn from_extensions(extensions: &[String]) -> Self {
        let ext = extensions
            .first()
            .map(|e| e.trim_start_matches('.'))
            .filter(|e| !e.is_empty())
            .unwrap_or("py");
        Self::new(ext)
    }

    pub fn rewrite<'a>(&self, line: &'a str) -> Cow<'a, str> {
        FILE_CITATION.replace_all(line, |caps: &regex::Captures| {
            format!(
                "File \"{}.{}\", line {}",
                caps[1].replace('.', "/"),
                self.extension,
                &caps[2]
            )
        })
    }

    pub fn classify<'a>(&self, line: &'a str) -> (LineClass, Cow<'a, str>) {
        (LineClass::Error, self.rewrite(line))
    }
}

impl Default for StderrRewriter {
    fn default() -> Self {
        Self::new("py")
    }
}
