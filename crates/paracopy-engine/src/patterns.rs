use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Invalid regex pattern {line:?}: {source}")]
    Invalid {
        line: String,
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    /// The offending pattern line.
    pub fn line(&self) -> &str {
        match self {
            PatternError::Invalid { line, .. } => line,
        }
    }
}

/// Ordered set of compiled section-start matchers.
///
/// A line matches the set when any member finds a match anywhere in it.
/// Anchoring is left to the patterns themselves (`^Article`).
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

/// Result of compiling user pattern lines.
#[derive(Debug, Default)]
pub struct CompiledPatterns {
    pub patterns: PatternSet,
    pub invalid: Vec<PatternError>,
}

impl PatternSet {
    /// Compile one pattern per line.
    ///
    /// Lines are trimmed and blank lines skipped. Lines that fail to compile
    /// are logged and returned in [`CompiledPatterns::invalid`]; they never
    /// stop the remaining lines from compiling.
    pub fn compile<'a>(lines: impl IntoIterator<Item = &'a str>) -> CompiledPatterns {
        let mut compiled = CompiledPatterns::default();

        for line in lines.into_iter().map(str::trim).filter(|l| !l.is_empty()) {
            match Regex::new(line) {
                Ok(regex) => compiled.patterns.patterns.push(regex),
                Err(source) => {
                    log::warn!("Skipping invalid regex pattern {line:?}: {source}");
                    compiled.invalid.push(PatternError::Invalid {
                        line: line.to_string(),
                        source,
                    });
                }
            }
        }

        compiled
    }

    /// Whether the trimmed text matches any pattern. Blank text never matches.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        !text.is_empty() && self.patterns.iter().any(|p| p.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Source strings of the compiled patterns, in order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}
