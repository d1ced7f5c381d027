/// Collision severity as reported by the API. Closed set; a feature whose
/// severity string falls outside it is dropped at conversion time rather
/// than failing the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Slight,
    Serious,
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Slight => "slight",
            Severity::Serious => "serious",
            Severity::Fatal => "fatal",
        }
    }

    /// Parses the wire string; `None` for anything outside the closed set.
    pub fn parse(raw: &str) -> Option<Severity> {
        match raw {
            "slight" => Some(Severity::Slight),
            "serious" => Some(Severity::Serious),
            "fatal" => Some(Severity::Fatal),
            _ => None,
        }
    }
}
