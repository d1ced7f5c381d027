mod feature;
pub use feature::Feature;

mod severity;
pub use severity::Severity;
