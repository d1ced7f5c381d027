mod feature;
mod filters;
mod search;
pub use feature::WidgetFeature;
pub use filters::WidgetFilters;
pub use search::WidgetSearch;
