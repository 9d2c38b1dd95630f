pub mod crossfilter;
pub mod filtering;
pub mod sorting;

pub use crossfilter::{
    ActiveEntities, ActiveView, CrossFilteredJourney, SortedEntities, cross_filter,
    cross_filtered_out_events, sorted_active_entities,
};
pub use filtering::{Filter, MILLIS_NONE, apply_filter, apply_filters, filters_for_columns};
pub use sorting::{SortState, stable_sort};
