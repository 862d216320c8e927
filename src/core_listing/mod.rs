pub mod listing;

pub use listing::{format_long, format_names, ListEntry, Listing};
