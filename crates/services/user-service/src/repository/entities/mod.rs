//! Table mappings. Kept apart from the domain types so storage details
//! (column types, unique markers) stay out of `domain`.

pub mod user;
