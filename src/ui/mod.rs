//! egui rendering. Everything here reads from [`crate::state::AppState`]
//! and the query results; no module here touches the data files.

pub mod map;
pub mod panels;
pub mod plot;
pub mod tables;
pub mod tabs;
