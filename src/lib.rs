//! Job market dashboard: normalizes a static postings dataset (salary and
//! experience ranges, skills lists, dates) and renders filtered aggregate
//! charts, a searchable results table and a CSV download with egui.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
