//! Split-ticket fare finder.
//!
//! A library that answers: "for this train, would two tickets split at an
//! intermediate stop cost less than one through ticket?"

pub mod domain;
pub mod fares;
pub mod route;
pub mod stations;
pub mod timetable;
