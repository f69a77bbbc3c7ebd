// The transient job-application draft: field limits, in-memory store, HTTP handlers.
// Only the resume text ever leaves the process (via the resume store).

pub mod handlers;
pub mod models;
pub mod store;
