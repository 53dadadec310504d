// Search Service.
// Fans a search out to every enabled platform, then normalizes, scores,
// filters, sorts, limits and caches the merged results.

pub mod handlers;
pub mod service;
