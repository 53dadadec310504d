// Normalization and scoring of platform listings.
// Everything here is pure: callers apply scores and flags explicitly.

pub mod flags;
pub mod normalizer;
pub mod scorer;
