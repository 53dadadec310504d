pub mod profile;
pub mod project;
pub mod proposal;
pub mod user;
