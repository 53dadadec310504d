// User accounts: get-or-create, preferences and activity history.

pub mod handlers;
