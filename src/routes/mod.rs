/// Router Module Index
///
/// Pages are grouped by the access classification the gate applies to them. Each
/// group is wrapped in its own `page_gate` layer in `create_router`, so a page can
/// only be reached through the classification of the module it is declared in.

/// Pages for visitors without a session, and pages and actions open to everyone.
pub mod public;

/// Donor section, `protected([donor])`.
pub mod donor;

/// Organizer section, `protected([organizer])`.
pub mod organizer;

/// Admin section, `protected([admin])`.
pub mod admin;
