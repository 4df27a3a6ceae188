//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. The
//! `diesel print-schema` command regenerates them from a live database.

diesel::table! {
    /// Todo items.
    ///
    /// `id` is a server-generated UUID v4. `title` carries a non-empty check
    /// constraint.
    todos (id) {
        id -> Uuid,
        title -> Text,
        description -> Text,
        completed -> Bool,
        /// Set once on insert.
        created_at -> Timestamptz,
        /// Refreshed by every update.
        updated_at -> Timestamptz,
    }
}
