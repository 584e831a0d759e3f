//! Diesel schema for task persistence.

diesel::table! {
    /// Task records owned by users.
    tasks (id) {
        /// Task identifier.
        id -> Int8,
        /// Owning user.
        user_id -> Int8,
        /// Task title.
        title -> Text,
        /// Task description.
        description -> Text,
        /// Free-form status.
        status -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
