//! Diesel schema for the pre-provisioned task tables.

diesel::table! {
    /// Task header rows.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Opening timestamp.
        opened -> Timestamptz,
        /// Closing timestamp, null while open.
        closed -> Nullable<Timestamptz>,
        /// Author key; null or zero when unset.
        author_id -> Nullable<Int8>,
        /// Assignee key; null or zero when unset.
        assigned_id -> Nullable<Int8>,
        /// Task title.
        title -> Text,
        /// Task body.
        content -> Text,
    }
}

diesel::table! {
    /// User directory.
    users (id) {
        /// User identifier.
        id -> Int8,
        /// Display name.
        name -> Text,
    }
}

diesel::table! {
    /// Label directory.
    labels (id) {
        /// Label identifier.
        id -> Int8,
        /// Display name.
        name -> Text,
    }
}

diesel::table! {
    /// Many-to-many association between tasks and labels.
    tasks_labels (task_id, label_id) {
        /// Associated task.
        task_id -> Int8,
        /// Associated label.
        label_id -> Int8,
    }
}

diesel::joinable!(tasks_labels -> labels (label_id));
diesel::joinable!(tasks_labels -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, users, labels, tasks_labels);
