//! Diesel table definitions for the tracker schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Companies, unique by `lower(name)`.
    companies (id) {
        /// 24-character hexadecimal object identifier.
        id -> Varchar,
        name -> Text,
        city -> Nullable<Text>,
        state -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Students and alumni flattened into one table.
    ///
    /// A check constraint ties the nullable profile columns to `user_type`.
    users (id) {
        /// Caller-chosen identifier.
        id -> Text,
        email -> Text,
        name -> Text,
        /// `STUDENT` or `ALUMNI`.
        user_type -> Text,
        linked_in -> Nullable<Text>,
        phone_number -> Nullable<Text>,
        major -> Nullable<Text>,
        class_level -> Nullable<Text>,
        company -> Nullable<Varchar>,
        share_profile -> Nullable<Bool>,
    }
}

diesel::table! {
    /// Internship applications, unique by `(user_id, company_id, position)`.
    applications (id) {
        id -> Varchar,
        user_id -> Text,
        company_id -> Varchar,
        company_name -> Text,
        position -> Text,
        link -> Nullable<Text>,
        /// Progress entries as a JSON array.
        process -> Jsonb,
        /// Status of the latest progress entry, kept in step with `process`.
        current_status -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
