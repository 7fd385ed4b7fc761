//! Diesel table definitions matching `backend/migrations`.
//!
//! The generated `stays.search_document` column is deliberately absent:
//! Diesel has no `tsvector` type, so text search goes through `sql_query`.

diesel::table! {
    /// Listings.
    stays (id) {
        id -> Uuid,
        name -> Text,
        /// Unique URL key, fixed at creation.
        slug -> Text,
        author -> Uuid,
        description -> Text,
        tags -> Array<Text>,
        /// Space-joined `tags`, feeding the search document.
        tag_text -> Text,
        location -> Text,
        photo -> Nullable<Text>,
        created -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews left on listings.
    reviews (id) {
        id -> Uuid,
        author -> Uuid,
        stay -> Uuid,
        text -> Text,
        rating -> SmallInt,
        created -> Timestamptz,
    }
}

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Normalised, unique login address.
        email -> Text,
        name -> Text,
        account_type -> Text,
        /// `salt$hash`, see `PasswordDigest::encode`.
        password_digest -> Text,
    }
}

diesel::joinable!(reviews -> stays (stay));
diesel::allow_tables_to_appear_in_same_query!(stays, reviews, users);
