// Hand-maintained; the table is provisioned by `db::messages::ensure_schema`.

diesel::table! {
    messages (id) {
        id -> Text,
        room -> Text,
        username -> Text,
        text -> Text,
        ts -> Int8,
    }
}
