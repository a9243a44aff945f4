diesel::table! {
    director (id) {
        id -> Integer,
        name -> Nullable<Text>,
    }
}

diesel::table! {
    genre (id) {
        id -> Integer,
        name -> Nullable<Text>,
    }
}

diesel::table! {
    movie (id) {
        id -> Integer,
        title -> Nullable<Text>,
        description -> Nullable<Text>,
        trailer -> Nullable<Text>,
        year -> Nullable<Integer>,
        rating -> Nullable<Double>,
        director_id -> Nullable<Integer>,
        genre_id -> Nullable<Integer>,
    }
}

diesel::joinable!(movie -> director (director_id));
diesel::joinable!(movie -> genre (genre_id));

diesel::allow_tables_to_appear_in_same_query!(
    director,
    genre,
    movie,
);
