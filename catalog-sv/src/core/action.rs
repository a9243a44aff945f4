use diesel::sqlite::SqliteConnection;
use log::{debug, info};

use crate::core::{CreateMovieParams, CreateNamedParams, Director, Genre, MovieFilter, MovieView, Resource, UpdateMovieParams, UpdateNamedParams};
use crate::core::error::Error;
use crate::core::error::Error::{NotFoundError, NotUpdatedError};
use crate::db;

pub fn find_movies(conn: &mut SqliteConnection, filter: &MovieFilter) -> Result<Vec<MovieView>, Error> {
    info!("finding movies director_id={:?} genre_id={:?}", filter.director_id, filter.genre_id);
    db::find_movies(conn, filter)
}

pub fn find_one_movie(conn: &mut SqliteConnection, id: i32) -> Result<Option<MovieView>, Error> {
    info!("finding movie id={}", id);
    db::find_one_movie(conn, id)
}

pub fn create_movie(conn: &mut SqliteConnection, movie: CreateMovieParams) -> Result<i32, Error> {
    info!("creating movie {:?}", movie);
    let id = db::create_movie(conn, &movie)?;
    debug!("created movie id={}", id);
    Ok(id)
}

/// Fails with [`NotUpdatedError`] unless exactly one row changed.
pub fn update_movie(conn: &mut SqliteConnection, id: i32, movie: UpdateMovieParams) -> Result<(), Error> {
    info!("updating movie id={} {:?}", id, movie);
    match db::update_movie(conn, id, &movie)? {
        1 => Ok(()),
        n => {
            debug!("movie id={} not updated, {} rows matched", id, n);
            Err(NotUpdatedError)
        }
    }
}

pub fn delete_movie(conn: &mut SqliteConnection, id: i32) -> Result<bool, Error> {
    info!("deleting movie id={}", id);
    db::delete_movie(conn, id)
}

pub fn find_directors(conn: &mut SqliteConnection) -> Result<Vec<Director>, Error> {
    info!("finding directors");
    db::find_directors(conn)
}

pub fn find_one_director(conn: &mut SqliteConnection, id: i32) -> Result<Option<Director>, Error> {
    info!("finding director id={}", id);
    db::find_one_director(conn, id)
}

pub fn create_director(conn: &mut SqliteConnection, director: CreateNamedParams) -> Result<i32, Error> {
    info!("creating director {:?}", director);
    db::create_director(conn, director.name)
}

pub fn update_director(conn: &mut SqliteConnection, id: i32, director: UpdateNamedParams) -> Result<(), Error> {
    info!("updating director id={} {:?}", id, director);
    let found = match director.name {
        Some(name) => db::rename_director(conn, id, name)? > 0,
        None => db::find_one_director(conn, id)?.is_some(),
    };

    if found {
        Ok(())
    } else {
        Err(NotFoundError { resource: Resource::Director, id })
    }
}

pub fn delete_director(conn: &mut SqliteConnection, id: i32) -> Result<bool, Error> {
    info!("deleting director id={}", id);
    db::delete_director(conn, id)
}

pub fn find_genres(conn: &mut SqliteConnection) -> Result<Vec<Genre>, Error> {
    info!("finding genres");
    db::find_genres(conn)
}

pub fn find_one_genre(conn: &mut SqliteConnection, id: i32) -> Result<Option<Genre>, Error> {
    info!("finding genre id={}", id);
    db::find_one_genre(conn, id)
}

pub fn create_genre(conn: &mut SqliteConnection, genre: CreateNamedParams) -> Result<i32, Error> {
    info!("creating genre {:?}", genre);
    db::create_genre(conn, genre.name)
}

pub fn update_genre(conn: &mut SqliteConnection, id: i32, genre: UpdateNamedParams) -> Result<(), Error> {
    info!("updating genre id={} {:?}", id, genre);
    let found = match genre.name {
        Some(name) => db::rename_genre(conn, id, name)? > 0,
        None => db::find_one_genre(conn, id)?.is_some(),
    };

    if found {
        Ok(())
    } else {
        Err(NotFoundError { resource: Resource::Genre, id })
    }
}

pub fn delete_genre(conn: &mut SqliteConnection, id: i32) -> Result<bool, Error> {
    info!("deleting genre id={}", id);
    db::delete_genre(conn, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, DbConnection};

    fn memory_conn() -> DbConnection {
        let pool = create_pool(":memory:", 1).unwrap();
        run_migrations(&pool).unwrap();
        pool.get().unwrap()
    }

    fn named(name: &str) -> CreateNamedParams {
        CreateNamedParams { name: Some(name.to_string()) }
    }

    #[test]
    fn update_of_missing_movie_is_not_updated() {
        let mut conn = memory_conn();
        let changes = UpdateMovieParams { year: Some(Some(2001)), ..UpdateMovieParams::default() };

        let res = update_movie(&mut conn, 42, changes);

        assert!(matches!(res, Err(NotUpdatedError)));
    }

    #[test]
    fn update_movie_keeps_untouched_fields() {
        let mut conn = memory_conn();
        let id = create_movie(&mut conn, CreateMovieParams {
            title: Some("Stalker".to_string()),
            year: Some(1979),
            rating: Some(8.1),
            ..CreateMovieParams::default()
        }).unwrap();

        update_movie(&mut conn, id, UpdateMovieParams {
            rating: Some(Some(8.2)),
            ..UpdateMovieParams::default()
        }).unwrap();

        let movie = find_one_movie(&mut conn, id).unwrap().unwrap().movie;
        assert_eq!(movie.title.as_deref(), Some("Stalker"));
        assert_eq!(movie.year, Some(1979));
        assert_eq!(movie.rating, Some(8.2));
    }

    #[test]
    fn update_director_changes_only_name() {
        let mut conn = memory_conn();
        let id = create_director(&mut conn, named("Kurosawa")).unwrap();

        update_director(&mut conn, id, UpdateNamedParams { name: Some(Some("Akira Kurosawa".to_string())) }).unwrap();

        assert_eq!(
            find_one_director(&mut conn, id).unwrap(),
            Some(Director { id, name: Some("Akira Kurosawa".to_string()) })
        );
    }

    #[test]
    fn update_director_without_name_is_a_no_op() {
        let mut conn = memory_conn();
        let id = create_director(&mut conn, named("Ozu")).unwrap();

        update_director(&mut conn, id, UpdateNamedParams::default()).unwrap();

        assert_eq!(find_one_director(&mut conn, id).unwrap().unwrap().name.as_deref(), Some("Ozu"));
    }

    #[test]
    fn update_of_missing_genre_is_not_found() {
        let mut conn = memory_conn();

        let renamed = update_genre(&mut conn, 5, UpdateNamedParams { name: Some(Some("Western".to_string())) });
        let untouched = update_genre(&mut conn, 5, UpdateNamedParams::default());

        assert!(matches!(renamed, Err(NotFoundError { resource: Resource::Genre, id: 5 })));
        assert!(matches!(untouched, Err(NotFoundError { resource: Resource::Genre, id: 5 })));
    }

    #[test]
    fn deleting_a_genre_twice() {
        let mut conn = memory_conn();
        let id = create_genre(&mut conn, named("Musical")).unwrap();

        assert!(delete_genre(&mut conn, id).unwrap());
        assert!(!delete_genre(&mut conn, id).unwrap());
    }
}
