use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, PooledConnection};
use diesel::sqlite::{Sqlite, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::debug;
use r2d2::Pool;

use crate::core::{CreateMovieParams, Director, Genre, Movie, MovieFilter, MovieView, UpdateMovieParams};
use crate::core::error::Error;
use crate::core::error::Error::{MigrationError, PoolError};

pub mod schema;

use schema::{director, genre, movie};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;
pub type DbConnectionPool = Pool<ConnectionManager<SqliteConnection>>;

// sqlite leaves foreign keys off and fails on a held lock immediately
// unless asked otherwise, per connection
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_pool(database_url: &str, size: u32) -> Result<DbConnectionPool, Error> {
    let mgr = ConnectionManager::<SqliteConnection>::new(database_url);

    Pool::builder()
        .max_size(size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(mgr)
        .map_err(PoolError)
}

pub fn run_migrations(pool: &DbConnectionPool) -> Result<usize, Error> {
    let mut conn: DbConnection = pool.get()?;

    conn.run_pending_migrations(MIGRATIONS)
        .map(|applied| applied.len())
        .map_err(|e| MigrationError(e.to_string()))
}

fn load_movies(
    conn: &mut SqliteConnection,
    movie_id: Option<i32>,
    filter: &MovieFilter,
) -> Result<Vec<MovieView>, Error> {
    let mut query = movie::table
        .left_join(director::table)
        .left_join(genre::table)
        .select((Movie::as_select(), director::name.nullable(), genre::name.nullable()))
        .order(movie::id.asc())
        .into_boxed();

    if let Some(m) = movie_id {
        query = query.filter(movie::id.eq(m));
    }
    if let Some(d) = filter.director_id {
        query = query.filter(movie::director_id.eq(d));
    }
    if let Some(g) = filter.genre_id {
        query = query.filter(movie::genre_id.eq(g));
    }

    debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

    let rows = query.load::<(Movie, Option<String>, Option<String>)>(conn)?;

    Ok(rows.into_iter().map(MovieView::from).collect())
}

pub fn find_movies(conn: &mut SqliteConnection, filter: &MovieFilter) -> Result<Vec<MovieView>, Error> {
    load_movies(conn, None, filter)
}

pub fn find_one_movie(conn: &mut SqliteConnection, movie_id: i32) -> Result<Option<MovieView>, Error> {
    load_movies(conn, Some(movie_id), &MovieFilter::default())
        .map(|movies| movies.into_iter().next())
}

pub fn create_movie(conn: &mut SqliteConnection, new_movie: &CreateMovieParams) -> Result<i32, Error> {
    let query = diesel::insert_into(movie::table)
        .values(new_movie)
        .returning(movie::id);

    debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

    Ok(query.get_result(conn)?)
}

/// Applies a partial update and returns the number of rows it touched.
pub fn update_movie(conn: &mut SqliteConnection, movie_id: i32, changes: &UpdateMovieParams) -> Result<usize, Error> {
    // diesel refuses to build an UPDATE with nothing to set
    if changes.is_empty() {
        return Ok(0)
    }

    let query = diesel::update(movie::table.find(movie_id))
        .set(changes);

    debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

    Ok(query.execute(conn)?)
}

pub fn delete_movie(conn: &mut SqliteConnection, movie_id: i32) -> Result<bool, Error> {
    let query = diesel::delete(movie::table.find(movie_id));

    debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

    Ok(query.execute(conn)? > 0)
}

pub fn find_directors(conn: &mut SqliteConnection) -> Result<Vec<Director>, Error> {
    Ok(director::table
        .select(Director::as_select())
        .order(director::id.asc())
        .load(conn)?)
}

pub fn find_one_director(conn: &mut SqliteConnection, director_id: i32) -> Result<Option<Director>, Error> {
    Ok(director::table
        .find(director_id)
        .select(Director::as_select())
        .first(conn)
        .optional()?)
}

pub fn create_director(conn: &mut SqliteConnection, name: Option<String>) -> Result<i32, Error> {
    let query = diesel::insert_into(director::table)
        .values(director::name.eq(name))
        .returning(director::id);

    debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

    Ok(query.get_result(conn)?)
}

pub fn rename_director(conn: &mut SqliteConnection, director_id: i32, name: Option<String>) -> Result<usize, Error> {
    let query = diesel::update(director::table.find(director_id))
        .set(director::name.eq(name));

    debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

    Ok(query.execute(conn)?)
}

pub fn delete_director(conn: &mut SqliteConnection, director_id: i32) -> Result<bool, Error> {
    let query = diesel::delete(director::table.find(director_id));

    debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

    Ok(query.execute(conn)? > 0)
}

pub fn find_genres(conn: &mut SqliteConnection) -> Result<Vec<Genre>, Error> {
    Ok(genre::table
        .select(Genre::as_select())
        .order(genre::id.asc())
        .load(conn)?)
}

pub fn find_one_genre(conn: &mut SqliteConnection, genre_id: i32) -> Result<Option<Genre>, Error> {
    Ok(genre::table
        .find(genre_id)
        .select(Genre::as_select())
        .first(conn)
        .optional()?)
}

pub fn create_genre(conn: &mut SqliteConnection, name: Option<String>) -> Result<i32, Error> {
    let query = diesel::insert_into(genre::table)
        .values(genre::name.eq(name))
        .returning(genre::id);

    debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

    Ok(query.get_result(conn)?)
}

pub fn rename_genre(conn: &mut SqliteConnection, genre_id: i32, name: Option<String>) -> Result<usize, Error> {
    let query = diesel::update(genre::table.find(genre_id))
        .set(genre::name.eq(name));

    debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

    Ok(query.execute(conn)?)
}

pub fn delete_genre(conn: &mut SqliteConnection, genre_id: i32) -> Result<bool, Error> {
    let query = diesel::delete(genre::table.find(genre_id));

    debug!("{}", diesel::debug_query::<Sqlite, _>(&query));

    Ok(query.execute(conn)? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_conn() -> DbConnection {
        let pool = create_pool(":memory:", 1).unwrap();
        run_migrations(&pool).unwrap();
        pool.get().unwrap()
    }

    fn movie_titled(title: &str, director_id: Option<i32>, genre_id: Option<i32>) -> CreateMovieParams {
        CreateMovieParams {
            title: Some(title.to_string()),
            director_id,
            genre_id,
            ..CreateMovieParams::default()
        }
    }

    #[test]
    fn concurrent_writers_wait_for_the_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let pool = create_pool(path.to_str().unwrap(), 4).unwrap();
        run_migrations(&pool).unwrap();

        let writers: Vec<_> = (0..4).map(|w| {
            let pool = pool.clone();
            std::thread::spawn(move || {
                let mut conn = pool.get().unwrap();
                for i in 0..50 {
                    create_movie(&mut conn, &movie_titled(&format!("{}-{}", w, i), None, None)).unwrap();
                }
            })
        }).collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let mut conn = pool.get().unwrap();
        assert_eq!(find_movies(&mut conn, &MovieFilter::default()).unwrap().len(), 200);
    }

    #[test]
    fn migrations_apply_once() {
        let pool = create_pool(":memory:", 1).unwrap();

        assert_eq!(run_migrations(&pool).unwrap(), 1);
        assert_eq!(run_migrations(&pool).unwrap(), 0);
    }

    #[test]
    fn find_one_movie_joins_names() {
        let mut conn = memory_conn();
        let d = create_director(&mut conn, Some("Agnès Varda".to_string())).unwrap();
        let g = create_genre(&mut conn, Some("Drama".to_string())).unwrap();
        let id = create_movie(&mut conn, &movie_titled("Cléo from 5 to 7", Some(d), Some(g))).unwrap();

        let found = find_one_movie(&mut conn, id).unwrap().unwrap();

        assert_eq!(found.movie.title.as_deref(), Some("Cléo from 5 to 7"));
        assert_eq!(found.director.as_deref(), Some("Agnès Varda"));
        assert_eq!(found.genre.as_deref(), Some("Drama"));
    }

    #[test]
    fn movie_without_references_has_no_names() {
        let mut conn = memory_conn();
        let id = create_movie(&mut conn, &movie_titled("Untitled", None, None)).unwrap();

        let found = find_one_movie(&mut conn, id).unwrap().unwrap();

        assert_eq!(found.director, None);
        assert_eq!(found.genre, None);
        assert_eq!(find_one_movie(&mut conn, id + 1).unwrap(), None);
    }

    #[test]
    fn find_movies_combines_filters() {
        let mut conn = memory_conn();
        let d1 = create_director(&mut conn, Some("A".to_string())).unwrap();
        let d2 = create_director(&mut conn, Some("B".to_string())).unwrap();
        let g1 = create_genre(&mut conn, Some("X".to_string())).unwrap();
        let g2 = create_genre(&mut conn, Some("Y".to_string())).unwrap();
        create_movie(&mut conn, &movie_titled("one", Some(d1), Some(g1))).unwrap();
        create_movie(&mut conn, &movie_titled("two", Some(d1), Some(g2))).unwrap();
        create_movie(&mut conn, &movie_titled("three", Some(d2), Some(g1))).unwrap();

        let by_director = find_movies(&mut conn, &MovieFilter { director_id: Some(d1), genre_id: None }).unwrap();
        let both = find_movies(&mut conn, &MovieFilter { director_id: Some(d1), genre_id: Some(g1) }).unwrap();
        let all = find_movies(&mut conn, &MovieFilter::default()).unwrap();

        assert_eq!(by_director.len(), 2);
        assert!(by_director.iter().all(|m| m.movie.director_id == Some(d1)));
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].movie.title.as_deref(), Some("one"));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let mut conn = memory_conn();

        let res = create_movie(&mut conn, &movie_titled("orphan", Some(99), None));

        assert!(matches!(res, Err(Error::DanglingReferenceError(_))));
    }

    #[test]
    fn deleting_a_director_clears_the_reference() {
        let mut conn = memory_conn();
        let d = create_director(&mut conn, Some("Gone".to_string())).unwrap();
        let id = create_movie(&mut conn, &movie_titled("left behind", Some(d), None)).unwrap();

        assert!(delete_director(&mut conn, d).unwrap());

        let found = find_one_movie(&mut conn, id).unwrap().unwrap();
        assert_eq!(found.movie.director_id, None);
        assert_eq!(found.director, None);
    }

    #[test]
    fn empty_update_touches_nothing() {
        let mut conn = memory_conn();
        let id = create_movie(&mut conn, &movie_titled("still", None, None)).unwrap();

        assert_eq!(update_movie(&mut conn, id, &UpdateMovieParams::default()).unwrap(), 0);
    }

    #[test]
    fn rename_reports_missing_rows() {
        let mut conn = memory_conn();
        let g = create_genre(&mut conn, Some("Noir".to_string())).unwrap();

        assert_eq!(rename_genre(&mut conn, g, Some("Neo-noir".to_string())).unwrap(), 1);
        assert_eq!(rename_genre(&mut conn, g + 1, Some("Nothing".to_string())).unwrap(), 0);
        assert_eq!(find_genres(&mut conn).unwrap(), vec![Genre { id: g, name: Some("Neo-noir".to_string()) }]);
    }
}
