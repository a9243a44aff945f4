use std::fmt;

use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use serde_with::{serde_as, NoneAsEmptyString};

use crate::db::schema::{director, genre, movie};

pub mod action;
pub mod error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Movie,
    Director,
    Genre,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Movie => f.write_str("Movie"),
            Resource::Director => f.write_str("Director"),
            Resource::Genre => f.write_str("Genre"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Identifiable, Queryable, Selectable, PartialEq)]
#[diesel(table_name = director, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Director {
    pub id: i32,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Identifiable, Queryable, Selectable, PartialEq)]
#[diesel(table_name = genre, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Genre {
    pub id: i32,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Identifiable, Queryable, Selectable, PartialEq)]
#[diesel(table_name = movie, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Movie {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub trailer: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub director_id: Option<i32>,
    pub genre_id: Option<i32>,
}

/// A movie as served over http, carrying the names of its director and
/// genre next to the raw foreign keys.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MovieView {
    #[serde(flatten)]
    pub movie: Movie,
    pub director: Option<String>,
    pub genre: Option<String>,
}

impl From<(Movie, Option<String>, Option<String>)> for MovieView {
    fn from((movie, director, genre): (Movie, Option<String>, Option<String>)) -> Self {
        MovieView { movie, director, genre }
    }
}

/// List filters. `?director_id=` with no value filters nothing.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieFilter {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub director_id: Option<i32>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub genre_id: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize, Insertable)]
#[diesel(table_name = movie)]
pub struct CreateMovieParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub trailer: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub director_id: Option<i32>,
    pub genre_id: Option<i32>,
}

/// Partial movie update. An absent key leaves the column alone, an explicit
/// `null` clears it.
#[derive(Clone, Debug, Default, Deserialize, AsChangeset)]
#[serde(deny_unknown_fields)]
#[diesel(table_name = movie)]
pub struct UpdateMovieParams {
    #[serde(default, with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub trailer: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub year: Option<Option<i32>>,
    #[serde(default, with = "double_option")]
    pub rating: Option<Option<f64>>,
    #[serde(default, with = "double_option")]
    pub director_id: Option<Option<i32>>,
    #[serde(default, with = "double_option")]
    pub genre_id: Option<Option<i32>>,
}

impl UpdateMovieParams {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.trailer.is_none()
            && self.year.is_none()
            && self.rating.is_none()
            && self.director_id.is_none()
            && self.genre_id.is_none()
    }
}

/// Body of a director or genre create.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateNamedParams {
    pub name: Option<String>,
}

/// Body of a director or genre update. Only `name` is applied, every other
/// key is ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateNamedParams {
    #[serde(default, with = "double_option")]
    pub name: Option<Option<String>>,
}
