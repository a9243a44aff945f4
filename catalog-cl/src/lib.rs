//! Async client for the movie catalog http api.

use log::debug;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CatalogError::{MissingLocation, UnexpectedStatusCode};

pub struct CatalogConfig {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Director {
    pub id: i32,
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub trailer: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub director_id: Option<i32>,
    pub director: Option<String>,
    pub genre_id: Option<i32>,
    pub genre: Option<String>,
}

/// Body for creating a movie, or for a partial update where unset fields
/// are left untouched by the server.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MovieRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<i32>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MovieFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<i32>,
}

#[derive(Serialize)]
struct NameRequest<'a> {
    name: &'a str,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("error calling server: {0}")]
    ClientError(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    UnexpectedStatusCode(StatusCode),
    #[error("created response had no usable location header")]
    MissingLocation,
}

fn created_id(headers: &HeaderMap) -> Result<i32, CatalogError> {
    headers.get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|loc| loc.trim_end_matches('/').rsplit('/').next())
        .and_then(|id| id.parse().ok())
        .ok_or(MissingLocation)
}

async fn list<T: DeserializeOwned, Q: Serialize>(
    cfg: &CatalogConfig,
    collection: &str,
    query: &Q,
) -> Result<Vec<T>, CatalogError> {
    let res = reqwest::Client::new()
        .get(format!("{}/{}/", cfg.url, collection))
        .query(query)
        .header("Accept", "application/json")
        .send()
        .await?;

    match res.status() {
        StatusCode::OK => Ok(res.json().await?),
        unexpected => Err(UnexpectedStatusCode(unexpected))
    }
}

async fn get_one<T: DeserializeOwned>(
    cfg: &CatalogConfig,
    collection: &str,
    id: i32,
) -> Result<Option<T>, CatalogError> {
    let res = reqwest::Client::new()
        .get(format!("{}/{}/{}", cfg.url, collection, id))
        .header("Accept", "application/json")
        .send()
        .await?;

    match res.status() {
        StatusCode::OK => Ok(Some(res.json().await?)),
        StatusCode::NOT_FOUND => Ok(None),
        unexpected => Err(UnexpectedStatusCode(unexpected))
    }
}

async fn create<B: Serialize>(
    cfg: &CatalogConfig,
    collection: &str,
    body: &B,
) -> Result<i32, CatalogError> {
    let res = reqwest::Client::new()
        .post(format!("{}/{}/", cfg.url, collection))
        .json(body)
        .header("Accept", "application/json")
        .send()
        .await?;

    match res.status() {
        StatusCode::CREATED => {
            let id = created_id(res.headers())?;
            debug!("created {} id={}", collection, id);
            Ok(id)
        }
        unexpected => Err(UnexpectedStatusCode(unexpected))
    }
}

/// `Ok(false)` when the server refused the update or has no such row.
async fn update<B: Serialize>(
    cfg: &CatalogConfig,
    collection: &str,
    id: i32,
    body: &B,
) -> Result<bool, CatalogError> {
    let res = reqwest::Client::new()
        .put(format!("{}/{}/{}", cfg.url, collection, id))
        .json(body)
        .send()
        .await?;

    match res.status() {
        StatusCode::NO_CONTENT => Ok(true),
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => Ok(false),
        unexpected => Err(UnexpectedStatusCode(unexpected))
    }
}

async fn delete(
    cfg: &CatalogConfig,
    collection: &str,
    id: i32,
) -> Result<bool, CatalogError> {
    let res = reqwest::Client::new()
        .delete(format!("{}/{}/{}", cfg.url, collection, id))
        .send()
        .await?;

    match res.status() {
        StatusCode::NO_CONTENT => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        unexpected => Err(UnexpectedStatusCode(unexpected))
    }
}

pub async fn list_movies(cfg: &CatalogConfig, filter: &MovieFilter) -> Result<Vec<Movie>, CatalogError> {
    list(cfg, "movies", filter).await
}

pub async fn get_movie(cfg: &CatalogConfig, id: i32) -> Result<Option<Movie>, CatalogError> {
    get_one(cfg, "movies", id).await
}

pub async fn create_movie(cfg: &CatalogConfig, req: &MovieRequest) -> Result<i32, CatalogError> {
    create(cfg, "movies", req).await
}

pub async fn update_movie(cfg: &CatalogConfig, id: i32, req: &MovieRequest) -> Result<bool, CatalogError> {
    update(cfg, "movies", id, req).await
}

pub async fn delete_movie(cfg: &CatalogConfig, id: i32) -> Result<bool, CatalogError> {
    delete(cfg, "movies", id).await
}

pub async fn list_directors(cfg: &CatalogConfig) -> Result<Vec<Director>, CatalogError> {
    list(cfg, "directors", &()).await
}

pub async fn get_director(cfg: &CatalogConfig, id: i32) -> Result<Option<Director>, CatalogError> {
    get_one(cfg, "directors", id).await
}

pub async fn create_director(cfg: &CatalogConfig, name: &str) -> Result<i32, CatalogError> {
    create(cfg, "directors", &NameRequest { name }).await
}

pub async fn rename_director(cfg: &CatalogConfig, id: i32, name: &str) -> Result<bool, CatalogError> {
    update(cfg, "directors", id, &NameRequest { name }).await
}

pub async fn delete_director(cfg: &CatalogConfig, id: i32) -> Result<bool, CatalogError> {
    delete(cfg, "directors", id).await
}

pub async fn list_genres(cfg: &CatalogConfig) -> Result<Vec<Genre>, CatalogError> {
    list(cfg, "genres", &()).await
}

pub async fn get_genre(cfg: &CatalogConfig, id: i32) -> Result<Option<Genre>, CatalogError> {
    get_one(cfg, "genres", id).await
}

pub async fn create_genre(cfg: &CatalogConfig, name: &str) -> Result<i32, CatalogError> {
    create(cfg, "genres", &NameRequest { name }).await
}

pub async fn rename_genre(cfg: &CatalogConfig, id: i32, name: &str) -> Result<bool, CatalogError> {
    update(cfg, "genres", id, &NameRequest { name }).await
}

pub async fn delete_genre(cfg: &CatalogConfig, id: i32) -> Result<bool, CatalogError> {
    delete(cfg, "genres", id).await
}
