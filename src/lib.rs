pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod metrics;
pub mod models;
pub mod schema;
pub mod store;
pub mod validation;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::bb8;

/// Short-hand for the database pool type to use throughout the app.
pub type DbPool = bb8::Pool<AsyncPgConnection>;

pub type Conn<'a> = bb8::PooledConnection<'a, AsyncPgConnection>;
