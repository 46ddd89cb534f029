//! Job board web application: authenticated users manage job postings
//! through server-rendered pages backed by PostgreSQL.

pub mod api;
pub mod config;
pub mod db;
pub mod shutdown;
pub mod telemetry;
