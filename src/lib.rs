pub mod config;
pub mod models;
pub mod money;
pub mod pipeline;
pub mod plan;
pub mod preferences;
pub mod purge;
pub mod routes;
pub mod state;
pub mod tenant;
