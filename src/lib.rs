pub mod api_router;
pub mod auth;
pub mod bootstrap;
pub mod clients;
pub mod company;
pub mod config;
pub mod estimations;
pub mod members;
pub mod middleware;
pub mod projects;
pub mod security;
pub mod shared;
pub mod vendors;
