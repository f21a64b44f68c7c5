#![doc = "The `taskdeck` library crate."]
#![doc = ""]
#![doc = "This crate contains the core business logic for the taskdeck API: user"]
#![doc = "credential handling, JWT issuance and verification, the request guard,"]
#![doc = "owner-scoped task storage, the list filter/sort engine, and the daily"]
#![doc = "stats aggregator. The binary (`main.rs`) wires it into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod routes;
pub mod stats;
