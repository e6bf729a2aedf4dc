pub mod billing;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod invoice_service;
pub mod models;
