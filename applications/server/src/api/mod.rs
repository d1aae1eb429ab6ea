/// API route modules
pub mod auth;
pub mod health;
pub mod lastfm;
pub mod library;
pub mod limits;
pub mod merge;
pub mod transfer;
