pub mod browser;
pub mod classify;
pub mod config;
pub mod credentials;
pub mod fetch;
pub mod output;
pub mod profile;
pub mod report;
pub mod scoring;
pub mod sis;
