// Library for tests to access modules

pub mod address_repo;
pub mod aggregator;
pub mod capture;
pub mod classifier;
pub mod config;
pub mod history;
pub mod models;
pub mod refresh_worker;
pub mod routes;
pub mod sink;
pub mod version;
pub mod worker;
