pub mod common;

mod catalog_test;
mod cli_test;
mod dashboard_test;
mod postgres_test;
