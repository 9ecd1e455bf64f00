//! End-to-end tests for the crawler and the link validator
//!
//! Both subsystems are driven against wiremock servers, with outputs written
//! to temporary directories.

mod check_tests;
mod crawl_tests;
