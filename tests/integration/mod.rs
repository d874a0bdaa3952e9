//! Integration tests for poison-demo.

pub mod binary_test;
pub mod mysql_test;
pub mod postgres_test;
pub mod render_test;
pub mod workload_test;
