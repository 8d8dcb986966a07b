//! The integration tests, registered with the test inventory

mod redeploy;
