// Test modules for Supermeow
// Shared fixtures live in `support`; each other module covers one area of the crate

mod support;

mod feed_tests;
mod routes_tests;
