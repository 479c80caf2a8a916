mod disposition_tests;
mod sanitize_tests;
