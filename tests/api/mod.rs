mod application_tests;
mod form_tests;
mod health_tests;
mod pricing_tests;
mod upload_tests;
