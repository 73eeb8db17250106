mod config_test;
mod quote_test;
