pub mod args;
pub mod capture_rule;
pub mod environment;
pub mod proxy_form;
pub mod result;
pub mod saved_request;
pub mod store_data;
pub mod test_script;
pub mod workspace;
