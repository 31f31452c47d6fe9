pub mod capture_variables;
pub(crate) mod check_names;
pub mod forward;
pub mod parse_headers;
pub mod proxy_server;
pub mod render_response;
pub(crate) mod script_lexer;
pub mod script_parser;
pub mod send_request;
pub mod show_result_with_table;
pub mod store;
pub mod substitute_env_vars;
