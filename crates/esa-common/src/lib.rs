pub mod env;
pub mod esa;
pub mod mcp_api;
