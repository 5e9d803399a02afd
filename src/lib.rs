pub mod config;
pub mod link;
pub mod link_server;
pub mod mav_bridge;
pub mod protocol;
pub mod util;
pub mod web_server;
