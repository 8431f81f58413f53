//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Navigation error: {0}")]
    Navigation(#[from] devshell_navigation::NavigationError),

    #[error("Network error: {0}")]
    Net(#[from] devshell_net::NetError),

    #[error("Configuration error: {0}")]
    Config(String),
}
