//! DevShell Network
//!
//! Re-fetches main-frame documents so the `content-security-policy` response
//! header can be removed before the renderer sees the page. Any request the
//! interceptor declines, or fails to fetch, is left to the renderer.

mod error;
mod html;
mod interceptor;

pub use error::NetError;
pub use html::inject_base_href;
pub use interceptor::{
    CspInterceptor, InterceptedResponse, InterceptorConfig, ResourceRequest, CSP_HEADER,
};

pub type Result<T> = std::result::Result<T, NetError>;
