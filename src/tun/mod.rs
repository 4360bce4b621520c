pub mod builder;
pub mod capture;
pub mod directive;
pub mod rgflags;

pub use builder::{TracingTunBuilder, TunBuilder};
pub use capture::TunBuilderCapture;
pub use directive::TunDirective;
pub use rgflags::RedirectGatewayFlags;
