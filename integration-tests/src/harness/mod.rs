pub mod server;
pub mod tracing;
pub mod upstream;

pub use server::TestServer;
pub use self::tracing::{CapturedEvent, init_test_tracing};
pub use upstream::ScriptedUpstream;
