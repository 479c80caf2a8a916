mod env;
mod file;
mod inspect;

pub use env::EnvHandler;
pub use file::FileHandler;
pub use inspect::InspectHandler;
