pub mod builtin;
mod error;
mod format;
mod loader;
mod model;

pub use error::{PersonaError, PersonaResult};
pub use format::DocumentFormat;
pub use loader::{from_str, load_from_path, save_to_path, to_string};
pub use model::{ExamplePair, PersonaConfig};
