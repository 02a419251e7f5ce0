pub mod progress;

pub use progress::{create_spinner, with_spinner};
