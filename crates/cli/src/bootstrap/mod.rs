mod config;
mod logging;

pub use config::{load_config, load_dotenv};
pub use logging::init_logging;
