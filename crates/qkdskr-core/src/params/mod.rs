pub mod defaults;
pub mod format;
pub mod model;
pub mod record;

pub use model::{ConcentrationMethod, QkdParameters};
pub use record::{load_json, ParameterRecord};
