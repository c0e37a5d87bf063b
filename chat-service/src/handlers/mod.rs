pub mod generate;
pub mod health;

pub use generate::generate;
pub use health::{health_check, render_metrics};
