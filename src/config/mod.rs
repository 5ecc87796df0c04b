pub mod settings;

pub use settings::{AppConfig, CalendarConfig, LocationConfig, SalahConfig};
