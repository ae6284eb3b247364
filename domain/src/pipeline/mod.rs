//! Pipeline vocabulary shared by the engine and its hooks

pub mod params;
pub mod stage;

pub use params::ExtraParams;
pub use stage::Stage;
