pub mod analysis_route;
pub mod chat_route;
pub mod default_route;
pub mod mode_route;
pub mod reference_route;
