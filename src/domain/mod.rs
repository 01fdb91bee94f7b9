pub mod chat;
pub mod competitive;
pub mod landscape;
pub mod mode;
pub mod naics;
pub mod params;
pub mod request;
pub mod response;
pub mod stats;
