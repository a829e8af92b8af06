pub mod health;
pub mod realtime;
pub mod status;
