pub mod agenda;
pub mod calendar;
pub mod compose;
pub mod config;
pub mod events;
pub mod notification;
pub mod provider;
pub mod render;
pub mod ui;
