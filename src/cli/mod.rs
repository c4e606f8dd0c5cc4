//! Terminal front end: tables, prompts and the interactive chat

pub mod chat;
pub mod currency;
pub mod reset;
pub mod setup;
pub mod summary;
pub mod transactions;
pub mod ui;
