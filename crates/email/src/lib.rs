pub mod abstract_trait;
pub mod app;
pub mod dispatch;
pub mod domain;
pub mod handler;
pub mod render;
pub mod service;
pub mod validate;
