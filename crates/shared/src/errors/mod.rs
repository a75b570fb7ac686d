mod handler;
mod service;

pub use self::handler::HandlerError;
pub use self::service::ServiceError;
