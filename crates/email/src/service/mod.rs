mod email;
mod kafka;

pub use self::email::SmtpMailer;
pub use self::kafka::KafkaOrderEmailService;
