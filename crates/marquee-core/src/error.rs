use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Marquee service is no longer running")]
    ServiceClosed,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        fn read() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }

        let err = read().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "IO error: gone");
    }

    #[test]
    fn test_service_closed_message() {
        assert_eq!(
            Error::ServiceClosed.to_string(),
            "Marquee service is no longer running"
        );
    }
}
