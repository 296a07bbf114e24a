use std::str::FromStr;
use tracing::Level;
use crate::core::domain::Configuration;

pub fn log_level(config: &Configuration) -> Level {
    Level::from_str(config.log_level.as_str()).unwrap_or(Level::INFO)
}

pub fn setup_tracing(config: &Configuration) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(log_level(config))
        // disable printing the name of the module in every log line.
        .with_target(false);
    if config.lambda {
        // CloudWatch adds the ingestion time and does not render ANSI color codes.
        builder
            .with_ansi(false)
            .without_time()
            .json()
            .init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use tracing::Level;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::utils::logs::log_level;

    #[test]
    fn test_should_parse_log_level() {
        let mut config = Configuration::new(RepositoryStore::Memory);
        assert_eq!(Level::INFO, log_level(&config));
        config.log_level = "debug".to_string();
        assert_eq!(Level::DEBUG, log_level(&config));
        config.log_level = "loud".to_string();
        assert_eq!(Level::INFO, log_level(&config));
    }
}
