use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("catalog YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid route '{0}', expected FROM-TO")]
    InvalidRoute(String),
    #[error("route {route} of {airline} references unknown airport {airport}")]
    UnknownAirport {
        airline: String,
        route: String,
        airport: String,
    },
    #[error("airport {0} has out of range coordinates")]
    InvalidAirport(String),
}
