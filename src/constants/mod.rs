use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("{0} must be set in .env file or environment variable")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Env {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: &str) -> Result<T, EnvError> {
    let value = var_or(name, default);
    value.parse::<T>().map_err(|_| EnvError::Invalid { name, value })
}

impl Env {
    /// Reads the process environment, after merging a `.env` file if present.
    pub fn load() -> Result<Self, EnvError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    fn from_env() -> Result<Self, EnvError> {
        let jwt_secret = std::env::var("SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(EnvError::Missing("SECRET_KEY"))?;

        let access_token_expiration = parse_var::<u64>("ACCESS_TOKEN_EXPIRATION", "86400")?;
        let storage_backend = parse_var::<StorageBackend>("STORAGE_BACKEND", "postgres")?;

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(EnvError::Missing("DATABASE_URL"));
        }

        let frontend_url = var_or("FRONTEND_URL", "http://localhost:5173");
        let ip = var_or("IP", "127.0.0.1");
        let port = parse_var::<u16>("PORT", "8080")?;

        Ok(Env {
            jwt_secret,
            access_token_expiration,
            storage_backend,
            database_url,
            frontend_url,
            ip,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("postgres".parse(), Ok(StorageBackend::Postgres));
        assert_eq!("Memory".parse(), Ok(StorageBackend::Memory));
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_env_error_message() {
        let err = EnvError::Invalid { name: "PORT", value: "abc".into() };
        assert_eq!(err.to_string(), "PORT has an invalid value: abc");
        assert_eq!(
            EnvError::Missing("SECRET_KEY").to_string(),
            "SECRET_KEY must be set in .env file or environment variable"
        );
    }
}
