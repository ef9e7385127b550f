use db_pool::env_utils::{parse_env_or, require_env};
use std::env;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub jwt: JwtConfig,
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

// Default value functions
fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    3001
}

fn default_cors_origins() -> String {
    "http://localhost:5173".to_string()
}

fn default_jwt_ttl_hours() -> i64 {
    crypto_core::jwt::DEFAULT_TOKEN_TTL_HOURS
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, String> {
        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| default_app_env()),
            host: env::var("SERVER_HOST").unwrap_or_else(|_| default_app_host()),
            port: parse_env_or("SERVER_PORT", default_app_port())?,
        };

        let allowed_origins: Vec<String> = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| default_cors_origins())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        if app.env == "production" && allowed_origins.iter().any(|origin| origin == "*") {
            return Err("CORS_ALLOWED_ORIGINS must not contain '*' in production".to_string());
        }

        let jwt = JwtConfig {
            secret: require_env("JWT_SECRET")?,
            ttl_hours: parse_env_or("JWT_TTL_HOURS", default_jwt_ttl_hours())?,
        };

        if jwt.ttl_hours <= 0 {
            return Err(format!("JWT_TTL_HOURS must be positive, got {}", jwt.ttl_hours));
        }

        Ok(Config {
            app,
            cors: CorsConfig { allowed_origins },
            jwt,
            run_migrations: parse_env_or("RUN_MIGRATIONS", true)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "SERVER_HOST",
            "SERVER_PORT",
            "CORS_ALLOWED_ORIGINS",
            "JWT_SECRET",
            "JWT_TTL_HOURS",
            "RUN_MIGRATIONS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_env(), "development");
        assert_eq!(default_app_host(), "0.0.0.0");
        assert_eq!(default_app_port(), 3001);
        assert_eq!(default_jwt_ttl_hours(), 24);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        env::set_var("JWT_SECRET", "test-secret");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 3001);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.jwt.ttl_hours, 24);
        assert!(config.run_migrations);
        assert!(!config.is_production());
        assert_eq!(config.bind_address(), "0.0.0.0:3001");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_jwt_secret_required() {
        clear_env();
        assert!(Config::from_env().is_err());

        env::set_var("JWT_SECRET", "   ");
        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_wildcard_origin_rejected_in_production() {
        clear_env();
        env::set_var("JWT_SECRET", "test-secret");
        env::set_var("CORS_ALLOWED_ORIGINS", "https://app.example.com, *");

        assert!(Config::from_env().is_ok());

        env::set_var("APP_ENV", "production");
        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_rejected() {
        clear_env();
        env::set_var("JWT_SECRET", "test-secret");

        env::set_var("SERVER_PORT", "not-a-port");
        assert!(Config::from_env().is_err());
        env::remove_var("SERVER_PORT");

        env::set_var("JWT_TTL_HOURS", "0");
        assert!(Config::from_env().is_err());
        env::remove_var("JWT_TTL_HOURS");

        env::set_var("RUN_MIGRATIONS", "false");
        assert!(!Config::from_env().unwrap().run_migrations);

        clear_env();
    }

    #[test]
    fn test_debug_redacts_secret() {
        let jwt = JwtConfig {
            secret: "hunter2".into(),
            ttl_hours: 24,
        };
        assert!(!format!("{:?}", jwt).contains("hunter2"));
    }
}
