use serde::Deserialize;

const DEV_JWT_SECRET: &str = "dev-secret-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn from_env() -> Self {
        match std::env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://mesto2022.nomoredomains.sbs".into(),
                "https://mesto2022.nomoredomains.sbs".into(),
                "http://localhost:3000".into(),
                "https://localhost:3000".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = Environment::from_env();
        let database_url = std::env::var("DATABASE_URL")?;

        // The development key must never sign production tokens.
        let secret = match (environment, std::env::var("JWT_SECRET")) {
            (_, Ok(secret)) => secret,
            (Environment::Production, Err(_)) => {
                anyhow::bail!("JWT_SECRET must be set when APP_ENV=production")
            }
            (Environment::Development, Err(_)) => DEV_JWT_SECRET.into(),
        };

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mesto".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mesto-users".into()),
            ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };

        let cors = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .map(|v| parse_origins(&v))
            .filter(|origins| !origins.is_empty())
            .map(|allowed_origins| CorsConfig { allowed_origins })
            .unwrap_or_default();

        Ok(Self {
            environment,
            database_url,
            jwt,
            cors,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
