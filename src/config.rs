use crate::error::{ReconError, ReconResult};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub lookup: LookupConfig,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// 慢查询日志阈值 (秒)
    pub slow_statement_secs: u64,
}

/// 佐证查询与批量对账参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    pub timeout_secs: u64,
    pub batch_concurrency: usize,
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 计费规则: 各工种标准时薪与工时上限, 无默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub rate_main_operator: f64,
    pub rate_second_operator: f64,
    pub rate_yard: f64,
    pub rate_travel_driver: f64,
    pub rate_travel_passenger: f64,
    pub yard_day_max_hours: f64,
    pub full_shift_hours: f64,
}

impl RulesConfig {
    /// 校验费率与阈值, 非法值直接报错而不是按 0 处理
    pub fn validate(&self) -> ReconResult<()> {
        let rates = [
            ("rate_main_operator", self.rate_main_operator),
            ("rate_second_operator", self.rate_second_operator),
            ("rate_yard", self.rate_yard),
            ("rate_travel_driver", self.rate_travel_driver),
            ("rate_travel_passenger", self.rate_travel_passenger),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(ReconError::Configuration(format!(
                    "rules.{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let thresholds = [
            ("yard_day_max_hours", self.yard_day_max_hours),
            ("full_shift_hours", self.full_shift_hours),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value <= 0.0 {
                return Err(ReconError::Configuration(format!(
                    "rules.{name} must be a positive number, got {value}"
                )));
            }
        }

        Ok(())
    }
}

impl AppConfig {
    /// 加载配置: 默认值 < config/recon.toml < RECON__* 环境变量 < DATABASE_URL
    pub fn load() -> ReconResult<Self> {
        Self::load_from("config/recon")
    }

    pub fn load_from(file: &str) -> ReconResult<Self> {
        let settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "postgres://localhost/subcontractor_recon")?
            .set_default("database.max_connections", 10)?
            .set_default("database.slow_statement_secs", 2)?
            .set_default("lookup.timeout_secs", 30)?
            .set_default("lookup.batch_concurrency", 4)?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("RECON")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReconResult<()> {
        if self.lookup.timeout_secs == 0 {
            return Err(ReconError::Configuration(
                "lookup.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.lookup.batch_concurrency == 0 {
            return Err(ReconError::Configuration(
                "lookup.batch_concurrency must be at least 1".to_string(),
            ));
        }
        self.rules.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RulesConfig {
        RulesConfig {
            rate_main_operator: 25.0,
            rate_second_operator: 18.0,
            rate_yard: 17.0,
            rate_travel_driver: 17.0,
            rate_travel_passenger: 13.0,
            yard_day_max_hours: 9.0,
            full_shift_hours: 8.5,
        }
    }

    #[test]
    fn accepts_standard_rules() {
        assert!(rules().validate().is_ok());
    }

    #[test]
    fn rejects_negative_rate() {
        let mut r = rules();
        r.rate_yard = -1.0;
        let err = r.validate().unwrap_err();
        assert!(matches!(err, ReconError::Configuration(msg) if msg.contains("rate_yard")));
    }

    #[test]
    fn rejects_zero_threshold() {
        let mut r = rules();
        r.full_shift_hours = 0.0;
        assert!(matches!(r.validate(), Err(ReconError::Configuration(_))));
    }

    fn app_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/subcontractor_recon".to_string(),
                max_connections: 10,
                slow_statement_secs: 2,
            },
            lookup: LookupConfig {
                timeout_secs: 30,
                batch_concurrency: 4,
            },
            rules: rules(),
        }
    }

    #[test]
    fn rejects_zero_lookup_timeout() {
        assert!(app_config().validate().is_ok());

        let mut config = app_config();
        config.lookup.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ReconError::Configuration(msg) if msg.contains("timeout_secs")));
    }

    #[test]
    fn rejects_zero_batch_concurrency() {
        let mut config = app_config();
        config.lookup.batch_concurrency = 0;
        assert!(matches!(config.validate(), Err(ReconError::Configuration(_))));
    }

    #[test]
    fn missing_rules_fail_fast() {
        // 没有配置文件时规则段缺失, 必须报配置错误
        let result = AppConfig::load_from("does/not/exist/recon");
        if std::env::var("RECON__RULES__RATE_MAIN_OPERATOR").is_err() {
            assert!(matches!(result, Err(ReconError::Configuration(_))));
        }
    }
}
