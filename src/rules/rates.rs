use crate::config::RulesConfig;
use crate::models::Role;
use std::collections::HashMap;

/// 工种 -> 标准时薪
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<Role, f64>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(rules: &RulesConfig) -> Self {
        let mut table = Self::new();
        table.set(Role::MainOperator, rules.rate_main_operator);
        table.set(Role::SecondOperator, rules.rate_second_operator);
        table.set(Role::Yard, rules.rate_yard);
        table.set(Role::TravelDriver, rules.rate_travel_driver);
        table.set(Role::TravelPassenger, rules.rate_travel_passenger);
        table
    }

    /// 设置或覆盖某工种费率 (例如按分包商覆盖)
    pub fn set(&mut self, role: Role, rate: f64) {
        self.rates.insert(role, rate);
    }

    /// 在当前表上叠加覆盖项, 覆盖项优先
    pub fn with_overrides(&self, overrides: &RateTable) -> RateTable {
        let mut merged = self.clone();
        for (role, rate) in &overrides.rates {
            merged.set(*role, *rate);
        }
        merged
    }

    /// 未配置的工种返回 0.0, 由费率检查标记为不一致
    pub fn expected_rate(&self, role: Role) -> f64 {
        self.rates.get(&role).copied().unwrap_or(0.0)
    }
}
