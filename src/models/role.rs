use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 工种 (发票行上的角色)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    MainOperator,
    SecondOperator,
    Yard,
    TravelDriver,
    TravelPassenger,
    /// 无法识别的角色标签, 费率解析为 0.0
    Unknown,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::MainOperator,
        Role::SecondOperator,
        Role::Yard,
        Role::TravelDriver,
        Role::TravelPassenger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::MainOperator => "main_operator",
            Role::SecondOperator => "second_operator",
            Role::Yard => "yard",
            Role::TravelDriver => "travel_driver",
            Role::TravelPassenger => "travel_passenger",
            Role::Unknown => "unknown",
        }
    }

    /// 宽松解析存储中的角色文本: 忽略大小写, 空格和连字符视为下划线
    pub fn parse_label(label: &str) -> Role {
        let normalized: String = label
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "main_operator" => Role::MainOperator,
            "second_operator" => Role::SecondOperator,
            "yard" => Role::Yard,
            "travel_driver" => Role::TravelDriver,
            "travel_passenger" => Role::TravelPassenger,
            _ => Role::Unknown,
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::parse_label(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
