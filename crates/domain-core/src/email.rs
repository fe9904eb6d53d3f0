//! 邮箱地址值对象

use std::hash::{Hash, Hasher};
use std::str::FromStr;

use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use tracing::debug;

use crate::metrics;
use crate::value_object::ValueObject;

/// 域名语法：点分标签，每段 1-63 个字母数字字符，允许中间出现连字符
const DOMAIN_PATTERN: &str = r"[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*";

/// 宽松的完整地址语法，仅用于预检
///
/// 正则并不能完整描述 RFC 5322，这里只覆盖常见写法
static ADDRESS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{{|}}~-]+@{DOMAIN_PATTERN}$")).unwrap()
});

static DOMAIN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{DOMAIN_PATTERN}$")).unwrap());

/// 检查字符串是否为合法的邮箱地址（不构造值对象）
pub fn is_valid_address(input: &str) -> bool {
    ADDRESS_REGEX.is_match(input)
}

/// 本地部分大小写策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalPartCase {
    /// 统一转为小写（默认，多数服务商对本地部分不区分大小写）
    #[default]
    Lowercase,
    /// 保留原样
    Preserve,
}

/// 邮箱规范化配置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailNormalization {
    #[serde(default)]
    pub local_part_case: LocalPartCase,
}

impl EmailNormalization {
    pub fn preserving_local_part() -> Self {
        Self {
            local_part_case: LocalPartCase::Preserve,
        }
    }
}

/// 邮箱地址值对象
///
/// 以最后一个 `@` 切分本地部分与域名部分。域名总是转为小写，
/// 本地部分按 [`EmailNormalization`] 处理。
///
/// 相等性：域名不区分大小写，本地部分区分大小写，原始输入不参与比较。
#[derive(Debug, Clone, Default, Display)]
#[display("{local_part}@{domain_part}")]
pub struct EmailAddress {
    local_part: String,
    domain_part: String,
    raw_input: String,
}

impl EmailAddress {
    /// 从原始字符串解析（默认规范化策略）
    pub fn from_string(input: &str) -> Result<Self, EmailAddressError> {
        Self::from_string_with(input, &EmailNormalization::default())
    }

    /// 按指定规范化策略从原始字符串解析
    pub fn from_string_with(
        input: &str,
        normalization: &EmailNormalization,
    ) -> Result<Self, EmailAddressError> {
        let (local_part, domain_part) = split_address(input).inspect_err(|err| {
            debug!(reason = err.reason(), "Rejected email address input");
            metrics::record_email_parse_failure(err.reason());
        })?;

        let local_part = match normalization.local_part_case {
            LocalPartCase::Lowercase => local_part.to_lowercase(),
            LocalPartCase::Preserve => local_part.to_string(),
        };

        Ok(Self {
            local_part,
            domain_part: domain_part.to_lowercase(),
            raw_input: input.to_string(),
        })
    }

    /// 直接由本地部分和域名部分构造
    ///
    /// 不做规范化也不做校验，调用方需自行保证部件合法。
    pub fn from_local_and_domain_parts(
        local_part: impl Into<String>,
        domain_part: impl Into<String>,
    ) -> Self {
        Self {
            local_part: local_part.into(),
            domain_part: domain_part.into(),
            raw_input: String::new(),
        }
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    pub fn domain_part(&self) -> &str {
        &self.domain_part
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    /// 结构性校验：两个部分均非空
    ///
    /// 不会重新执行域名语法检查，由 [`from_local_and_domain_parts`](Self::from_local_and_domain_parts)
    /// 构造的值可能通过此检查但并不合法。
    pub fn is_statically_valid(&self) -> bool {
        !self.local_part.is_empty() && !self.domain_part.is_empty()
    }
}

/// 切分并校验地址，返回未规范化的 (本地部分, 域名部分)
fn split_address(input: &str) -> Result<(&str, &str), EmailAddressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EmailAddressError::EmptyInput);
    }

    let (local_part, domain_part) = trimmed
        .rsplit_once('@')
        .ok_or(EmailAddressError::Malformed)?;

    if local_part.is_empty() {
        return Err(EmailAddressError::LocalPartEmpty);
    }
    if domain_part.is_empty() || !DOMAIN_REGEX.is_match(domain_part) {
        return Err(EmailAddressError::DomainPartMalformed);
    }

    Ok((local_part, domain_part))
}

fn domain_chars(domain: &str) -> impl Iterator<Item = char> + '_ {
    domain.chars().flat_map(char::to_lowercase)
}

impl PartialEq for EmailAddress {
    fn eq(&self, other: &Self) -> bool {
        self.local_part == other.local_part
            && domain_chars(&self.domain_part).eq(domain_chars(&other.domain_part))
    }
}

impl Eq for EmailAddress {}

impl Hash for EmailAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.local_part.hash(state);
        for c in domain_chars(&self.domain_part) {
            c.hash(state);
        }
    }
}

impl ValueObject for EmailAddress {
    fn is_statically_valid(&self) -> bool {
        EmailAddress::is_statically_valid(self)
    }

    fn raw_input(&self) -> &str {
        &self.raw_input
    }
}

impl FromStr for EmailAddress {
    type Err = EmailAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_string(value)
    }
}

impl Serialize for EmailAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EmailAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        // 空地址的规范形式
        if s == "@" {
            return Ok(Self::default());
        }
        s.parse().map_err(de::Error::custom)
    }
}

/// 邮箱地址错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailAddressError {
    #[error("Email address is empty")]
    EmptyInput,

    #[error("Email address is malformed: missing '@'")]
    Malformed,

    #[error("Email address local part is empty")]
    LocalPartEmpty,

    #[error("Email address domain part is malformed")]
    DomainPartMalformed,
}

impl EmailAddressError {
    /// 用于日志和指标的简短原因
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::Malformed => "malformed",
            Self::LocalPartEmpty => "local_part_empty",
            Self::DomainPartMalformed => "domain_part_malformed",
        }
    }
}
