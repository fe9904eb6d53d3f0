//! 电话号码值对象

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use tracing::debug;

use crate::metrics;
use crate::numbering_plan::{NumberingPlan, NumberingPlanError, default_numbering_plan};
use crate::value_object::ValueObject;

/// 电话号码值对象
///
/// 由国家码和国内号码组成，有效性在构造时向编号计划查询并缓存。
/// 解析得到的号码沿用编号计划对原始输入的判定。
/// 实例持有构造它的编号计划，`with_*` 与格式化都使用同一份规则。
///
/// 相等性只比较国家码和国内号码，原始输入与有效性不参与比较。
#[derive(Clone)]
pub struct PhoneNumber {
    country_code: i32,
    national_number: i64,
    raw_input: String,
    is_valid: bool,
    plan: Arc<dyn NumberingPlan>,
}

impl PhoneNumber {
    /// 由国家码和国内号码构造（默认编号计划）
    ///
    /// # Panics
    ///
    /// `national_number` 为负数时 panic，这是调用方的契约错误。
    pub fn new(country_code: i32, national_number: i64) -> Self {
        Self::new_with(country_code, national_number, default_numbering_plan())
    }

    /// 由国家码和国内号码构造，使用指定的编号计划
    ///
    /// # Panics
    ///
    /// `national_number` 为负数时 panic。
    pub fn new_with(country_code: i32, national_number: i64, plan: Arc<dyn NumberingPlan>) -> Self {
        assert!(
            national_number >= 0,
            "national number must not be negative, got {national_number}"
        );

        Self {
            country_code,
            national_number,
            raw_input: String::new(),
            is_valid: plan.is_valid_number(country_code, national_number),
            plan,
        }
    }

    /// 从国际格式字符串解析（默认编号计划）
    pub fn from_string(input: &str) -> Result<Self, PhoneNumberError> {
        Self::from_string_with(input, default_numbering_plan())
    }

    /// 从国际格式字符串解析，使用指定的编号计划
    pub fn from_string_with(
        input: &str,
        plan: Arc<dyn NumberingPlan>,
    ) -> Result<Self, PhoneNumberError> {
        Self::from_string_in_region(input, None, plan)
    }

    /// 带区域提示解析，允许国内格式输入（如 `"0812 3456 7890"` + `"ID"`）
    pub fn from_string_in_region(
        input: &str,
        region_hint: Option<&str>,
        plan: Arc<dyn NumberingPlan>,
    ) -> Result<Self, PhoneNumberError> {
        let effective = repair_doubled_prefix(input);

        let parsed = plan.parse(effective, region_hint).map_err(|err| {
            let err = PhoneNumberError::from(err);
            debug!(reason = err.reason(), error = %err, "Rejected phone number input");
            metrics::record_phone_parse_failure(err.reason());
            err
        })?;

        assert!(
            parsed.national_number >= 0,
            "national number must not be negative, got {}",
            parsed.national_number
        );

        Ok(Self {
            country_code: parsed.country_code,
            national_number: parsed.national_number,
            raw_input: input.to_string(),
            is_valid: parsed.is_valid,
            plan,
        })
    }

    /// 返回替换国家码后的新号码，原始输入被清空
    pub fn with_country_code(&self, country_code: i32) -> Self {
        Self::new_with(country_code, self.national_number, Arc::clone(&self.plan))
    }

    /// 返回替换国内号码后的新号码，原始输入被清空
    ///
    /// # Panics
    ///
    /// `national_number` 为负数时 panic。
    pub fn with_national_number(&self, national_number: i64) -> Self {
        Self::new_with(self.country_code, national_number, Arc::clone(&self.plan))
    }

    pub fn country_code(&self) -> i32 {
        self.country_code
    }

    pub fn national_number(&self) -> i64 {
        self.national_number
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    /// 构造时由编号计划判定的有效性
    pub fn is_statically_valid(&self) -> bool {
        self.is_valid
    }
}

/// 修复客户端重复添加的国家码前缀
///
/// 输入恰好包含两个 `+` 时（如 `"+1+15552323"`），只保留第二个 `+` 及其后的内容。
fn repair_doubled_prefix(input: &str) -> &str {
    if input.matches('+').count() != 2 {
        return input;
    }

    match input.rfind('+') {
        Some(idx) => {
            debug!("Repairing doubled country code prefix in phone number input");
            metrics::record_phone_prefix_repair();
            &input[idx..]
        }
        None => input,
    }
}

impl Default for PhoneNumber {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.country_code == other.country_code && self.national_number == other.national_number
    }
}

impl Eq for PhoneNumber {}

impl Hash for PhoneNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.country_code.hash(state);
        self.national_number.hash(state);
    }
}

impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneNumber")
            .field("country_code", &self.country_code)
            .field("national_number", &self.national_number)
            .field("raw_input", &self.raw_input)
            .field("is_valid", &self.is_valid)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.country_code == 0 && self.national_number == 0 {
            return f.write_str(ZERO_CANONICAL);
        }
        f.write_str(&self.plan.format_e164(self.country_code, self.national_number))
    }
}

impl ValueObject for PhoneNumber {
    fn is_statically_valid(&self) -> bool {
        self.is_valid
    }

    fn raw_input(&self) -> &str {
        &self.raw_input
    }
}

impl FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_string(value)
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 零值号码的规范形式
const ZERO_CANONICAL: &str = "+";

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == ZERO_CANONICAL {
            return Ok(Self::default());
        }
        s.parse().map_err(de::Error::custom)
    }
}

/// 电话号码错误
#[derive(Debug, thiserror::Error)]
pub enum PhoneNumberError {
    #[error("Failed to parse phone number: {0}")]
    Parse(#[from] NumberingPlanError),
}

impl PhoneNumberError {
    /// 用于日志和指标的简短原因
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Parse(NumberingPlanError::UnknownRegion(_)) => "unknown_region",
            Self::Parse(NumberingPlanError::Rejected(_)) => "rejected",
        }
    }
}
