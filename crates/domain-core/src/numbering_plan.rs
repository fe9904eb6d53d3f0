//! 电话号码编号计划（numbering plan）
//!
//! 号码解析、有效性判定与格式化都委托给编号计划，值对象本身不包含任何
//! 国家码或号码长度数据。默认实现基于 `phonenumber` crate（libphonenumber 元数据）。

use std::error::Error as StdError;
use std::sync::Arc;

use once_cell::sync::Lazy;
use phonenumber::Mode;

/// 编号计划解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedNumber {
    pub country_code: i32,
    pub national_number: i64,
    /// 编号计划对原始号码的判定
    ///
    /// 整数形式会丢失国内号码的前导零（如意大利固话），
    /// 因此解析路径必须使用此值，而不是再次调用 `is_valid_number`。
    pub is_valid: bool,
}

/// 编号计划错误
#[derive(Debug, thiserror::Error)]
pub enum NumberingPlanError {
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Rejected by numbering plan: {0}")]
    Rejected(#[source] Box<dyn StdError + Send + Sync>),
}

impl NumberingPlanError {
    pub fn rejected(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Rejected(err.into())
    }
}

/// 编号计划 trait
///
/// 实现需无副作用，可在多线程间共享。
pub trait NumberingPlan: Send + Sync {
    /// 解析号码；`region_hint` 为 ISO 3166-1 区域码（如 `"ID"`），
    /// 为 `None` 时要求国际格式（以 `+` 开头）
    fn parse(
        &self,
        input: &str,
        region_hint: Option<&str>,
    ) -> Result<ParsedNumber, NumberingPlanError>;

    /// 号码是否符合该国家码的规则（用于由部件构造的号码）
    fn is_valid_number(&self, country_code: i32, national_number: i64) -> bool;

    /// E.164 格式：`+` 国家码 国内号码，无分隔符
    fn format_e164(&self, country_code: i32, national_number: i64) -> String;
}

/// 基于 libphonenumber 元数据的编号计划
#[derive(Debug, Clone, Copy, Default)]
pub struct LibPhoneNumberPlan;

impl LibPhoneNumberPlan {
    /// 由国家码和国内号码还原为 `phonenumber::PhoneNumber`
    ///
    /// 还原结果必须与输入一致，否则视为不存在。
    fn lookup(country_code: i32, national_number: i64) -> Option<phonenumber::PhoneNumber> {
        if country_code <= 0 || national_number < 0 {
            return None;
        }

        let number =
            phonenumber::parse(None, format!("+{country_code}{national_number}")).ok()?;

        let same_code = i32::from(number.code().value()) == country_code;
        let same_national = i64::try_from(number.national().value()).ok() == Some(national_number);
        (same_code && same_national).then_some(number)
    }
}

impl NumberingPlan for LibPhoneNumberPlan {
    fn parse(
        &self,
        input: &str,
        region_hint: Option<&str>,
    ) -> Result<ParsedNumber, NumberingPlanError> {
        let region = region_hint
            .map(|region| {
                region
                    .to_ascii_uppercase()
                    .parse::<phonenumber::country::Id>()
                    .map_err(|_| NumberingPlanError::UnknownRegion(region.to_string()))
            })
            .transpose()?;

        let number = phonenumber::parse(region, input).map_err(NumberingPlanError::rejected)?;

        Ok(ParsedNumber {
            country_code: i32::from(number.code().value()),
            national_number: i64::try_from(number.national().value())
                .map_err(NumberingPlanError::rejected)?,
            is_valid: phonenumber::is_valid(&number),
        })
    }

    fn is_valid_number(&self, country_code: i32, national_number: i64) -> bool {
        Self::lookup(country_code, national_number).is_some_and(|number| phonenumber::is_valid(&number))
    }

    fn format_e164(&self, country_code: i32, national_number: i64) -> String {
        match Self::lookup(country_code, national_number) {
            Some(number) => number.format().mode(Mode::E164).to_string(),
            None => format!("+{country_code}{national_number}"),
        }
    }
}

static DEFAULT_PLAN: Lazy<Arc<dyn NumberingPlan>> = Lazy::new(|| Arc::new(LibPhoneNumberPlan));

/// 进程内共享的默认编号计划
pub fn default_numbering_plan() -> Arc<dyn NumberingPlan> {
    Arc::clone(&DEFAULT_PLAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_international() {
        let parsed = LibPhoneNumberPlan.parse("+1 650-253-0000", None).unwrap();
        assert_eq!(
            parsed,
            ParsedNumber {
                country_code: 1,
                national_number: 6502530000,
                is_valid: true,
            }
        );
    }

    #[test]
    fn test_parse_with_region_hint() {
        let parsed = LibPhoneNumberPlan
            .parse("(650) 253-0000", Some("us"))
            .unwrap();
        assert_eq!(parsed.country_code, 1);
        assert_eq!(parsed.national_number, 6502530000);
    }

    #[test]
    fn test_parse_unknown_region() {
        let err = LibPhoneNumberPlan
            .parse("650 253 0000", Some("not-a-region"))
            .unwrap_err();
        assert!(matches!(err, NumberingPlanError::UnknownRegion(r) if r == "not-a-region"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = LibPhoneNumberPlan.parse("hello", None).unwrap_err();
        assert!(matches!(err, NumberingPlanError::Rejected(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_parse_keeps_validity_of_leading_zero_number() {
        let parsed = LibPhoneNumberPlan.parse("+39 02 1234 5678", None).unwrap();
        assert_eq!(parsed.country_code, 39);
        assert_eq!(parsed.national_number, 212345678);
        assert!(parsed.is_valid);

        // 整数形式已丢失前导零
        assert!(!LibPhoneNumberPlan.is_valid_number(39, 212345678));
    }

    #[test]
    fn test_validity() {
        assert!(LibPhoneNumberPlan.is_valid_number(1, 6502530000));
        assert!(!LibPhoneNumberPlan.is_valid_number(0, 0));
        assert!(!LibPhoneNumberPlan.is_valid_number(1, 0));
        assert!(!LibPhoneNumberPlan.is_valid_number(-1, 6502530000));
    }

    #[test]
    fn test_format_e164() {
        assert_eq!(LibPhoneNumberPlan.format_e164(1, 6502530000), "+16502530000");
        assert_eq!(LibPhoneNumberPlan.format_e164(0, 1), "+01");
    }

    #[test]
    fn test_default_plan_is_shared() {
        assert!(Arc::ptr_eq(&default_numbering_plan(), &default_numbering_plan()));
    }
}
