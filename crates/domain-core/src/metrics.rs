//! 标识符解析指标
//!
//! 未安装 recorder 时所有调用均为空操作

use metrics::counter;

/// 记录邮箱解析失败
pub fn record_email_parse_failure(reason: &'static str) {
    counter!("contactid_email_parse_failures_total", "reason" => reason).increment(1);
}

/// 记录电话号码解析失败
pub fn record_phone_parse_failure(reason: &'static str) {
    counter!("contactid_phone_parse_failures_total", "reason" => reason).increment(1);
}

/// 记录重复国家码前缀修复
pub fn record_phone_prefix_repair() {
    counter!("contactid_phone_prefix_repairs_total").increment(1);
}
