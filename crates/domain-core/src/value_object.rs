//! 值对象基础 trait

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// 值对象 trait
///
/// 值对象不可变，按值比较。`Display` 输出规范形式（canonical form），
/// `raw_input` 保留用户原始输入（由结构化部件构造时为空）。
pub trait ValueObject: Clone + PartialEq + fmt::Display + Send + Sync + 'static {
    /// 结构性校验，不会失败
    fn is_statically_valid(&self) -> bool;

    /// 原始输入
    fn raw_input(&self) -> &str;

    /// 优先返回原始输入，为空时回退到规范形式
    fn raw_or_formatted(&self) -> Cow<'_, str> {
        let raw = self.raw_input();
        if raw.is_empty() {
            Cow::Owned(self.to_string())
        } else {
            Cow::Borrowed(raw)
        }
    }

    /// 与任意类型的值比较
    ///
    /// 接受 `Self`、`&'static Self`、`Box<Self>`、`Rc<Self>`、`Arc<Self>`
    /// 与 `Option<Self>`，其余类型一律视为不相等。
    fn equals(&self, other: &dyn Any) -> bool {
        if let Some(o) = other.downcast_ref::<Self>() {
            return self == o;
        }
        if let Some(o) = other.downcast_ref::<&'static Self>() {
            return self == *o;
        }
        if let Some(o) = other.downcast_ref::<Box<Self>>() {
            return self == o.as_ref();
        }
        if let Some(o) = other.downcast_ref::<Rc<Self>>() {
            return self == o.as_ref();
        }
        if let Some(o) = other.downcast_ref::<Arc<Self>>() {
            return self == o.as_ref();
        }
        if let Some(o) = other.downcast_ref::<Option<Self>>() {
            return o.as_ref().is_some_and(|o| self == o);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Code {
        value: String,
        raw: String,
    }

    impl fmt::Display for Code {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "#{}", self.value)
        }
    }

    impl ValueObject for Code {
        fn is_statically_valid(&self) -> bool {
            !self.value.is_empty()
        }

        fn raw_input(&self) -> &str {
            &self.raw
        }
    }

    fn code(value: &str, raw: &str) -> Code {
        Code {
            value: value.to_string(),
            raw: raw.to_string(),
        }
    }

    #[test]
    fn test_raw_or_formatted_prefers_raw() {
        assert_eq!(code("a1", " A1 ").raw_or_formatted(), " A1 ");
        assert_eq!(code("a1", "").raw_or_formatted(), "#a1");
    }

    #[test]
    fn test_equals_accepts_wrappers() {
        let a = code("a1", "");

        assert!(a.equals(&code("a1", "")));
        assert!(a.equals(&Box::new(code("a1", ""))));
        assert!(a.equals(&Rc::new(code("a1", ""))));
        assert!(a.equals(&Arc::new(code("a1", ""))));
        assert!(a.equals(&Some(code("a1", ""))));
        assert!(!a.equals(&Some(code("b2", ""))));
    }

    #[test]
    fn test_equals_accepts_static_reference() {
        let a = code("a1", "");
        let same: &'static Code = Box::leak(Box::new(code("a1", "")));
        let other: &'static Code = Box::leak(Box::new(code("b2", "")));

        assert!(a.equals(&same));
        assert!(!a.equals(&other));
    }

    #[test]
    fn test_equals_rejects_other_types() {
        let a = code("a1", "");

        assert!(!a.equals(&None::<Code>));
        assert!(!a.equals(&"#a1"));
        assert!(!a.equals(&String::from("#a1")));
        assert!(!a.equals(&42_i32));
        assert!(!a.equals(&()));
    }
}
