// 現在日時関数トランスレーター
//
// NOW(), GETDATE(), SYSDATE などの方言固有の現在日時関数を、
// 移行先方言の関数に置き換えます。

use super::{Script, TranslationContext, Translator};
use crate::core::error::TranslationError;
use regex::Regex;
use std::sync::LazyLock;

static CURRENT_TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:current_timestamp|now|getdate|sysdatetime|systimestamp|sysdate|localtimestamp)(?:\s*\(\s*\d*\s*\))?$",
    )
    .expect("valid current timestamp pattern")
});

static CURRENT_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:current_date|curdate)(?:\s*\(\s*\))?$")
        .expect("valid current date pattern")
});

static CURRENT_TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:current_time|curtime)(?:\s*\(\s*\d*\s*\))?$")
        .expect("valid current time pattern")
});

/// 現在日時関数トランスレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentTimeTranslator;

impl Translator for CurrentTimeTranslator {
    fn supports(&self, script: &Script, _context: &TranslationContext<'_>) -> bool {
        let value = script.value.trim();
        CURRENT_TIMESTAMP_PATTERN.is_match(value)
            || CURRENT_DATE_PATTERN.is_match(value)
            || CURRENT_TIME_PATTERN.is_match(value)
    }

    fn translate(
        &self,
        script: &Script,
        context: &TranslationContext<'_>,
    ) -> Result<String, TranslationError> {
        let value = script.value.trim();
        let translated = if CURRENT_DATE_PATTERN.is_match(value) {
            "CURRENT_DATE"
        } else if CURRENT_TIME_PATTERN.is_match(value) {
            "CURRENT_TIME"
        } else {
            context.target.current_timestamp()
        };
        Ok(translated.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::dialect::create_dialect;
    use crate::core::config::{DialectKind, ZeroDateTimeBehavior};
    use crate::core::type_code;

    #[test]
    fn test_current_timestamp_variants() {
        let source = create_dialect(DialectKind::SQLServer);
        let target = create_dialect(DialectKind::Target);
        let context = TranslationContext::new(
            source.as_ref(),
            target.as_ref(),
            ZeroDateTimeBehavior::Exception,
        );
        for value in [
            "getdate()",
            "NOW()",
            "CURRENT_TIMESTAMP",
            "current_timestamp(6)",
            "SYSDATE",
        ] {
            let script = Script::new(value, type_code::TIMESTAMP);
            assert!(CurrentTimeTranslator.supports(&script, &context), "{}", value);
            assert_eq!(
                CurrentTimeTranslator.translate(&script, &context).unwrap(),
                "CURRENT_TIMESTAMP"
            );
        }

        let script = Script::new("CURDATE()", type_code::DATE);
        assert_eq!(
            CurrentTimeTranslator.translate(&script, &context).unwrap(),
            "CURRENT_DATE"
        );
        let script = Script::new("'now'", type_code::VARCHAR);
        assert!(!CurrentTimeTranslator.supports(&script, &context));
    }
}
