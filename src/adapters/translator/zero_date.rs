// ゼロ日付トランスレーター
//
// MySQLの存在しない日付（0000-00-00 等）を、設定されたゼロ日付の扱いに従って
// NULL・最小日付への丸め・翻訳エラーのいずれかに変換します。

use super::{Script, TranslationContext, Translator};
use crate::core::config::{DialectKind, ZeroDateTimeBehavior};
use crate::core::error::TranslationError;
use crate::core::type_code;
use regex::Regex;
use std::sync::LazyLock;

static ZERO_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0000-00-00(?:[ T]00:00:00(?:\.0+)?)?$").expect("valid zero date pattern")
});

/// ゼロ日付トランスレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroDateTimeTranslator;

impl ZeroDateTimeTranslator {
    // 00:00:00 単体は有効な時刻なので対象外
    fn is_zero(script: &Script) -> bool {
        matches!(
            script.type_code,
            type_code::DATE | type_code::TIMESTAMP | type_code::TIMESTAMP_WITH_TIMEZONE
        ) && ZERO_DATE_PATTERN.is_match(script.unquoted())
    }
}

impl Translator for ZeroDateTimeTranslator {
    fn supports(&self, script: &Script, context: &TranslationContext<'_>) -> bool {
        context.source.kind() == DialectKind::MySQL && Self::is_zero(script)
    }

    fn translate(
        &self,
        script: &Script,
        context: &TranslationContext<'_>,
    ) -> Result<String, TranslationError> {
        match context.zero_date_time_behavior {
            ZeroDateTimeBehavior::ConvertToNull => Ok("NULL".to_string()),
            ZeroDateTimeBehavior::Round => Ok(context
                .target
                .minimum_date_time(script.type_code)
                .map(str::to_string)
                .unwrap_or_else(|| script.unquoted().to_string())),
            ZeroDateTimeBehavior::Exception => Err(TranslationError::ZeroDateTime {
                value: script.value.clone(),
                type_name: script
                    .type_name
                    .clone()
                    .or_else(|| type_code::type_code_name(script.type_code).map(str::to_string))
                    .unwrap_or_else(|| script.type_code.to_string()),
            }),
        }
    }
}
