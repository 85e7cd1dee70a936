// ビットリテラルトランスレーター
//
// BIT/BOOLEAN型のデフォルト値（b'1', 1, TRUE 等）を移行先方言の真偽値リテラルに変換します。
// BIT(n) (n > 1) はビット列なので変換しません。

use super::{Script, TranslationContext, Translator};
use crate::core::error::TranslationError;
use crate::core::type_code;
use regex::Regex;
use std::sync::LazyLock;

static BIT_LITERAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:b'([01])'|'([01])'|([01])|(true|false))$")
        .expect("valid bit literal pattern")
});

/// ビットリテラルトランスレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct BitLiteralTranslator;

impl BitLiteralTranslator {
    fn is_boolean_column(script: &Script) -> bool {
        match script.type_code {
            type_code::BOOLEAN => true,
            type_code::BIT => script.size.is_none_or(|size| size <= 1),
            _ => false,
        }
    }

    fn parse(value: &str) -> Option<bool> {
        let caps = BIT_LITERAL_PATTERN.captures(value.trim())?;
        if let Some(word) = caps.get(4) {
            return Some(word.as_str().eq_ignore_ascii_case("true"));
        }
        (1..=3)
            .filter_map(|i| caps.get(i))
            .map(|digit| digit.as_str() == "1")
            .next()
    }
}

impl Translator for BitLiteralTranslator {
    fn supports(&self, script: &Script, context: &TranslationContext<'_>) -> bool {
        Self::is_boolean_column(script)
            && context.is_cross_dialect()
            && Self::parse(&script.value).is_some()
    }

    fn translate(
        &self,
        script: &Script,
        context: &TranslationContext<'_>,
    ) -> Result<String, TranslationError> {
        match Self::parse(&script.value) {
            Some(value) => Ok(context.target.boolean_literal(value).to_string()),
            None => Ok(script.value.clone()),
        }
    }
}
