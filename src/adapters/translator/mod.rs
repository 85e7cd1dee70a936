// トランスレーターパイプライン
//
// 移行元方言では有効だが移行先では有効とは限らないデフォルト値・リテラルを
// 移行先方言で有効な表現に書き換えます。
// トランスレーターは順序付きのチェーンで、最初に適用可能なものだけが結果を返します。

mod bit_literal;
mod current_time;
mod zero_date;

pub use bit_literal::BitLiteralTranslator;
pub use current_time::CurrentTimeTranslator;
pub use zero_date::ZeroDateTimeTranslator;

use crate::adapters::dialect::Dialect;
use crate::core::config::ZeroDateTimeBehavior;
use crate::core::error::TranslationError;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static FUNCTION_CALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*\s*\(.*\)$").expect("valid function call pattern")
});

/// 翻訳対象のスクリプト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// 移行元方言でのSQL断片
    pub value: String,
    /// 値が属するカラムの型コード
    pub type_code: i32,
    /// 値が属するカラムの型名
    pub type_name: Option<String>,
    /// 値が属するカラムのサイズ
    pub size: Option<u32>,
}

impl Script {
    pub fn new(value: impl Into<String>, type_code: i32) -> Self {
        Self {
            value: value.into(),
            type_code,
            type_name: None,
            size: None,
        }
    }

    /// 型名を指定
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// カラムのサイズを指定
    pub fn with_size(mut self, size: Option<u32>) -> Self {
        self.size = size;
        self
    }

    /// 外側のシングルクォートを外した値
    pub fn unquoted(&self) -> &str {
        let value = self.value.trim();
        value
            .strip_prefix('\'')
            .and_then(|v| v.strip_suffix('\''))
            .unwrap_or(value)
    }
}

/// 翻訳コンテキスト
///
/// 生成セッションの開始時に確定し、翻訳中は変更されません。
#[derive(Debug, Clone, Copy)]
pub struct TranslationContext<'a> {
    /// 移行元方言
    pub source: &'a dyn Dialect,
    /// 移行先方言
    pub target: &'a dyn Dialect,
    /// ゼロ日付の扱い
    pub zero_date_time_behavior: ZeroDateTimeBehavior,
}

impl<'a> TranslationContext<'a> {
    pub fn new(
        source: &'a dyn Dialect,
        target: &'a dyn Dialect,
        zero_date_time_behavior: ZeroDateTimeBehavior,
    ) -> Self {
        Self {
            source,
            target,
            zero_date_time_behavior,
        }
    }

    /// 移行元と移行先が異なる方言か
    pub fn is_cross_dialect(&self) -> bool {
        self.source.kind() != self.target.kind()
    }
}

/// トランスレーター
///
/// 適用可否の判定と変換のみを持ち、状態は持ちません。
pub trait Translator: Send + Sync + std::fmt::Debug {
    /// スクリプトに適用可能かどうか
    fn supports(&self, script: &Script, context: &TranslationContext<'_>) -> bool;

    /// スクリプトを変換
    fn translate(
        &self,
        script: &Script,
        context: &TranslationContext<'_>,
    ) -> Result<String, TranslationError>;
}

/// トランスレーターチェーン
#[derive(Debug, Default)]
pub struct TranslatorChain {
    translators: Vec<Box<dyn Translator>>,
}

impl TranslatorChain {
    /// 指定されたトランスレーターでチェーンを作成（順序は評価順）
    pub fn new(translators: Vec<Box<dyn Translator>>) -> Self {
        Self { translators }
    }

    /// 標準のチェーン（ゼロ日付 → 現在日時関数 → ビットリテラル）
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(ZeroDateTimeTranslator),
            Box::new(CurrentTimeTranslator),
            Box::new(BitLiteralTranslator),
        ])
    }

    /// チェーンに含まれるトランスレーター数
    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    /// スクリプトを翻訳
    ///
    /// 適用可能なトランスレーターがない場合、値はそのまま返されます。
    /// ただし異なる方言間で関数呼び出し式を認識できない場合は翻訳エラーになります。
    pub fn translate(
        &self,
        script: &Script,
        context: &TranslationContext<'_>,
    ) -> Result<String, TranslationError> {
        if let Some(translator) = self
            .translators
            .iter()
            .find(|translator| translator.supports(script, context))
        {
            debug!(
                translator = ?translator,
                value = %script.value,
                "Translating script"
            );
            return translator.translate(script, context);
        }

        if context.is_cross_dialect() && FUNCTION_CALL_PATTERN.is_match(script.value.trim()) {
            return Err(TranslationError::Untranslatable {
                value: script.value.clone(),
                source_dialect: context.source.kind().to_string(),
                target_dialect: context.target.kind().to_string(),
            });
        }

        Ok(script.value.clone())
    }
}
