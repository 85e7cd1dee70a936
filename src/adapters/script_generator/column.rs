// カラムスクリプトジェネレーター
//
// カラム定義（型名解決、IDENTITY句、デフォルト値、NOT NULL、コメント）と、
// ALTER TABLE によるカラムの追加・削除文を生成します。

use super::{GeneratorContext, ScriptGenerator, TableChild};
use crate::adapters::dialect::{quote_literal, resolve_type_name, CommentStyle};
use crate::adapters::translator::Script;
use crate::core::config::TypeNameFallback;
use crate::core::error::{ErrorLocation, GeneratorError};
use crate::core::metadata::{Column, Table};
use crate::core::type_code;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static KEYWORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:NULL|TRUE|FALSE|CURRENT_TIMESTAMP|CURRENT_DATE|CURRENT_TIME|LOCALTIMESTAMP|LOCALTIME|SYSDATE|SYSTIMESTAMP)$",
    )
    .expect("valid keyword pattern")
});

static FUNCTION_CALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*\s*\(.*\)$").expect("valid function call pattern")
});

static NUMERIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid numeric pattern")
});

static BINARY_LITERAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[bx]'[0-9a-f]*'|0x[0-9a-f]+)$").expect("valid binary literal pattern")
});

/// カラムスクリプトジェネレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnScriptGenerator;

impl ColumnScriptGenerator {
    /// CREATE TABLE内のカラム定義を生成
    pub fn definition(
        &self,
        table: &Table,
        column: &Column,
        context: &GeneratorContext<'_>,
    ) -> Result<String, GeneratorError> {
        let target = context.target();
        let mut definition = format!(
            "{} {}",
            context.quote(&column.name),
            self.type_name(table, column, context)?
        );

        if let Some(sequence) = column.sequence {
            let sequence = context.database.get_sequence(sequence)?;
            definition.push(' ');
            definition.push_str(&target.identity_clause(sequence)?);
        } else if let Some(default) = self.default_value(table, column, context)? {
            if column.nullable || !default.eq_ignore_ascii_case("NULL") {
                definition.push_str(&format!(" DEFAULT {}", default));
            }
        }

        if !column.nullable {
            definition.push_str(" NOT NULL");
        }

        if let Some(collation) = &column.collation {
            if context.source().kind() == target.kind() {
                definition.push_str(&format!(" COLLATE {}", collation));
            }
        }

        if let Some(comment) = &column.comment {
            if target.comment_style() == CommentStyle::Inline {
                definition.push_str(&target.column_comment(comment));
            }
        }

        Ok(definition)
    }

    /// 移行先の型名を解決
    ///
    /// レジストリで解決できない場合、ユーザー定義型はBLOBとして扱い、
    /// それ以外は設定に従ってソースの型名を使用するかエラーとします。
    pub fn type_name(
        &self,
        table: &Table,
        column: &Column,
        context: &GeneratorContext<'_>,
    ) -> Result<String, GeneratorError> {
        let specifiers = column.specifiers();
        if let Some(type_name) = resolve_type_name(
            context.source(),
            context.target(),
            &column.type_desc(),
            &specifiers,
        ) {
            return Ok(type_name);
        }

        if column.user_defined_type {
            if let Some(type_name) = context
                .target()
                .type_registry()
                .resolve_code(type_code::BLOB, &specifiers)
            {
                return Ok(type_name);
            }
        }

        match context.config.type_name_fallback {
            TypeNameFallback::SourceTypeName if !column.type_name.is_empty() => {
                warn!(
                    table = %table.name,
                    column = %column.name,
                    type_code = column.type_code,
                    type_name = %column.type_name,
                    "No type template matched, using the source type name"
                );
                Ok(column.type_name.clone())
            }
            _ => Err(GeneratorError::UnresolvableType {
                type_code: column.type_code,
                type_name: column.type_name.clone(),
                dialect: context.target().kind().to_string(),
                location: ErrorLocation::with_column(table.name.clone(), column.name.clone()),
            }),
        }
    }

    /// デフォルト値を移行先方言のリテラルとして生成
    ///
    /// 移行元方言の正規化 → トランスレーター → リテラル整形 の順に適用します。
    pub fn default_value(
        &self,
        table: &Table,
        column: &Column,
        context: &GeneratorContext<'_>,
    ) -> Result<Option<String>, GeneratorError> {
        let Some(default) = &column.default_value else {
            return Ok(None);
        };
        let processed = context.source().process_default_value(default);
        if processed.script.trim().is_empty() {
            return Ok(None);
        }

        let script = Script::new(processed.script, column.type_code)
            .with_type_name(column.type_name.clone())
            .with_size(column.size);
        let translated = context
            .target()
            .translators()
            .translate(&script, &context.translation_context())
            .map_err(|source| GeneratorError::Translation {
                source,
                location: ErrorLocation::with_column(table.name.clone(), column.name.clone()),
            })?;

        Ok(Some(format_literal(
            &translated,
            column.type_code,
            context.target().supports_national_literals(),
        )))
    }
}

/// 翻訳済みの値をDEFAULT句のリテラルに整形
///
/// `N'...'` の接頭辞は移行先が各国語文字リテラルに対応しない場合のみ外します。
fn format_literal(value: &str, code: i32, national_literals: bool) -> String {
    let value = value.trim();
    if let Some(unicode) = value
        .strip_prefix(['N', 'n'])
        .filter(|rest| rest.len() >= 2 && rest.starts_with('\'') && rest.ends_with('\''))
    {
        return if national_literals {
            value.to_string()
        } else {
            unicode.to_string()
        };
    }
    let quoted = value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'');
    if quoted
        || KEYWORD_PATTERN.is_match(value)
        || FUNCTION_CALL_PATTERN.is_match(value)
        || BINARY_LITERAL_PATTERN.is_match(value)
    {
        return value.to_string();
    }
    let textual = type_code::is_character(code) || type_code::is_temporal(code);
    if !textual && NUMERIC_PATTERN.is_match(value) {
        return value.to_string();
    }
    quote_literal(value)
}

impl<'a> ScriptGenerator<TableChild<'a, Column>> for ColumnScriptGenerator {
    fn create_scripts(
        &self,
        object: &TableChild<'a, Column>,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(vec![format!(
            "ALTER TABLE {} ADD {}",
            context.table_name(object.table)?,
            self.definition(object.table, object.object, context)?
        )])
    }

    fn drop_scripts(
        &self,
        object: &TableChild<'a, Column>,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(vec![format!(
            "ALTER TABLE {} DROP COLUMN {}",
            context.table_name(object.table)?,
            context.quote(&object.object.name)
        )])
    }
}
