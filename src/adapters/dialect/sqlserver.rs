// SQL Server方言
//
// 角括弧による識別子クォート、IDENTITY列、TOP/OFFSET FETCHによる行数制限を扱います。
// 移行元としては、カタログが返す `((0))` 形式のデフォルト値の括弧を取り除きます。

use super::{CommentStyle, Dialect, IdentifierQuote, LimitHandler, RowCountKind, TopLimitHandler};
use crate::adapters::translator::TranslatorChain;
use crate::adapters::type_mapping::{Limit, SpecifierBound, TypeRegistry, TypeRegistryBuilder};
use crate::core::config::DialectKind;
use crate::core::error::GeneratorError;
use crate::core::metadata::{DefaultValue, Sequence};
use crate::core::type_code;

/// SQL Server方言
#[derive(Debug)]
pub struct SqlServerDialect {
    registry: TypeRegistry,
    translators: TranslatorChain,
}

impl SqlServerDialect {
    pub fn new() -> Self {
        let registry = TypeRegistryBuilder::with_standard_types()
            .register(type_code::BOOLEAN, "BIT")
            .register(type_code::TINYINT, "TINYINT")
            .register(type_code::INTEGER, "INT")
            .register_bounded(
                type_code::BIGINT,
                SpecifierBound::new().precision(Limit::AtLeast(20)),
                "DECIMAL({P},0)",
            )
            .register(type_code::DOUBLE, "FLOAT")
            .register_bounded(
                type_code::VARCHAR,
                SpecifierBound::new().size(Limit::AtLeast(8001)),
                "VARCHAR(MAX)",
            )
            .register_bounded(
                type_code::NVARCHAR,
                SpecifierBound::new().size(Limit::AtLeast(4001)),
                "NVARCHAR(MAX)",
            )
            .register_bounded(
                type_code::VARBINARY,
                SpecifierBound::new().size(Limit::AtLeast(8001)),
                "VARBINARY(MAX)",
            )
            .register_bounded(
                type_code::TIME,
                SpecifierBound::new().scale(Limit::AtLeast(1)),
                "TIME({S})",
            )
            .register(type_code::TIMESTAMP, "DATETIME2")
            .register_bounded(
                type_code::TIMESTAMP,
                SpecifierBound::new().scale(Limit::AtLeast(1)),
                "DATETIME2({S})",
            )
            .register(type_code::CLOB, "VARCHAR(MAX)")
            .register(type_code::NCLOB, "NVARCHAR(MAX)")
            .register(type_code::BLOB, "VARBINARY(MAX)")
            .register(type_code::LONGVARCHAR, "VARCHAR(MAX)")
            .register(type_code::LONGNVARCHAR, "NVARCHAR(MAX)")
            .register(type_code::LONGVARBINARY, "VARBINARY(MAX)")
            .alias(type_code::LONGVARCHAR, "TEXT", type_code::CLOB)
            .alias(type_code::LONGNVARCHAR, "NTEXT", type_code::NCLOB)
            .alias(type_code::LONGVARBINARY, "IMAGE", type_code::BLOB)
            .build();
        Self {
            registry,
            translators: TranslatorChain::standard(),
        }
    }

    /// 外側の括弧を1組ずつ取り除く
    fn unwrap_parentheses(script: &str) -> String {
        let mut value = script.trim();
        while value.len() >= 2
            && value.starts_with('(')
            && value.ends_with(')')
            && Self::encloses(value)
        {
            value = value[1..value.len() - 1].trim();
        }
        value.to_string()
    }

    /// 先頭の括弧が末尾の括弧と対応しているか（`(a) + (b)` を除外）
    fn encloses(value: &str) -> bool {
        let mut depth = 0usize;
        let mut in_literal = false;
        for (i, ch) in value.char_indices() {
            match ch {
                '\'' => in_literal = !in_literal,
                '(' if !in_literal => depth += 1,
                ')' if !in_literal => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 && i != value.len() - 1 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }
}

impl Default for SqlServerDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for SqlServerDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::SQLServer
    }

    fn type_registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn translators(&self) -> &TranslatorChain {
        &self.translators
    }

    fn identifier_quote(&self) -> IdentifierQuote {
        IdentifierQuote::BRACKET
    }

    fn supports_catalogs(&self) -> bool {
        true
    }

    fn supports_national_literals(&self) -> bool {
        true
    }

    fn supports_row_count(&self, _kind: RowCountKind) -> bool {
        true
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::Unsupported
    }

    fn drop_index(&self, index: &str, table: &str) -> String {
        format!("DROP INDEX {} ON {}", index, table)
    }

    fn use_schema(&self, schema: &str) -> String {
        format!("USE {}", self.quote(schema))
    }

    fn drop_schema(&self, schema: &str) -> String {
        format!("DROP SCHEMA {}", self.quote(schema))
    }

    fn identity_clause(&self, sequence: &Sequence) -> Result<String, GeneratorError> {
        Ok(format!(
            "IDENTITY({}, {})",
            sequence.next_value()?,
            sequence.increment()
        ))
    }

    fn process_default_value(&self, value: &DefaultValue) -> DefaultValue {
        value.process(Self::unwrap_parentheses)
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn create_limit_handler(&self) -> Result<Box<dyn LimitHandler>, GeneratorError> {
        Ok(Box::new(TopLimitHandler))
    }
}
