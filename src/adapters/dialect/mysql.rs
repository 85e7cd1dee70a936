// MySQL方言
//
// バッククォートによる識別子クォート、AUTO_INCREMENT、インラインCOMMENT、
// CREATE TABLE内のインデックス定義、`SET @@SESSION.TIME_ZONE` を扱います。
// 移行元としては TEXT/BLOB 系の型名を CLOB/BLOB へのエイリアスとして登録します。

use super::{
    quote_literal, CommentStyle, Dialect, IdentifierQuote, LimitHandler, LimitOffsetHandler,
    RowCountKind,
};
use crate::adapters::translator::TranslatorChain;
use crate::adapters::type_mapping::{Limit, SpecifierBound, TypeRegistry, TypeRegistryBuilder};
use crate::core::config::{DialectKind, TimeZoneSetting};
use crate::core::error::GeneratorError;
use crate::core::metadata::Sequence;
use crate::core::type_code;

/// MySQL方言
#[derive(Debug)]
pub struct MySqlDialect {
    registry: TypeRegistry,
    translators: TranslatorChain,
}

impl MySqlDialect {
    pub fn new() -> Self {
        Self {
            registry: Self::type_registry_builder().build(),
            translators: TranslatorChain::standard(),
        }
    }

    fn type_registry_builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::with_standard_types()
            .register(type_code::BIT, "BIT({N})")
            .register_bounded(
                type_code::BIT,
                SpecifierBound::new().size(Limit::Exactly(1)),
                "BIT",
            )
            .register(type_code::TINYINT, "TINYINT")
            .register(type_code::INTEGER, "INT")
            .register_bounded(
                type_code::BIGINT,
                SpecifierBound::new().precision(Limit::AtLeast(20)),
                "DECIMAL({P},0)",
            )
            .register(type_code::NUMERIC, "DECIMAL({P},{S})")
            .register(type_code::NCHAR, "CHAR({N})")
            .register(type_code::NVARCHAR, "VARCHAR({N})")
            .register_bounded(
                type_code::VARCHAR,
                SpecifierBound::new().size(Limit::AtLeast(65536)),
                "LONGTEXT",
            )
            .register(type_code::TIMESTAMP, "DATETIME")
            .register_bounded(
                type_code::TIMESTAMP,
                SpecifierBound::new().scale(Limit::AtLeast(1)),
                "DATETIME({S})",
            )
            .register(type_code::LONGVARCHAR, "LONGTEXT")
            .register(type_code::LONGNVARCHAR, "LONGTEXT")
            .register(type_code::CLOB, "LONGTEXT")
            .register(type_code::NCLOB, "LONGTEXT")
            .register(type_code::LONGVARBINARY, "LONGBLOB")
            .register(type_code::BLOB, "LONGBLOB")
            .alias(type_code::LONGVARCHAR, "TINYTEXT", type_code::CLOB)
            .alias(type_code::LONGVARCHAR, "TEXT", type_code::CLOB)
            .alias(type_code::LONGVARCHAR, "MEDIUMTEXT", type_code::CLOB)
            .alias(type_code::LONGVARCHAR, "LONGTEXT", type_code::CLOB)
            .alias(type_code::LONGVARBINARY, "TINYBLOB", type_code::BLOB)
            .alias(type_code::LONGVARBINARY, "BLOB", type_code::BLOB)
            .alias(type_code::LONGVARBINARY, "MEDIUMBLOB", type_code::BLOB)
            .alias(type_code::LONGVARBINARY, "LONGBLOB", type_code::BLOB)
    }
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for MySqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::MySQL
    }

    fn type_registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn translators(&self) -> &TranslatorChain {
        &self.translators
    }

    fn identifier_quote(&self) -> IdentifierQuote {
        IdentifierQuote::BACKTICK
    }

    fn supports_catalogs(&self) -> bool {
        true
    }

    /// MySQLのスキーマはカタログ（データベース）と同一
    fn supports_schemas(&self) -> bool {
        false
    }

    fn supports_column_check(&self) -> bool {
        false
    }

    fn supports_if_exists_before_drop_table(&self) -> bool {
        true
    }

    fn supports_limit_parameters(&self) -> bool {
        true
    }

    fn supports_session_time_zone(&self) -> bool {
        true
    }

    fn supports_row_count(&self, _kind: RowCountKind) -> bool {
        true
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn supports_national_literals(&self) -> bool {
        true
    }

    fn supports_index_in_create_table(&self) -> bool {
        true
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::Inline
    }

    fn table_comment(&self, comment: &str) -> String {
        format!(" COMMENT={}", quote_literal(comment))
    }

    fn drop_foreign_key(&self) -> &'static str {
        "DROP FOREIGN KEY"
    }

    fn drop_unique_key(&self) -> &'static str {
        "DROP INDEX"
    }

    fn drop_primary_key(&self, _name: Option<&str>) -> Result<String, GeneratorError> {
        Ok("DROP PRIMARY KEY".to_string())
    }

    fn drop_index(&self, index: &str, table: &str) -> String {
        format!("DROP INDEX {} ON {}", index, table)
    }

    fn use_schema(&self, schema: &str) -> String {
        format!("USE {}", self.quote(schema))
    }

    fn drop_schema(&self, schema: &str) -> String {
        format!("DROP DATABASE IF EXISTS {}", self.quote(schema))
    }

    fn identity_clause(&self, _sequence: &Sequence) -> Result<String, GeneratorError> {
        Ok("AUTO_INCREMENT".to_string())
    }

    fn session_time_zone_statement(
        &self,
        time_zone: &TimeZoneSetting,
    ) -> Result<String, GeneratorError> {
        Ok(format!(
            "SET @@SESSION.TIME_ZONE = {}",
            quote_literal(&time_zone.normalized())
        ))
    }

    fn create_limit_handler(&self) -> Result<Box<dyn LimitHandler>, GeneratorError> {
        Ok(Box::new(LimitOffsetHandler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::type_code::{TypeDesc, TypeSpecifiers};

    #[test]
    fn test_text_aliases() {
        let dialect = MySqlDialect::new();
        for name in ["TINYTEXT", "TEXT", "MEDIUMTEXT", "LONGTEXT"] {
            assert_eq!(
                dialect
                    .type_registry()
                    .resolve_alias(&TypeDesc::named(type_code::LONGVARCHAR, name)),
                Some(type_code::CLOB)
            );
        }
        assert_eq!(
            dialect
                .type_registry()
                .resolve_alias(&TypeDesc::named(type_code::LONGVARBINARY, "mediumblob")),
            Some(type_code::BLOB)
        );
    }

    #[test]
    fn test_type_names() {
        let registry = MySqlDialect::new().type_registry().clone();
        let resolve = |code, specifiers: TypeSpecifiers| {
            registry.resolve_type_name(&TypeDesc::new(code), &specifiers)
        };
        assert_eq!(
            resolve(type_code::INTEGER, TypeSpecifiers::default()).as_deref(),
            Some("INT")
        );
        assert_eq!(
            resolve(type_code::BIT, TypeSpecifiers::with_size(1)).as_deref(),
            Some("BIT")
        );
        assert_eq!(
            resolve(type_code::BIT, TypeSpecifiers::with_size(8)).as_deref(),
            Some("BIT(8)")
        );
        assert_eq!(
            resolve(type_code::TIMESTAMP, TypeSpecifiers::with_scale(6)).as_deref(),
            Some("DATETIME(6)")
        );
        assert_eq!(
            resolve(type_code::VARCHAR, TypeSpecifiers::with_size(100000)).as_deref(),
            Some("LONGTEXT")
        );
    }

    #[test]
    fn test_statement_fragments() {
        let dialect = MySqlDialect::new();
        assert_eq!(dialect.quote("usertype"), "`usertype`");
        assert_eq!(dialect.use_schema("shop"), "USE `shop`");
        assert_eq!(dialect.drop_schema("shop"), "DROP DATABASE IF EXISTS `shop`");
        assert_eq!(dialect.drop_table("`users`"), "DROP TABLE IF EXISTS `users`");
        assert_eq!(dialect.drop_primary_key(None).unwrap(), "DROP PRIMARY KEY");
        assert_eq!(dialect.table_comment("it's"), " COMMENT='it''s'");
        assert_eq!(dialect.column_comment("id"), " COMMENT 'id'");
        assert!(!dialect.supports_column_check());
    }

    #[test]
    fn test_session_time_zone() {
        let dialect = MySqlDialect::new();
        let tz: TimeZoneSetting = "+05:30".parse().unwrap();
        assert_eq!(
            dialect.session_time_zone_statement(&tz).unwrap(),
            "SET @@SESSION.TIME_ZONE = '+05:30'"
        );
        assert_eq!(
            dialect
                .session_time_zone_statement(&TimeZoneSetting::System)
                .unwrap(),
            "SET @@SESSION.TIME_ZONE = 'SYSTEM'"
        );
    }
}
