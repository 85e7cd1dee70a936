// 標準移行先方言
//
// 移行先データベースの方言。スキーマはUSE文で切り替え（存在しない場合は作成）、
// 同一テーブルの複数インデックスを1つのALTER TABLE文で作成できます。

use super::{quote_literal, CommentStyle, Dialect, LimitHandler, LimitOffsetHandler};
use crate::adapters::translator::TranslatorChain;
use crate::adapters::type_mapping::{Limit, SpecifierBound, TypeRegistry, TypeRegistryBuilder};
use crate::core::config::{DialectKind, TimeZoneSetting};
use crate::core::error::GeneratorError;
use crate::core::type_code;

/// 標準移行先方言
#[derive(Debug)]
pub struct TargetDialect {
    registry: TypeRegistry,
    translators: TranslatorChain,
}

impl TargetDialect {
    pub fn new() -> Self {
        let registry = TypeRegistryBuilder::with_standard_types()
            .register(type_code::BIT, "BIT({N})")
            .register_bounded(
                type_code::BIT,
                SpecifierBound::new().size(Limit::Exactly(1)),
                "BOOLEAN",
            )
            .register_bounded(
                type_code::BIGINT,
                SpecifierBound::new().precision(Limit::AtLeast(20)),
                "NUMBER({P})",
            )
            .register_bounded(
                type_code::TIME,
                SpecifierBound::new().scale(Limit::AtLeast(1)),
                "TIME({S})",
            )
            .register_bounded(
                type_code::TIME,
                SpecifierBound::new().scale(Limit::Exactly(0)),
                "TIME",
            )
            .register_bounded(
                type_code::TIMESTAMP,
                SpecifierBound::new().scale(Limit::AtLeast(1)),
                "TIMESTAMP({S})",
            )
            .register(type_code::NCHAR, "CHAR({N})")
            .register(type_code::NVARCHAR, "VARCHAR({N})")
            .register(type_code::NCLOB, "CLOB")
            .register(type_code::LONGNVARCHAR, "CLOB")
            .register(type_code::LONGVARBINARY, "BLOB")
            .build();
        Self {
            registry,
            translators: TranslatorChain::standard(),
        }
    }
}

impl Default for TargetDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for TargetDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Target
    }

    fn type_registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn translators(&self) -> &TranslatorChain {
        &self.translators
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

    fn supports_create_multiple_indexes(&self) -> bool {
        true
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::Inline
    }

    fn use_schema(&self, schema: &str) -> String {
        format!("USE {}", self.quote(schema))
    }

    fn drop_schema(&self, schema: &str) -> String {
        format!("DROP SCHEMA {} CASCADE", self.quote(schema))
    }

    fn session_time_zone_statement(
        &self,
        time_zone: &TimeZoneSetting,
    ) -> Result<String, GeneratorError> {
        let normalized = time_zone.normalized();
        if normalized == "SYSTEM" {
            return Ok("SET TIME ZONE LOCAL".to_string());
        }
        Ok(format!("SET TIME ZONE {}", quote_literal(&normalized)))
    }

    fn create_limit_handler(&self) -> Result<Box<dyn LimitHandler>, GeneratorError> {
        Ok(Box::new(LimitOffsetHandler))
    }
}
