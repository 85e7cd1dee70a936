// Oracle方言
//
// NUMBER/VARCHAR2系の型マッピング、ROWNUMによる行数制限、
// `ALTER SESSION` によるスキーマ・タイムゾーンの切り替えを扱います。

use super::{quote_literal, Dialect, LimitHandler, RowCountKind, RownumLimitHandler};
use crate::adapters::translator::TranslatorChain;
use crate::adapters::type_mapping::{Limit, SpecifierBound, TypeRegistry, TypeRegistryBuilder};
use crate::core::config::{DialectKind, TimeZoneSetting};
use crate::core::error::GeneratorError;
use crate::core::type_code;

/// Oracle方言
#[derive(Debug)]
pub struct OracleDialect {
    registry: TypeRegistry,
    translators: TranslatorChain,
}

impl OracleDialect {
    pub fn new() -> Self {
        let registry = TypeRegistryBuilder::with_standard_types()
            .register(type_code::BIT, "NUMBER(1)")
            .register(type_code::BOOLEAN, "NUMBER(1)")
            .register(type_code::TINYINT, "NUMBER(3)")
            .register(type_code::SMALLINT, "NUMBER(5)")
            .register(type_code::INTEGER, "NUMBER(10)")
            .register(type_code::BIGINT, "NUMBER(19)")
            .register_bounded(
                type_code::BIGINT,
                SpecifierBound::new().precision(Limit::AtLeast(20)),
                "NUMBER({P})",
            )
            .register(type_code::REAL, "BINARY_FLOAT")
            .register(type_code::DOUBLE, "BINARY_DOUBLE")
            .register(type_code::NUMERIC, "NUMBER({P},{S})")
            .register(type_code::DECIMAL, "NUMBER({P},{S})")
            .register(type_code::CHAR, "CHAR({N} CHAR)")
            .register(type_code::VARCHAR, "VARCHAR2({N} CHAR)")
            .register_bounded(
                type_code::VARCHAR,
                SpecifierBound::new().size(Limit::AtLeast(4001)),
                "CLOB",
            )
            .register(type_code::NVARCHAR, "NVARCHAR2({N})")
            .register(type_code::TIME, "DATE")
            .register_bounded(
                type_code::TIMESTAMP,
                SpecifierBound::new().scale(Limit::AtLeast(1)),
                "TIMESTAMP({S})",
            )
            .register(type_code::BINARY, "RAW({N})")
            .register(type_code::VARBINARY, "RAW({N})")
            .register_bounded(
                type_code::VARBINARY,
                SpecifierBound::new().size(Limit::AtLeast(2001)),
                "BLOB",
            )
            .register(type_code::LONGVARCHAR, "CLOB")
            .register(type_code::LONGNVARCHAR, "NCLOB")
            .register(type_code::LONGVARBINARY, "BLOB")
            .alias(type_code::OTHER, "XMLTYPE", type_code::CLOB)
            .alias(type_code::OTHER, "NCLOB", type_code::NCLOB)
            .alias(type_code::OTHER, "BINARY_FLOAT", type_code::REAL)
            .alias(type_code::OTHER, "BINARY_DOUBLE", type_code::DOUBLE)
            .build();
        Self {
            registry,
            translators: TranslatorChain::standard(),
        }
    }
}

impl Default for OracleDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for OracleDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn type_registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn translators(&self) -> &TranslatorChain {
        &self.translators
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

    fn supports_national_literals(&self) -> bool {
        true
    }

    fn supports_on_update_action(&self) -> bool {
        false
    }

    fn use_schema(&self, schema: &str) -> String {
        format!("ALTER SESSION SET CURRENT_SCHEMA = {}", self.quote(schema))
    }

    /// Oracleのスキーマはユーザーと同一
    fn drop_schema(&self, schema: &str) -> String {
        format!("DROP USER {} CASCADE", self.quote(schema))
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn session_time_zone_statement(
        &self,
        time_zone: &TimeZoneSetting,
    ) -> Result<String, GeneratorError> {
        let normalized = time_zone.normalized();
        if normalized == "SYSTEM" {
            return Ok("ALTER SESSION SET TIME_ZONE = LOCAL".to_string());
        }
        Ok(format!(
            "ALTER SESSION SET TIME_ZONE = {}",
            quote_literal(&normalized)
        ))
    }

    fn create_limit_handler(&self) -> Result<Box<dyn LimitHandler>, GeneratorError> {
        Ok(Box::new(RownumLimitHandler))
    }
}
