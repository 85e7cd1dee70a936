// 汎用（ANSI SQL）方言
//
// Dialectトレイトの既定実装をそのまま使用します。

use super::Dialect;
use crate::adapters::translator::TranslatorChain;
use crate::adapters::type_mapping::{TypeRegistry, TypeRegistryBuilder};
use crate::core::config::DialectKind;

/// 汎用方言
#[derive(Debug)]
pub struct GenericDialect {
    registry: TypeRegistry,
    translators: TranslatorChain,
}

impl GenericDialect {
    pub fn new() -> Self {
        Self {
            registry: TypeRegistryBuilder::with_standard_types().build(),
            translators: TranslatorChain::standard(),
        }
    }
}

impl Default for GenericDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for GenericDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Generic
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
}
