// ユニーク制約スクリプトジェネレーター

use super::{constraint_prefix, GeneratorContext, ScriptGenerator, TableChild};
use crate::adapters::dialect::quote_columns;
use crate::core::error::GeneratorError;
use crate::core::metadata::UniqueKey;

/// ユニーク制約スクリプトジェネレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueKeyScriptGenerator;

impl UniqueKeyScriptGenerator {
    /// 制約句 `[CONSTRAINT n ]UNIQUE (cols)`
    pub fn clause(&self, unique_key: &UniqueKey, context: &GeneratorContext<'_>) -> String {
        format!(
            "{}UNIQUE ({})",
            constraint_prefix(context, unique_key.name.as_deref()),
            quote_columns(context.target(), &unique_key.columns)
        )
    }
}

impl<'a> ScriptGenerator<TableChild<'a, UniqueKey>> for UniqueKeyScriptGenerator {
    fn create_scripts(
        &self,
        object: &TableChild<'a, UniqueKey>,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(vec![format!(
            "ALTER TABLE {} ADD {}",
            context.table_name(object.table)?,
            self.clause(object.object, context)
        )])
    }

    fn drop_scripts(
        &self,
        object: &TableChild<'a, UniqueKey>,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let target = context.target();
        let name = object.object.name.as_deref().ok_or_else(|| {
            GeneratorError::unsupported(target.kind().to_string(), "dropping an unnamed unique key")
        })?;
        Ok(vec![format!(
            "ALTER TABLE {} {} {}",
            context.table_name(object.table)?,
            target.drop_unique_key(),
            context.quote(name)
        )])
    }
}
