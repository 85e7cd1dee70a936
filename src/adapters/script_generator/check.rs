// チェック制約スクリプトジェネレーター
//
// CHECK制約に対応しない方言では非サポートエラーを返します。

use super::{constraint_prefix, GeneratorContext, ScriptGenerator, TableChild};
use crate::core::error::GeneratorError;
use crate::core::metadata::CheckConstraint;

/// チェック制約スクリプトジェネレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckScriptGenerator;

impl CheckScriptGenerator {
    /// 制約句 `[CONSTRAINT n ]CHECK (predicate)`
    pub fn clause(
        &self,
        check: &CheckConstraint,
        context: &GeneratorContext<'_>,
    ) -> Result<String, GeneratorError> {
        let target = context.target();
        if !target.supports_column_check() {
            return Err(GeneratorError::unsupported(
                target.kind().to_string(),
                "CHECK constraints",
            ));
        }
        Ok(format!(
            "{}CHECK {}",
            constraint_prefix(context, check.name.as_deref()),
            target.check_clause(&check.clause)
        ))
    }
}

impl<'a> ScriptGenerator<TableChild<'a, CheckConstraint>> for CheckScriptGenerator {
    fn create_scripts(
        &self,
        object: &TableChild<'a, CheckConstraint>,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(vec![format!(
            "ALTER TABLE {} ADD {}",
            context.table_name(object.table)?,
            self.clause(object.object, context)?
        )])
    }

    fn drop_scripts(
        &self,
        object: &TableChild<'a, CheckConstraint>,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let target = context.target();
        if !target.supports_column_check() {
            return Err(GeneratorError::unsupported(
                target.kind().to_string(),
                "CHECK constraints",
            ));
        }
        let name = object.object.name.as_deref().ok_or_else(|| {
            GeneratorError::unsupported(
                target.kind().to_string(),
                "dropping an unnamed check constraint",
            )
        })?;
        Ok(vec![format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            context.table_name(object.table)?,
            context.quote(name)
        )])
    }
}
