// 主キースクリプトジェネレーター
//
// `ALTER TABLE t ADD PRIMARY KEY (cols)` と、方言ごとの主キー削除文を生成します。
// カラムは宣言順のまま出力します。

use super::{GeneratorContext, ScriptGenerator, TableChild};
use crate::adapters::dialect::quote_columns;
use crate::core::error::GeneratorError;
use crate::core::metadata::PrimaryKey;

/// 主キースクリプトジェネレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryKeyScriptGenerator;

impl PrimaryKeyScriptGenerator {
    /// 制約句 `PRIMARY KEY (cols)`
    pub fn clause(&self, primary_key: &PrimaryKey, context: &GeneratorContext<'_>) -> String {
        format!(
            "PRIMARY KEY ({})",
            quote_columns(context.target(), &primary_key.columns)
        )
    }
}

impl<'a> ScriptGenerator<TableChild<'a, PrimaryKey>> for PrimaryKeyScriptGenerator {
    fn create_scripts(
        &self,
        object: &TableChild<'a, PrimaryKey>,
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
        object: &TableChild<'a, PrimaryKey>,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let clause = context
            .target()
            .drop_primary_key(object.object.name.as_deref())?;
        Ok(vec![format!(
            "ALTER TABLE {} {}",
            context.table_name(object.table)?,
            clause
        )])
    }
}
