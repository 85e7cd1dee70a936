// 外部キースクリプトジェネレーター
//
// 参照先テーブルはメタデータグラフから解決します。
// ON UPDATE に対応しない方言では更新時アクションを出力しません。

use super::{constraint_prefix, GeneratorContext, ScriptGenerator, TableChild};
use crate::adapters::dialect::quote_columns;
use crate::core::error::GeneratorError;
use crate::core::metadata::{ForeignKey, ReferentialAction};
use tracing::debug;

/// 外部キースクリプトジェネレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct ForeignKeyScriptGenerator;

impl ForeignKeyScriptGenerator {
    /// 制約句 `[CONSTRAINT n ]FOREIGN KEY (..) REFERENCES t (..)[ ON DELETE ..][ ON UPDATE ..]`
    pub fn clause(
        &self,
        foreign_key: &ForeignKey,
        context: &GeneratorContext<'_>,
    ) -> Result<String, GeneratorError> {
        let target = context.target();
        let referenced = context.database.get_table(foreign_key.referenced_table)?;

        let mut clause = format!(
            "{}FOREIGN KEY ({}) REFERENCES {} ({})",
            constraint_prefix(context, foreign_key.name.as_deref()),
            quote_columns(target, &foreign_key.columns),
            context.table_name(referenced)?,
            quote_columns(target, &foreign_key.referenced_columns)
        );

        if foreign_key.delete_action != ReferentialAction::NoAction {
            clause.push_str(&format!(" ON DELETE {}", foreign_key.delete_action.as_sql()));
        }
        if foreign_key.update_action != ReferentialAction::NoAction {
            if target.supports_on_update_action() {
                clause.push_str(&format!(" ON UPDATE {}", foreign_key.update_action.as_sql()));
            } else {
                debug!(
                    dialect = %target.kind(),
                    action = foreign_key.update_action.as_sql(),
                    "Omitting ON UPDATE action"
                );
            }
        }

        Ok(clause)
    }
}

impl<'a> ScriptGenerator<TableChild<'a, ForeignKey>> for ForeignKeyScriptGenerator {
    fn create_scripts(
        &self,
        object: &TableChild<'a, ForeignKey>,
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
        object: &TableChild<'a, ForeignKey>,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let target = context.target();
        let name = object.object.name.as_deref().ok_or_else(|| {
            GeneratorError::unsupported(
                target.kind().to_string(),
                "dropping an unnamed foreign key",
            )
        })?;
        Ok(vec![format!(
            "ALTER TABLE {} {} {}",
            context.table_name(object.table)?,
            target.drop_foreign_key(),
            context.quote(name)
        )])
    }
}
