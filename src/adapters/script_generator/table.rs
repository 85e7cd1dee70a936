// テーブルスクリプトジェネレーター
//
// CREATE TABLE 文と、それに付随する制約・インデックス・コメントの文を生成します。
// 制約やインデックスをCREATE TABLE内に埋め込むかは `scripts_in_create_table` 属性に従い、
// 埋め込まない場合はCREATE TABLEの後に ALTER TABLE / CREATE INDEX として出力します。

use super::{
    CheckScriptGenerator, ColumnScriptGenerator, ForeignKeyScriptGenerator, GeneratorContext,
    IndexScriptGenerator, PrimaryKeyScriptGenerator, ScriptGenerator, TableChild,
    UniqueKeyScriptGenerator,
};
use crate::adapters::dialect::{quote_literal, CommentStyle};
use crate::core::error::GeneratorError;
use crate::core::metadata::{ForeignKey, Table, TableId};
use tracing::{debug, warn};

/// テーブル単位の生成結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableScripts {
    /// CREATE TABLE と付随する文（出力順）
    pub scripts: Vec<String>,
    /// 後から ALTER TABLE で追加すべき外部キー（`Table::foreign_keys` の添字）
    pub deferred_foreign_keys: Vec<usize>,
}

/// テーブルスクリプトジェネレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct TableScriptGenerator;

impl TableScriptGenerator {
    /// CREATE TABLE と付随する文を生成
    ///
    /// `embed_foreign_key` が true を返す外部キーのみCREATE TABLE内に埋め込み、
    /// それ以外は `deferred_foreign_keys` として呼び出し元に返します。
    /// 制約を埋め込まない設定では、すべての外部キーが後回しになります。
    pub fn create_table_scripts(
        &self,
        id: TableId,
        context: &GeneratorContext<'_>,
        embed_foreign_key: impl Fn(&ForeignKey) -> bool,
    ) -> Result<TableScripts, GeneratorError> {
        let table = context.database.get_table(id)?;
        let target = context.target();
        let in_create_table = context.config.scripts_in_create_table();
        let table_name = context.table_name(table)?;

        let mut elements = Vec::new();
        for column in &table.columns {
            elements.push(ColumnScriptGenerator.definition(table, column, context)?);
        }

        let mut trailing = Vec::new();
        let mut deferred_foreign_keys = Vec::new();

        // 主キー・ユニーク制約・チェック制約
        if let Some(primary_key) = &table.primary_key {
            if in_create_table {
                elements.push(PrimaryKeyScriptGenerator.clause(primary_key, context));
            } else {
                trailing.extend(
                    PrimaryKeyScriptGenerator
                        .create_scripts(&TableChild::new(table, primary_key), context)?,
                );
            }
        }
        for unique_key in &table.unique_keys {
            if in_create_table {
                elements.push(UniqueKeyScriptGenerator.clause(unique_key, context));
            } else {
                trailing.extend(
                    UniqueKeyScriptGenerator
                        .create_scripts(&TableChild::new(table, unique_key), context)?,
                );
            }
        }
        for check in &table.checks {
            if !target.supports_column_check() {
                warn!(
                    table = %table.name,
                    constraint = check.name.as_deref().unwrap_or_default(),
                    dialect = %target.kind(),
                    "Skipping CHECK constraint"
                );
                continue;
            }
            if in_create_table {
                elements.push(CheckScriptGenerator.clause(check, context)?);
            } else {
                trailing.extend(
                    CheckScriptGenerator.create_scripts(&TableChild::new(table, check), context)?,
                );
            }
        }

        // 外部キー
        for (position, foreign_key) in table.foreign_keys.iter().enumerate() {
            if in_create_table && embed_foreign_key(foreign_key) {
                elements.push(ForeignKeyScriptGenerator.clause(foreign_key, context)?);
            } else {
                debug!(
                    table = %table.name,
                    constraint = foreign_key.name.as_deref().unwrap_or_default(),
                    "Deferring foreign key"
                );
                deferred_foreign_keys.push(position);
            }
        }

        // インデックス
        if in_create_table && target.supports_index_in_create_table() {
            for index in &table.indexes {
                elements.push(IndexScriptGenerator.inline_clause(index, context));
            }
        } else if context.config.merge_indexes()
            && target.supports_create_multiple_indexes()
            && table.indexes.len() > 1
        {
            trailing.extend(IndexScriptGenerator.create_multiple_indexes(
                table,
                &table.indexes,
                context,
            )?);
        } else {
            for index in &table.indexes {
                trailing.extend(
                    IndexScriptGenerator.create_scripts(&TableChild::new(table, index), context)?,
                );
            }
        }

        let mut create = format!("CREATE TABLE {} ({})", table_name, elements.join(", "));
        trailing.extend(self.comment_scripts(table, &table_name, &mut create, context));

        let mut scripts = vec![create];
        scripts.extend(trailing);
        Ok(TableScripts {
            scripts,
            deferred_foreign_keys,
        })
    }

    /// コメントを方言のスタイルで出力
    ///
    /// インラインのテーブルコメントは `create` に追記し、COMMENT ON 文は戻り値として返します。
    fn comment_scripts(
        &self,
        table: &Table,
        table_name: &str,
        create: &mut String,
        context: &GeneratorContext<'_>,
    ) -> Vec<String> {
        let target = context.target();
        let has_comments =
            table.comment.is_some() || table.columns.iter().any(|c| c.comment.is_some());
        if !has_comments {
            return Vec::new();
        }

        match target.comment_style() {
            CommentStyle::Inline => {
                if let Some(comment) = &table.comment {
                    create.push_str(&target.table_comment(comment));
                }
                Vec::new()
            }
            CommentStyle::CommentOn => {
                let mut scripts = Vec::new();
                if let Some(comment) = &table.comment {
                    scripts.push(format!(
                        "COMMENT ON TABLE {} IS {}",
                        table_name,
                        quote_literal(comment)
                    ));
                }
                for column in &table.columns {
                    if let Some(comment) = &column.comment {
                        scripts.push(format!(
                            "COMMENT ON COLUMN {}.{} IS {}",
                            table_name,
                            context.quote(&column.name),
                            quote_literal(comment)
                        ));
                    }
                }
                scripts
            }
            CommentStyle::Unsupported => {
                warn!(
                    table = %table.name,
                    dialect = %target.kind(),
                    "Skipping table and column comments"
                );
                Vec::new()
            }
        }
    }
}

impl ScriptGenerator<TableId> for TableScriptGenerator {
    fn create_scripts(
        &self,
        id: &TableId,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let TableScripts {
            mut scripts,
            deferred_foreign_keys,
        } = self.create_table_scripts(*id, context, |_| true)?;

        let table = context.database.get_table(*id)?;
        for position in deferred_foreign_keys {
            let foreign_key = &table.foreign_keys[position];
            scripts.extend(
                ForeignKeyScriptGenerator
                    .create_scripts(&TableChild::new(table, foreign_key), context)?,
            );
        }
        Ok(scripts)
    }

    fn drop_scripts(
        &self,
        id: &TableId,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let table = context.database.get_table(*id)?;
        Ok(vec![context.target().drop_table(&context.table_name(table)?)])
    }
}
