// インデックススクリプトジェネレーター
//
// 単独の CREATE INDEX 文、CREATE TABLE 内のインデックス句、
// 複数インデックスをまとめた ALTER TABLE 文を生成します。

use super::{GeneratorContext, ScriptGenerator, TableChild};
use crate::core::error::GeneratorError;
use crate::core::metadata::{Index, SortOrder, Table};

/// インデックススクリプトジェネレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexScriptGenerator;

impl IndexScriptGenerator {
    /// 対象カラムのリスト（ソート方向付き）
    fn columns(&self, index: &Index, context: &GeneratorContext<'_>) -> String {
        index
            .columns
            .iter()
            .map(|column| {
                let name = context.quote(&column.name);
                match column.sort_order {
                    Some(SortOrder::Asc) => format!("{} ASC", name),
                    Some(SortOrder::Desc) => format!("{} DESC", name),
                    None => name,
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn unique_prefix(index: &Index) -> &'static str {
        if index.unique {
            "UNIQUE "
        } else {
            ""
        }
    }

    /// CREATE TABLE内のインデックス句 `[UNIQUE ]INDEX n (cols)`
    pub fn inline_clause(&self, index: &Index, context: &GeneratorContext<'_>) -> String {
        format!(
            "{}INDEX {} ({})",
            Self::unique_prefix(index),
            context.quote(&index.name),
            self.columns(index, context)
        )
    }

    /// 同一テーブルの複数インデックスを1つの ALTER TABLE 文にまとめる
    pub fn create_multiple_indexes(
        &self,
        table: &Table,
        indexes: &[Index],
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let target = context.target();
        if !target.supports_create_multiple_indexes() {
            return Err(GeneratorError::unsupported(
                target.kind().to_string(),
                "creating multiple indexes in one statement",
            ));
        }
        if indexes.is_empty() {
            return Ok(Vec::new());
        }

        let clauses = indexes
            .iter()
            .map(|index| format!("ADD {}", self.inline_clause(index, context)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(vec![format!(
            "ALTER TABLE {} {}",
            context.table_name(table)?,
            clauses
        )])
    }
}

impl<'a> ScriptGenerator<TableChild<'a, Index>> for IndexScriptGenerator {
    fn create_scripts(
        &self,
        object: &TableChild<'a, Index>,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let index = object.object;
        Ok(vec![format!(
            "CREATE {}INDEX {} ON {} ({})",
            Self::unique_prefix(index),
            context.quote(&index.name),
            context.table_name(object.table)?,
            self.columns(index, context)
        )])
    }

    fn drop_scripts(
        &self,
        object: &TableChild<'a, Index>,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(vec![context.target().drop_index(
            &context.quote(&object.object.name),
            &context.table_name(object.table)?,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::script_generator::ScriptGeneratorConfig;
    use crate::core::config::{DialectKind, ScriptType};
    use crate::core::metadata::{Column, Database, IndexColumn, TableId};
    use crate::core::type_code;

    fn database() -> (Database, TableId) {
        let mut database = Database::new(Some(DialectKind::MySQL));
        let catalog = database.add_catalog(Some("shop")).unwrap();
        let schema = database.add_schema(catalog, None).unwrap();
        let id = database.add_table(schema, "users").unwrap();
        let table = database.get_table_mut(id).unwrap();
        table
            .add_column(Column::new("email", type_code::VARCHAR, "VARCHAR"))
            .unwrap();
        table
            .add_column(Column::new("created_at", type_code::TIMESTAMP, "DATETIME"))
            .unwrap();
        table
            .add_index(Index::new("idx_users_email", &["email"], true))
            .unwrap();
        table
            .add_index(Index {
                name: "idx_users_created".to_string(),
                columns: vec![IndexColumn {
                    name: "created_at".to_string(),
                    sort_order: Some(SortOrder::Desc),
                }],
                unique: false,
            })
            .unwrap();
        (database, id)
    }

    #[test]
    fn test_create_and_drop_index() {
        let (database, id) = database();
        let table = database.get_table(id).unwrap();
        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Target)
            .with_script_types([ScriptType::Drop, ScriptType::Create]);
        let context = GeneratorContext::new(&database, &config);

        let scripts = IndexScriptGenerator
            .scripts(&TableChild::new(table, &table.indexes[1]), &context)
            .unwrap();
        assert_eq!(
            scripts,
            vec![
                r#"DROP INDEX "idx_users_created""#.to_string(),
                r#"CREATE INDEX "idx_users_created" ON "users" ("created_at" DESC)"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_drop_index_names_table_on_mysql() {
        let (database, id) = database();
        let table = database.get_table(id).unwrap();
        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::MySQL);
        let context = GeneratorContext::new(&database, &config);

        let scripts = IndexScriptGenerator
            .drop_scripts(&TableChild::new(table, &table.indexes[0]), &context)
            .unwrap();
        assert_eq!(scripts, vec!["DROP INDEX `idx_users_email` ON `users`".to_string()]);
    }

    #[test]
    fn test_create_multiple_indexes() {
        let (database, id) = database();
        let table = database.get_table(id).unwrap();
        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Target);
        let context = GeneratorContext::new(&database, &config);

        let scripts = IndexScriptGenerator
            .create_multiple_indexes(table, &table.indexes, &context)
            .unwrap();
        assert_eq!(
            scripts,
            vec![
                r#"ALTER TABLE "users" ADD UNIQUE INDEX "idx_users_email" ("email"), ADD INDEX "idx_users_created" ("created_at" DESC)"#
                    .to_string()
            ]
        );

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Oracle);
        let context = GeneratorContext::new(&database, &config);
        assert!(IndexScriptGenerator
            .create_multiple_indexes(table, &table.indexes, &context)
            .unwrap_err()
            .is_unsupported());
    }
}
