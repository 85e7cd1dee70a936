// スクリプトジェネレーターマネージャー
//
// メタデータグラフ全体（データベース・カタログ・スキーマ・テーブル）を対象に、
// エンティティ単位のジェネレーターを依存順に呼び出してスクリプト列を組み立てます。
//
// DROPフェーズ: スキーマ切り替え → 外部キー → シーケンス → テーブル（参照元が先）→ スキーマ
// CREATEフェーズ: スキーマ切り替え → シーケンス → テーブル（参照先が先）→ 後回しにした外部キー

use crate::adapters::script_generator::{
    ForeignKeyScriptGenerator, GeneratorContext, SchemaScriptGenerator, ScriptGenerator,
    ScriptGeneratorConfig, SequenceScriptGenerator, TableChild, TableScriptGenerator,
};
use crate::core::config::ScriptType;
use crate::core::error::GeneratorError;
use crate::core::metadata::{CatalogId, Database, SchemaId, Sequence, TableId};
use crate::services::dependency_order::{creation_order, drop_order};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// 生成対象のオブジェクト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRef {
    /// データベース全体
    Database,
    /// カタログ配下の全スキーマ
    Catalog(CatalogId),
    /// スキーマ配下の全テーブル・シーケンス
    Schema(SchemaId),
    /// 単一のテーブル
    Table(TableId),
}

/// 生成結果
///
/// 要求されなかったフェーズは None、要求されたが生成する文がなかったフェーズは空のVecになります。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scripts {
    /// DROPフェーズの文
    pub drop: Option<Vec<String>>,
    /// CREATEフェーズの文
    pub create: Option<Vec<String>>,
}

impl Scripts {
    /// DROPフェーズ、CREATEフェーズの順に連結
    pub fn into_statements(self) -> Vec<String> {
        self.drop
            .into_iter()
            .chain(self.create)
            .flatten()
            .collect()
    }

    /// 文の総数
    pub fn len(&self) -> usize {
        self.drop.as_ref().map_or(0, Vec::len) + self.create.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// スキーマ単位の生成対象
struct SchemaScope {
    schema: SchemaId,
    tables: Vec<TableId>,
    /// スキーマ切り替え・スキーマ削除・シーケンスを出力するか
    schema_level: bool,
}

/// スクリプトジェネレーターマネージャー
///
/// 設定は生成リクエストごとに独立したインスタンスを使用します。
/// メタデータグラフは読み取り専用で、複数のマネージャーから共有できます。
#[derive(Debug, Clone)]
pub struct ScriptGeneratorManager {
    config: ScriptGeneratorConfig,
}

impl ScriptGeneratorManager {
    pub fn new(config: ScriptGeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScriptGeneratorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ScriptGeneratorConfig {
        &mut self.config
    }

    /// 指定したオブジェクトのスクリプトを生成
    pub fn get_scripts(
        &self,
        database: &Database,
        object: ObjectRef,
    ) -> Result<Scripts, GeneratorError> {
        let context = GeneratorContext::new(database, &self.config);
        let scopes = self.collect_scopes(database, object)?;
        let types = context.script_types();

        info!(
            object = ?object,
            source = %context.source().kind(),
            target = %context.target().kind(),
            types = ?types,
            "Generating scripts"
        );

        let drop = if types.contains(&ScriptType::Drop) {
            Some(self.drop_phase(&scopes, &context)?)
        } else {
            None
        };
        let create = if types.contains(&ScriptType::Create) {
            Some(self.create_phase(&scopes, &context)?)
        } else {
            None
        };

        let scripts = Scripts { drop, create };
        debug!(statements = scripts.len(), "Scripts generated");
        Ok(scripts)
    }

    fn collect_scopes(
        &self,
        database: &Database,
        object: ObjectRef,
    ) -> Result<Vec<SchemaScope>, GeneratorError> {
        let schema_scope = |schema: SchemaId| -> Result<SchemaScope, GeneratorError> {
            Ok(SchemaScope {
                schema,
                tables: database.get_schema(schema)?.tables.clone(),
                schema_level: true,
            })
        };

        match object {
            ObjectRef::Database => database
                .catalogs()
                .flat_map(|(_, catalog)| catalog.schemas.iter().copied())
                .map(schema_scope)
                .collect(),
            ObjectRef::Catalog(catalog) => database
                .get_catalog(catalog)?
                .schemas
                .iter()
                .copied()
                .map(schema_scope)
                .collect(),
            ObjectRef::Schema(schema) => Ok(vec![schema_scope(schema)?]),
            ObjectRef::Table(table) => Ok(vec![SchemaScope {
                schema: database.get_table(table)?.schema,
                tables: vec![table],
                schema_level: false,
            }]),
        }
    }

    fn drop_phase(
        &self,
        scopes: &[SchemaScope],
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let database = context.database;
        let target = context.target();
        let mut scripts = Vec::new();

        for scope in scopes.iter().rev() {
            if scope.schema_level {
                scripts.extend(SchemaScriptGenerator.create_scripts(&scope.schema, context)?);
            }

            let order = drop_order(database, &scope.tables)?;

            for &id in &order {
                let table = database.get_table(id)?;
                for foreign_key in &table.foreign_keys {
                    if foreign_key.name.is_none() {
                        warn!(
                            table = %table.name,
                            "Skipping DROP of an unnamed foreign key"
                        );
                        continue;
                    }
                    scripts.extend(
                        ForeignKeyScriptGenerator
                            .drop_scripts(&TableChild::new(table, foreign_key), context)?,
                    );
                }
            }

            if scope.schema_level {
                for sequence in self.standalone_sequences(scope.schema, context)? {
                    scripts.extend(SequenceScriptGenerator.drop_scripts(sequence, context)?);
                }
            }

            for id in &order {
                debug!(table = %database.get_table(*id)?.name, "Generating DROP TABLE");
                scripts.extend(TableScriptGenerator.drop_scripts(id, context)?);
            }

            if scope.schema_level {
                scripts.extend(SchemaScriptGenerator.drop_scripts(&scope.schema, context)?);
            }
        }

        debug!(dialect = %target.kind(), statements = scripts.len(), "DROP phase generated");
        Ok(scripts)
    }

    fn create_phase(
        &self,
        scopes: &[SchemaScope],
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let database = context.database;
        let in_scope: HashSet<TableId> = scopes
            .iter()
            .flat_map(|scope| scope.tables.iter().copied())
            .collect();
        let mut created: HashSet<TableId> = HashSet::new();
        let mut scripts = Vec::new();
        let mut deferred: Vec<(usize, TableId, Vec<usize>)> = Vec::new();

        for (position, scope) in scopes.iter().enumerate() {
            if scope.schema_level {
                scripts.extend(SchemaScriptGenerator.create_scripts(&scope.schema, context)?);
                for sequence in self.standalone_sequences(scope.schema, context)? {
                    scripts.extend(SequenceScriptGenerator.create_scripts(sequence, context)?);
                }
            }

            for id in creation_order(database, &scope.tables)? {
                debug!(table = %database.get_table(id)?.name, "Generating CREATE TABLE");
                let result = TableScriptGenerator.create_table_scripts(id, context, |fk| {
                    let referenced = fk.referenced_table;
                    referenced == id
                        || !in_scope.contains(&referenced)
                        || created.contains(&referenced)
                })?;
                scripts.extend(result.scripts);
                if !result.deferred_foreign_keys.is_empty() {
                    deferred.push((position, id, result.deferred_foreign_keys));
                }
                created.insert(id);
            }
        }

        // 後回しにした外部キーをスキーマごとにまとめて追加
        let mut current_scope = None;
        for (position, id, foreign_keys) in deferred {
            let scope = &scopes[position];
            if scope.schema_level && current_scope != Some(position) {
                scripts.extend(SchemaScriptGenerator.create_scripts(&scope.schema, context)?);
            }
            current_scope = Some(position);

            let table = database.get_table(id)?;
            for index in foreign_keys {
                let foreign_key = &table.foreign_keys[index];
                scripts.extend(
                    ForeignKeyScriptGenerator
                        .create_scripts(&TableChild::new(table, foreign_key), context)?,
                );
            }
        }

        Ok(scripts)
    }

    /// 自動増分ではない、名前付きのシーケンス
    ///
    /// シーケンスに対応しない移行先ではスキップします。
    fn standalone_sequences<'a>(
        &self,
        schema: SchemaId,
        context: &GeneratorContext<'a>,
    ) -> Result<Vec<&'a Sequence>, GeneratorError> {
        let database = context.database;
        let mut sequences = Vec::new();
        for id in &database.get_schema(schema)?.sequences {
            let sequence = database.get_sequence(*id)?;
            if sequence.auto_increment || sequence.name.is_none() {
                continue;
            }
            if !context.target().supports_sequences() {
                warn!(
                    sequence = sequence.name.as_deref().unwrap_or_default(),
                    dialect = %context.target().kind(),
                    "Skipping sequence"
                );
                continue;
            }
            sequences.push(sequence);
        }
        Ok(sequences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DialectKind;
    use crate::core::metadata::{Column, ForeignKey, ReferentialAction};
    use crate::core::type_code;

    fn database() -> (Database, SchemaId, TableId, TableId) {
        let mut database = Database::new(Some(DialectKind::MySQL));
        let catalog = database.add_catalog(Some("shop")).unwrap();
        let schema = database.add_schema(catalog, None).unwrap();
        let orders = database.add_table(schema, "orders").unwrap();
        let users = database.add_table(schema, "users").unwrap();
        database
            .get_table_mut(users)
            .unwrap()
            .add_column(Column::new("id", type_code::INTEGER, "INT"))
            .unwrap();
        let table = database.get_table_mut(orders).unwrap();
        table
            .add_column(Column::new("user_id", type_code::INTEGER, "INT"))
            .unwrap();
        table
            .add_foreign_key(ForeignKey {
                name: Some("fk_orders_users".to_string()),
                columns: vec!["user_id".to_string()],
                referenced_table: users,
                referenced_columns: vec!["id".to_string()],
                update_action: ReferentialAction::NoAction,
                delete_action: ReferentialAction::NoAction,
            })
            .unwrap();
        (database, schema, orders, users)
    }

    #[test]
    fn test_schema_scripts_in_dependency_order() {
        let (database, schema, _, _) = database();
        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Target)
            .with_script_types([ScriptType::Drop, ScriptType::Create]);
        let manager = ScriptGeneratorManager::new(config);

        let scripts = manager
            .get_scripts(&database, ObjectRef::Schema(schema))
            .unwrap();
        assert_eq!(
            scripts.drop,
            Some(vec![
                r#"USE "shop""#.to_string(),
                r#"ALTER TABLE "orders" DROP CONSTRAINT "fk_orders_users""#.to_string(),
                r#"DROP TABLE IF EXISTS "orders""#.to_string(),
                r#"DROP TABLE IF EXISTS "users""#.to_string(),
                r#"DROP SCHEMA "shop" CASCADE"#.to_string(),
            ])
        );
        assert_eq!(
            scripts.create,
            Some(vec![
                r#"USE "shop""#.to_string(),
                r#"CREATE TABLE "users" ("id" INTEGER)"#.to_string(),
                r#"CREATE TABLE "orders" ("user_id" INTEGER, CONSTRAINT "fk_orders_users" FOREIGN KEY ("user_id") REFERENCES "users" ("id"))"#.to_string(),
            ])
        );
    }

    #[test]
    fn test_phase_not_requested_is_none() {
        let (database, _, orders, _) = database();
        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Target);
        let manager = ScriptGeneratorManager::new(config);

        let scripts = manager
            .get_scripts(&database, ObjectRef::Table(orders))
            .unwrap();
        assert!(scripts.drop.is_none());
        assert_eq!(scripts.create.as_ref().map(Vec::len), Some(1));

        let mut manager = manager;
        manager.config_mut().script_types.clear();
        let scripts = manager
            .get_scripts(&database, ObjectRef::Table(orders))
            .unwrap();
        assert_eq!(scripts, Scripts::default());
        assert!(scripts.is_empty());
    }

    #[test]
    fn test_into_statements_drop_first() {
        let scripts = Scripts {
            drop: Some(vec!["DROP TABLE a".to_string()]),
            create: Some(vec!["CREATE TABLE a (b INTEGER)".to_string()]),
        };
        assert_eq!(
            scripts.into_statements(),
            vec!["DROP TABLE a".to_string(), "CREATE TABLE a (b INTEGER)".to_string()]
        );
    }
}
