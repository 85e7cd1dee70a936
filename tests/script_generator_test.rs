/// スクリプトジェネレーターのテスト
///
/// エンティティ単位のジェネレーターが、移行先方言の構文でCREATE/DROP文を生成することを確認します。
use dbporter::adapters::script_generator::{
    CheckScriptGenerator, ColumnScriptGenerator, GeneratorContext, PrimaryKeyScriptGenerator,
    ScriptGenerator, ScriptGeneratorConfig, SequenceScriptGenerator, TableChild,
    TableScriptGenerator, UniqueKeyScriptGenerator,
};
use dbporter::core::config::{DialectKind, ScriptType, TypeNameFallback};
use dbporter::core::metadata::{
    CheckConstraint, Column, Database, DefaultValue, PrimaryKey, Sequence, TableId, UniqueKey,
};
use dbporter::core::type_code;

#[cfg(test)]
mod script_generator_tests {
    use super::*;

    fn single_table(
        source: DialectKind,
        table: &str,
        columns: Vec<Column>,
    ) -> (Database, TableId) {
        let mut database = Database::new(Some(source));
        let catalog = database.add_catalog(Some("catalog")).unwrap();
        let schema = database.add_schema(catalog, None).unwrap();
        let id = database.add_table(schema, table).unwrap();
        for column in columns {
            database.get_table_mut(id).unwrap().add_column(column).unwrap();
        }
        (database, id)
    }

    /// 複合主キーのカラムが宣言順のまま出力されることを確認
    #[test]
    fn test_composite_primary_key_keeps_declared_order() {
        let (mut database, id) = single_table(
            DialectKind::MySQL,
            "pairs",
            vec![
                Column::new("A", type_code::INTEGER, "INT"),
                Column::new("B", type_code::INTEGER, "INT"),
            ],
        );
        database
            .get_table_mut(id)
            .unwrap()
            .set_primary_key(PrimaryKey {
                name: None,
                columns: vec!["B".to_string(), "A".to_string()],
            })
            .unwrap();

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Target);
        let context = GeneratorContext::new(&database, &config);
        let table = database.get_table(id).unwrap();
        let primary_key = table.primary_key.as_ref().unwrap();

        assert_eq!(
            PrimaryKeyScriptGenerator.clause(primary_key, &context),
            r#"PRIMARY KEY ("B", "A")"#
        );
        assert_eq!(
            PrimaryKeyScriptGenerator
                .create_scripts(&TableChild::new(table, primary_key), &context)
                .unwrap(),
            vec![r#"ALTER TABLE "pairs" ADD PRIMARY KEY ("B", "A")"#.to_string()]
        );
    }

    /// ユーザー定義型のカラムがBLOBにフォールバックすることを確認
    #[test]
    fn test_user_defined_type_falls_back_to_blob() {
        let mut column = Column::new("usertype", type_code::OTHER, "USERTYPE");
        column.user_defined_type = true;
        let (database, id) = single_table(DialectKind::Generic, "users", vec![column]);

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::Generic, DialectKind::Target);
        let context = GeneratorContext::new(&database, &config);

        assert_eq!(
            TableScriptGenerator.create_scripts(&id, &context).unwrap(),
            vec![r#"CREATE TABLE "users" ("usertype" BLOB)"#.to_string()]
        );
    }

    /// 識別子のクォートが方言に従うことを確認
    #[test]
    fn test_identifier_quoting_per_dialect() {
        let mut column = Column::new("usertype", type_code::OTHER, "USERTYPE");
        column.user_defined_type = true;
        let (database, id) = single_table(DialectKind::Generic, "users", vec![column]);
        let table = database.get_table(id).unwrap();

        let mysql = ScriptGeneratorConfig::for_dialects(DialectKind::Generic, DialectKind::MySQL);
        let definition = ColumnScriptGenerator
            .definition(table, &table.columns[0], &GeneratorContext::new(&database, &mysql))
            .unwrap();
        assert!(definition.starts_with("`usertype` "));

        let target = ScriptGeneratorConfig::for_dialects(DialectKind::Generic, DialectKind::Target);
        let definition = ColumnScriptGenerator
            .definition(table, &table.columns[0], &GeneratorContext::new(&database, &target))
            .unwrap();
        assert!(definition.starts_with(r#""usertype" "#));
    }

    /// 解決できない型は既定で生成エラーになり、設定でソースの型名に切り替えられることを確認
    #[test]
    fn test_unresolvable_type_fallback() {
        let (database, id) = single_table(
            DialectKind::MySQL,
            "shapes",
            vec![Column::new("area", type_code::OTHER, "GEOMETRY")],
        );
        let table = database.get_table(id).unwrap();

        let mut config =
            ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Target);
        assert_eq!(config.type_name_fallback, TypeNameFallback::Fail);
        let error = ColumnScriptGenerator
            .type_name(table, &table.columns[0], &GeneratorContext::new(&database, &config))
            .unwrap_err();
        assert!(error.is_unresolvable_type());
        assert_eq!(
            error.location().and_then(|l| l.column.as_deref()),
            Some("area")
        );

        let error = TableScriptGenerator
            .create_scripts(&id, &GeneratorContext::new(&database, &config))
            .unwrap_err();
        assert!(error.is_unresolvable_type());
        assert!(error.to_string().contains("column: area"));

        config.type_name_fallback = TypeNameFallback::SourceTypeName;
        assert_eq!(
            ColumnScriptGenerator
                .type_name(table, &table.columns[0], &GeneratorContext::new(&database, &config))
                .unwrap(),
            "GEOMETRY"
        );
    }

    /// DROPとCREATEの両方を要求した場合、DROP文が先に来ることを確認
    #[test]
    fn test_drop_before_create() {
        let (database, id) = single_table(
            DialectKind::MySQL,
            "users",
            vec![Column::new("id", type_code::INTEGER, "INT")],
        );
        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Target)
            .with_script_types([ScriptType::Create, ScriptType::Drop]);
        let context = GeneratorContext::new(&database, &config);

        assert_eq!(
            TableScriptGenerator.scripts(&id, &context).unwrap(),
            vec![
                r#"DROP TABLE IF EXISTS "users""#.to_string(),
                r#"CREATE TABLE "users" ("id" INTEGER)"#.to_string(),
            ]
        );

        let config = config.with_script_types([]);
        let context = GeneratorContext::new(&database, &config);
        assert!(TableScriptGenerator.scripts(&id, &context).unwrap().is_empty());
    }

    /// 同じ入力から常に同じスクリプトが生成されることを確認
    #[test]
    fn test_generation_is_deterministic() {
        let mut email = Column::new("email", type_code::VARCHAR, "VARCHAR");
        email.size = Some(120);
        email.default_value = Some(DefaultValue::new("none"));
        let (database, id) = single_table(
            DialectKind::MySQL,
            "users",
            vec![Column::new("id", type_code::BIGINT, "BIGINT"), email],
        );
        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Oracle)
            .with_script_types([ScriptType::Drop, ScriptType::Create]);
        let context = GeneratorContext::new(&database, &config);

        let first = TableScriptGenerator.scripts(&id, &context).unwrap();
        for _ in 0..5 {
            assert_eq!(TableScriptGenerator.scripts(&id, &context).unwrap(), first);
        }
        assert!(first[1].contains(r#""email" VARCHAR2(120 CHAR) DEFAULT 'none'"#));
    }

    /// MySQLのゼロ日付デフォルト値がEXCEPTIONモードでエラーになることを確認
    #[test]
    fn test_zero_date_default_fails_in_exception_mode() {
        let mut column = Column::new("created_on", type_code::DATE, "DATE");
        column.default_value = Some(DefaultValue::new("0000-00-00"));
        let (database, id) = single_table(DialectKind::MySQL, "events", vec![column]);

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Target);
        let context = GeneratorContext::new(&database, &config);
        let error = TableScriptGenerator.create_scripts(&id, &context).unwrap_err();
        assert!(error.is_translation());
        assert!(error.to_string().contains("column: created_on"));
    }

    /// SQL Serverのデフォルト値の括弧が外されることを確認
    #[test]
    fn test_sqlserver_default_unwrapped() {
        let mut column = Column::new("qty", type_code::INTEGER, "int");
        column.default_value = Some(DefaultValue::new("((0))"));
        column.nullable = false;
        let (database, id) = single_table(DialectKind::SQLServer, "stock", vec![column]);

        let config =
            ScriptGeneratorConfig::for_dialects(DialectKind::SQLServer, DialectKind::Target);
        let context = GeneratorContext::new(&database, &config);
        assert_eq!(
            TableScriptGenerator.create_scripts(&id, &context).unwrap(),
            vec![r#"CREATE TABLE "stock" ("qty" INTEGER DEFAULT 0 NOT NULL)"#.to_string()]
        );
    }

    /// 各国語文字リテラルの接頭辞が移行先に応じて保持・除去されることを確認
    #[test]
    fn test_national_literal_prefix_per_target() {
        let mut column = Column::new("label", type_code::NVARCHAR, "nvarchar");
        column.size = Some(20);
        column.default_value = Some(DefaultValue::new("(N'none')"));
        let (database, id) = single_table(DialectKind::SQLServer, "tags", vec![column]);
        let table = database.get_table(id).unwrap();

        let default_for = |target: DialectKind| {
            let config = ScriptGeneratorConfig::for_dialects(DialectKind::SQLServer, target);
            let context = GeneratorContext::new(&database, &config);
            ColumnScriptGenerator
                .default_value(table, &table.columns[0], &context)
                .unwrap()
        };
        assert_eq!(default_for(DialectKind::SQLServer).as_deref(), Some("N'none'"));
        assert_eq!(default_for(DialectKind::Target).as_deref(), Some("'none'"));
    }

    /// CHECK制約に対応しない方言では非サポートエラーになることを確認
    #[test]
    fn test_check_constraint_unsupported() {
        let (mut database, id) = single_table(
            DialectKind::Oracle,
            "accounts",
            vec![Column::new("balance", type_code::NUMERIC, "NUMBER")],
        );
        database.get_table_mut(id).unwrap().add_check(CheckConstraint {
            name: Some("ck_balance".to_string()),
            clause: "(balance >= 0)".to_string(),
        });
        let table = database.get_table(id).unwrap();
        let check = TableChild::new(table, &table.checks[0]);

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::Oracle, DialectKind::MySQL);
        let context = GeneratorContext::new(&database, &config);
        assert!(CheckScriptGenerator
            .create_scripts(&check, &context)
            .unwrap_err()
            .is_unsupported());

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::Oracle, DialectKind::Target);
        let context = GeneratorContext::new(&database, &config);
        assert_eq!(
            CheckScriptGenerator.create_scripts(&check, &context).unwrap(),
            vec![
                r#"ALTER TABLE "accounts" ADD CONSTRAINT "ck_balance" CHECK ((balance >= 0))"#
                    .to_string()
            ]
        );
    }

    /// CHECK制約に対応しない移行先ではテーブル生成時にCHECK制約を省くことを確認
    #[test]
    fn test_table_skips_check_on_mysql_target() {
        let (mut database, id) = single_table(
            DialectKind::Oracle,
            "accounts",
            vec![Column::new("balance", type_code::INTEGER, "INT")],
        );
        database.get_table_mut(id).unwrap().add_check(CheckConstraint {
            name: Some("ck_balance".to_string()),
            clause: "balance >= 0".to_string(),
        });

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::Oracle, DialectKind::MySQL);
        let context = GeneratorContext::new(&database, &config);
        assert_eq!(
            TableScriptGenerator.create_scripts(&id, &context).unwrap(),
            vec!["CREATE TABLE `accounts` (`balance` INT)".to_string()]
        );
    }

    /// 名前のないユニーク制約は削除できないことを確認
    #[test]
    fn test_unnamed_unique_key_drop_unsupported() {
        let (mut database, id) = single_table(
            DialectKind::MySQL,
            "users",
            vec![Column::new("email", type_code::VARCHAR, "VARCHAR")],
        );
        database
            .get_table_mut(id)
            .unwrap()
            .add_unique_key(UniqueKey {
                name: None,
                columns: vec!["email".to_string()],
            })
            .unwrap();
        let table = database.get_table(id).unwrap();
        let unique_key = TableChild::new(table, &table.unique_keys[0]);

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Target);
        let context = GeneratorContext::new(&database, &config);
        assert_eq!(
            UniqueKeyScriptGenerator.create_scripts(&unique_key, &context).unwrap(),
            vec![r#"ALTER TABLE "users" ADD UNIQUE ("email")"#.to_string()]
        );
        assert!(UniqueKeyScriptGenerator
            .drop_scripts(&unique_key, &context)
            .unwrap_err()
            .is_unsupported());
    }

    /// 最後の値が上限に達したシーケンスは生成エラーになることを確認
    #[test]
    fn test_sequence_at_maximum_value_fails() {
        let (mut database, id) = single_table(
            DialectKind::MySQL,
            "orders",
            vec![Column::new("id", type_code::BIGINT, "BIGINT")],
        );
        let schema = database.get_table(id).unwrap().schema;

        let mut sequence = Sequence::new(schema, Some("order_seq"));
        sequence.last_value = Some(i64::MAX);
        database.bind_auto_increment(id, "id", sequence.clone()).unwrap();

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::MySQL, DialectKind::Target);
        let context = GeneratorContext::new(&database, &config);

        let error = SequenceScriptGenerator
            .create_scripts(&sequence, &context)
            .unwrap_err();
        assert!(error.is_metadata());

        let error = TableScriptGenerator.create_scripts(&id, &context).unwrap_err();
        assert!(error.is_metadata());
        assert!(error.to_string().contains("order_seq"));
    }
}
