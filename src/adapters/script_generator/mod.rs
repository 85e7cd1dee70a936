// スクリプトジェネレーター
//
// メタデータのエンティティ種別ごとに、移行先方言のCREATE/DROP文を生成します。
// ジェネレーターは状態を持たず、方言・命名・スクリプト種別などの設定は
// GeneratorContext を通じて受け取ります。

mod check;
mod column;
mod foreign_key;
mod index;
mod primary_key;
mod schema;
mod sequence;
mod table;
mod unique_key;

pub use check::CheckScriptGenerator;
pub use column::ColumnScriptGenerator;
pub use foreign_key::ForeignKeyScriptGenerator;
pub use index::IndexScriptGenerator;
pub use primary_key::PrimaryKeyScriptGenerator;
pub use schema::SchemaScriptGenerator;
pub use sequence::SequenceScriptGenerator;
pub use table::{TableScriptGenerator, TableScripts};
pub use unique_key::UniqueKeyScriptGenerator;

use crate::adapters::dialect::{create_dialect, Dialect};
use crate::adapters::translator::TranslationContext;
use crate::core::config::{
    DialectKind, MigratorConfig, ScriptType, TypeNameFallback, ZeroDateTimeBehavior,
};
use crate::core::error::GeneratorError;
use crate::core::metadata::{Database, SchemaId, Table};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

/// 属性キー: 制約・インデックスをCREATE TABLE内に埋め込むか
pub const SCRIPTS_IN_CREATE_TABLE: &str = "scripts_in_create_table";

/// 属性キー: 同一テーブルの複数インデックスを1文にまとめるか
pub const MERGE_INDEXES: &str = "merge_indexes";

/// スクリプト生成の設定
///
/// 生成リクエストごとの設定。並行する生成リクエストはそれぞれ独立したインスタンスを使用します。
#[derive(Debug, Clone)]
pub struct ScriptGeneratorConfig {
    /// 移行元方言
    pub source_dialect: Arc<dyn Dialect>,
    /// 移行先方言
    pub target_dialect: Arc<dyn Dialect>,
    /// 生成するスクリプトの種類
    pub script_types: BTreeSet<ScriptType>,
    /// 移行先カタログ名の上書き
    pub target_catalog: Option<String>,
    /// 移行先スキーマ名の上書き
    pub target_schema: Option<String>,
    /// テーブル名をスキーマで修飾するか
    pub qualify_names: bool,
    /// 型名が解決できない場合の扱い
    pub type_name_fallback: TypeNameFallback,
    /// ゼロ日付の扱い
    pub zero_date_time_behavior: ZeroDateTimeBehavior,
    /// 自由形式の属性
    pub attributes: Map<String, Value>,
}

impl ScriptGeneratorConfig {
    /// CREATEのみを生成する既定の設定を作成
    pub fn new(source_dialect: Arc<dyn Dialect>, target_dialect: Arc<dyn Dialect>) -> Self {
        let mut attributes = Map::new();
        attributes.insert(SCRIPTS_IN_CREATE_TABLE.to_string(), Value::Bool(true));
        Self {
            source_dialect,
            target_dialect,
            script_types: BTreeSet::from([ScriptType::Create]),
            target_catalog: None,
            target_schema: None,
            qualify_names: false,
            type_name_fallback: TypeNameFallback::default(),
            zero_date_time_behavior: ZeroDateTimeBehavior::default(),
            attributes,
        }
    }

    /// 方言の種類から作成
    pub fn for_dialects(source: DialectKind, target: DialectKind) -> Self {
        Self::new(create_dialect(source), create_dialect(target))
    }

    /// マイグレーション設定ファイルから作成
    pub fn from_migrator_config(config: &MigratorConfig) -> Self {
        let mut generator_config =
            Self::for_dialects(config.source.dialect, config.target.dialect)
                .with_script_types(config.scripts.types.iter().copied());
        generator_config.target_catalog = config.target.catalog.clone();
        generator_config.target_schema = config.target.schema.clone();
        generator_config.qualify_names = config.scripts.qualify_names;
        generator_config.type_name_fallback = config.scripts.type_name_fallback;
        generator_config.zero_date_time_behavior = config.zero_date_time_behavior();
        generator_config.set_attribute(SCRIPTS_IN_CREATE_TABLE, config.scripts.in_create_table);
        generator_config.set_attribute(MERGE_INDEXES, config.scripts.merge_indexes);
        generator_config
    }

    /// スクリプト種別を置き換える
    pub fn with_script_types(mut self, types: impl IntoIterator<Item = ScriptType>) -> Self {
        self.script_types = types.into_iter().collect();
        self
    }

    /// 属性を設定
    pub fn set_attribute(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// 真偽値の属性を取得
    pub fn attribute_bool(&self, key: &str) -> Option<bool> {
        self.attributes.get(key).and_then(Value::as_bool)
    }

    /// 制約・インデックスをCREATE TABLE内に埋め込むか（既定: true）
    pub fn scripts_in_create_table(&self) -> bool {
        self.attribute_bool(SCRIPTS_IN_CREATE_TABLE).unwrap_or(true)
    }

    /// 複数インデックスをまとめるか（既定: false）
    pub fn merge_indexes(&self) -> bool {
        self.attribute_bool(MERGE_INDEXES).unwrap_or(false)
    }
}

/// ジェネレーターに渡される生成コンテキスト
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    /// 生成対象のメタデータグラフ
    pub database: &'a Database,
    /// 生成設定
    pub config: &'a ScriptGeneratorConfig,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(database: &'a Database, config: &'a ScriptGeneratorConfig) -> Self {
        Self { database, config }
    }

    pub fn source(&self) -> &'a dyn Dialect {
        self.config.source_dialect.as_ref()
    }

    pub fn target(&self) -> &'a dyn Dialect {
        self.config.target_dialect.as_ref()
    }

    pub fn script_types(&self) -> &'a BTreeSet<ScriptType> {
        &self.config.script_types
    }

    /// トランスレーター用のコンテキスト
    pub fn translation_context(&self) -> TranslationContext<'a> {
        TranslationContext::new(
            self.source(),
            self.target(),
            self.config.zero_date_time_behavior,
        )
    }

    /// 識別子を移行先方言でクォート
    pub fn quote(&self, identifier: &str) -> String {
        self.target().quote(identifier)
    }

    /// USE/DROP SCHEMA に使用するスキーマ識別子を解決
    ///
    /// スキーマ名の上書き → カタログ名の上書き → スキーマ自身の名前 → カタログ名 の順で決定します。
    pub fn schema_identifier(&self, schema: SchemaId) -> Result<Option<String>, GeneratorError> {
        if let Some(name) = &self.config.target_schema {
            return Ok(Some(name.clone()));
        }
        if let Some(name) = &self.config.target_catalog {
            return Ok(Some(name.clone()));
        }
        let schema = self.database.get_schema(schema)?;
        if let Some(name) = &schema.name {
            return Ok(Some(name.clone()));
        }
        Ok(self.database.get_catalog(schema.catalog)?.name.clone())
    }

    /// スキーマ内のオブジェクト名を（必要に応じて修飾して）クォート
    pub fn object_name(&self, schema: SchemaId, name: &str) -> Result<String, GeneratorError> {
        if self.config.qualify_names {
            if let Some(identifier) = self.schema_identifier(schema)? {
                return Ok(format!("{}.{}", self.quote(&identifier), self.quote(name)));
            }
        }
        Ok(self.quote(name))
    }

    /// テーブル名をクォート
    pub fn table_name(&self, table: &Table) -> Result<String, GeneratorError> {
        self.object_name(table.schema, &table.name)
    }
}

/// テーブルに属するエンティティ
#[derive(Debug, Clone, Copy)]
pub struct TableChild<'a, T> {
    /// 所属テーブル
    pub table: &'a Table,
    /// エンティティ
    pub object: &'a T,
}

impl<'a, T> TableChild<'a, T> {
    pub fn new(table: &'a Table, object: &'a T) -> Self {
        Self { table, object }
    }
}

/// エンティティ単位のスクリプトジェネレーター
pub trait ScriptGenerator<T: ?Sized> {
    /// CREATE文を生成
    fn create_scripts(
        &self,
        object: &T,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError>;

    /// DROP文を生成
    fn drop_scripts(
        &self,
        object: &T,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError>;

    /// 要求されたスクリプト種別に応じて生成
    ///
    /// DROPとCREATEの両方が要求された場合はDROP文を先に返します。
    fn scripts(
        &self,
        object: &T,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        let types = context.script_types();
        let drop = types.contains(&ScriptType::Drop);
        let create = types.contains(&ScriptType::Create);

        match (drop, create) {
            (true, true) => {
                let mut scripts = self.drop_scripts(object, context)?;
                scripts.extend(self.create_scripts(object, context)?);
                Ok(scripts)
            }
            (true, false) => self.drop_scripts(object, context),
            (false, true) => self.create_scripts(object, context),
            (false, false) => Ok(Vec::new()),
        }
    }
}

/// 制約名が付いていれば `CONSTRAINT name ` を返す
pub(crate) fn constraint_prefix(context: &GeneratorContext<'_>, name: Option<&str>) -> String {
    name.map(|name| format!("CONSTRAINT {} ", context.quote(name)))
        .unwrap_or_default()
}
