// メタデータドメインモデル
//
// 移行元データベースの構造を方言に依存しない形で表現するエンティティグラフ。
// Database をルートとするアリーナにカタログ・スキーマ・テーブル・シーケンスを保持し、
// エンティティ間の参照はIDで表現します（自己参照外部キーのため）。

use crate::core::config::DialectKind;
use crate::core::error::{ErrorLocation, MetadataError};
use crate::core::type_code::{self, TypeDesc, TypeSpecifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// カタログID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(pub usize);

/// スキーマID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(pub usize);

/// テーブルID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(pub usize);

/// シーケンスID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceId(pub usize);

/// データベース
///
/// メタデータグラフのルート。全エンティティを所有します。
/// 生成中は読み取り専用として扱われ、複数の生成リクエストから共有できます。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// 移行元の方言
    #[serde(default)]
    pub dialect: Option<DialectKind>,

    /// 文字エンコーディング
    #[serde(default)]
    pub encoding: Option<String>,

    /// 既定の照合順序
    #[serde(default)]
    pub collation: Option<String>,

    #[serde(default)]
    catalogs: Vec<Catalog>,
    #[serde(default)]
    schemas: Vec<Schema>,
    #[serde(default)]
    tables: Vec<Table>,
    #[serde(default)]
    sequences: Vec<Sequence>,
}

/// カタログ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// カタログ名（カタログを持たない方言ではNone）
    pub name: Option<String>,
    /// 所属するスキーマ
    pub schemas: Vec<SchemaId>,
}

/// スキーマ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// スキーマ名（スキーマを持たない方言ではNone）
    pub name: Option<String>,
    /// 所属カタログ
    pub catalog: CatalogId,
    /// 所属するテーブル（宣言順）
    pub tables: Vec<TableId>,
    /// 所属するシーケンス
    pub sequences: Vec<SequenceId>,
}

/// テーブル
///
/// 順序付きカラムと、主キー・外部キー・インデックス・ユニーク制約・チェック制約を保持します。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// テーブル名
    pub name: String,

    /// 所属スキーマ
    pub schema: SchemaId,

    /// テーブルコメント
    #[serde(default)]
    pub comment: Option<String>,

    /// カラム定義のリスト（宣言順）
    pub columns: Vec<Column>,

    /// プライマリキー
    #[serde(default)]
    pub primary_key: Option<PrimaryKey>,

    /// 外部キー定義のリスト
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,

    /// インデックス定義のリスト
    #[serde(default)]
    pub indexes: Vec<Index>,

    /// ユニーク制約のリスト
    #[serde(default)]
    pub unique_keys: Vec<UniqueKey>,

    /// チェック制約のリスト
    #[serde(default)]
    pub checks: Vec<CheckConstraint>,
}

/// カラム定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// カラム名
    pub name: String,

    /// 序数位置（1始まり、宣言順）
    pub position: u32,

    /// JDBC型コード
    pub type_code: i32,

    /// ソースの型名
    pub type_name: String,

    /// サイズ
    #[serde(default)]
    pub size: Option<u32>,

    /// 精度
    #[serde(default)]
    pub precision: Option<u32>,

    /// スケール
    #[serde(default)]
    pub scale: Option<i32>,

    /// NULL許可フラグ
    pub nullable: bool,

    /// デフォルト値
    #[serde(default)]
    pub default_value: Option<DefaultValue>,

    /// 自動増分シーケンス
    #[serde(default)]
    pub sequence: Option<SequenceId>,

    /// ユーザー定義型かどうか
    #[serde(default)]
    pub user_defined_type: bool,

    /// 照合順序
    #[serde(default)]
    pub collation: Option<String>,

    /// カラムコメント
    #[serde(default)]
    pub comment: Option<String>,
}

impl Column {
    /// 新しいカラムを作成（NULL許可、位置はテーブル追加時に決定）
    pub fn new(name: impl Into<String>, type_code: i32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: 0,
            type_code,
            type_name: type_name.into(),
            size: None,
            precision: None,
            scale: None,
            nullable: true,
            default_value: None,
            sequence: None,
            user_defined_type: false,
            collation: None,
            comment: None,
        }
    }

    /// 型記述子を取得
    pub fn type_desc(&self) -> TypeDesc {
        TypeDesc::named(self.type_code, self.type_name.clone())
    }

    /// 型指定子を取得
    pub fn specifiers(&self) -> TypeSpecifiers {
        TypeSpecifiers {
            size: self.size,
            precision: self.precision,
            scale: self.scale,
        }
    }

    /// 自動増分カラムかどうか
    pub fn is_auto_increment(&self) -> bool {
        self.sequence.is_some()
    }
}

/// デフォルト値
///
/// 生のSQL断片と、方言固有の展開（括弧の除去など）が適用済みかどうかのフラグ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultValue {
    /// SQL断片
    pub script: String,
    /// 処理済みフラグ
    #[serde(default)]
    pub processed: bool,
}

impl DefaultValue {
    /// 未処理のデフォルト値を作成
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            processed: false,
        }
    }

    /// 処理を適用する
    ///
    /// 処理済みの場合は何もしないため、何度呼び出しても結果は同じです。
    pub fn process<F>(&self, f: F) -> DefaultValue
    where
        F: FnOnce(&str) -> String,
    {
        if self.processed {
            return self.clone();
        }
        DefaultValue {
            script: f(&self.script),
            processed: true,
        }
    }
}

/// プライマリキー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// 制約名
    #[serde(default)]
    pub name: Option<String>,
    /// 対象カラム（宣言順）
    pub columns: Vec<String>,
}

/// 参照アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// SQLキーワードを取得
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

/// 外部キー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// 制約名
    #[serde(default)]
    pub name: Option<String>,
    /// 参照元カラム（宣言順）
    pub columns: Vec<String>,
    /// 参照先テーブル（自己参照可）
    pub referenced_table: TableId,
    /// 参照先カラム（参照元と同じ順序・数）
    pub referenced_columns: Vec<String>,
    /// 更新時アクション
    #[serde(default)]
    pub update_action: ReferentialAction,
    /// 削除時アクション
    #[serde(default)]
    pub delete_action: ReferentialAction,
}

/// ユニーク制約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    /// 制約名
    #[serde(default)]
    pub name: Option<String>,
    /// 対象カラム（宣言順）
    pub columns: Vec<String>,
}

/// チェック制約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConstraint {
    /// 制約名
    #[serde(default)]
    pub name: Option<String>,
    /// 述語（生のSQL）
    pub clause: String,
}

/// ソート方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// インデックス対象カラム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    /// カラム名
    pub name: String,
    /// ソート方向
    #[serde(default)]
    pub sort_order: Option<SortOrder>,
}

/// インデックス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// インデックス名
    pub name: String,
    /// 対象カラム（宣言順）
    pub columns: Vec<IndexColumn>,
    /// ユニークインデックスかどうか
    #[serde(default)]
    pub unique: bool,
}

impl Index {
    /// 新しいインデックスを作成
    pub fn new(name: impl Into<String>, columns: &[&str], unique: bool) -> Self {
        Self {
            name: name.into(),
            columns: columns
                .iter()
                .map(|c| IndexColumn {
                    name: c.to_string(),
                    sort_order: None,
                })
                .collect(),
            unique,
        }
    }
}

/// シーケンス（自動増分を含む）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// シーケンス名（自動増分ではNoneのことがある）
    #[serde(default)]
    pub name: Option<String>,
    /// 所属スキーマ
    pub schema: SchemaId,
    /// 開始値
    #[serde(default)]
    pub start_with: Option<i64>,
    /// 最後に払い出された値
    #[serde(default)]
    pub last_value: Option<i64>,
    /// 増分
    #[serde(default)]
    pub increment_by: Option<i64>,
    /// カラムに紐づく自動増分かどうか
    #[serde(default)]
    pub auto_increment: bool,
    /// 所有カラム（テーブル, カラム名）
    #[serde(default)]
    pub column: Option<(TableId, String)>,
}

impl Sequence {
    /// 新しいシーケンスを作成
    pub fn new(schema: SchemaId, name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            schema,
            start_with: None,
            last_value: None,
            increment_by: None,
            auto_increment: false,
            column: None,
        }
    }

    /// 増分（未設定の場合は1）
    pub fn increment(&self) -> i64 {
        self.increment_by.unwrap_or(1)
    }

    /// 移行先で払い出すべき次の値
    ///
    /// 移行済みデータと衝突しないよう、最後の値があればその次の値から開始します。
    pub fn next_value(&self) -> Result<i64, MetadataError> {
        let Some(last) = self.last_value else {
            return Ok(self.start_with.unwrap_or(1));
        };
        last.checked_add(self.increment())
            .ok_or_else(|| MetadataError::SequenceOverflow {
                sequence: self
                    .name
                    .clone()
                    .or_else(|| self.column.as_ref().map(|(_, column)| column.clone()))
                    .unwrap_or_default(),
                last_value: last,
                increment: self.increment(),
            })
    }
}

impl Table {
    /// 新しいテーブルを作成
    pub fn new(name: impl Into<String>, schema: SchemaId) -> Self {
        Self {
            name: name.into(),
            schema,
            comment: None,
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            unique_keys: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// カラムを追加
    ///
    /// 序数位置は宣言順に連続して割り当てられます。
    pub fn add_column(&mut self, mut column: Column) -> Result<&mut Column, MetadataError> {
        if self.get_column(&column.name).is_some() {
            return Err(MetadataError::DuplicateName {
                kind: "column",
                name: column.name,
                scope: self.name.clone(),
            });
        }
        column.position = self.columns.len() as u32 + 1;
        self.columns.push(column);
        let last = self.columns.len() - 1;
        Ok(&mut self.columns[last])
    }

    /// 指定されたカラムを取得
    pub fn get_column(&self, column_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == column_name)
    }

    /// 指定されたカラムを可変参照で取得
    pub fn get_column_mut(&mut self, column_name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == column_name)
    }

    /// プライマリキーを設定
    pub fn set_primary_key(&mut self, primary_key: PrimaryKey) -> Result<(), MetadataError> {
        if self.primary_key.is_some() {
            return Err(MetadataError::DuplicatePrimaryKey {
                table: self.name.clone(),
            });
        }
        self.ensure_columns(&primary_key.columns)?;
        self.primary_key = Some(primary_key);
        Ok(())
    }

    /// 外部キーを追加
    ///
    /// 参照先カラムの存在確認は参照先テーブルが必要なため [`Database::validate`] で行います。
    pub fn add_foreign_key(&mut self, foreign_key: ForeignKey) -> Result<(), MetadataError> {
        self.ensure_columns(&foreign_key.columns)?;
        if foreign_key.columns.len() != foreign_key.referenced_columns.len() {
            return Err(MetadataError::ForeignKeyMismatch {
                name: foreign_key.name.clone().unwrap_or_default(),
                columns: foreign_key.columns.len(),
                referenced: foreign_key.referenced_columns.len(),
                location: ErrorLocation::with_table(self.name.clone()),
            });
        }
        self.foreign_keys.push(foreign_key);
        Ok(())
    }

    /// インデックスを追加
    pub fn add_index(&mut self, index: Index) -> Result<(), MetadataError> {
        if self.indexes.iter().any(|i| i.name == index.name) {
            return Err(MetadataError::DuplicateName {
                kind: "index",
                name: index.name,
                scope: self.name.clone(),
            });
        }
        let names: Vec<String> = index.columns.iter().map(|c| c.name.clone()).collect();
        self.ensure_columns(&names)?;
        self.indexes.push(index);
        Ok(())
    }

    /// ユニーク制約を追加
    pub fn add_unique_key(&mut self, unique_key: UniqueKey) -> Result<(), MetadataError> {
        self.ensure_columns(&unique_key.columns)?;
        self.unique_keys.push(unique_key);
        Ok(())
    }

    /// チェック制約を追加
    pub fn add_check(&mut self, check: CheckConstraint) {
        self.checks.push(check);
    }

    fn ensure_columns(&self, columns: &[String]) -> Result<(), MetadataError> {
        for column in columns {
            if self.get_column(column).is_none() {
                return Err(MetadataError::UnknownColumn {
                    column: column.clone(),
                    location: ErrorLocation::with_table(self.name.clone()),
                });
            }
        }
        Ok(())
    }
}

impl Database {
    /// 空のデータベースを作成
    pub fn new(dialect: Option<DialectKind>) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// カタログを追加
    pub fn add_catalog(&mut self, name: Option<&str>) -> Result<CatalogId, MetadataError> {
        if self
            .catalogs
            .iter()
            .any(|c| c.name.as_deref() == name)
        {
            return Err(MetadataError::DuplicateName {
                kind: "catalog",
                name: name.unwrap_or_default().to_string(),
                scope: "database".to_string(),
            });
        }
        self.catalogs.push(Catalog {
            name: name.map(str::to_string),
            schemas: Vec::new(),
        });
        Ok(CatalogId(self.catalogs.len() - 1))
    }

    /// スキーマを追加
    pub fn add_schema(
        &mut self,
        catalog: CatalogId,
        name: Option<&str>,
    ) -> Result<SchemaId, MetadataError> {
        let catalog_name = self.get_catalog(catalog)?.name.clone();
        let duplicate = self
            .get_catalog(catalog)?
            .schemas
            .iter()
            .filter_map(|id| self.schemas.get(id.0))
            .any(|s| s.name.as_deref() == name);
        if duplicate {
            return Err(MetadataError::DuplicateName {
                kind: "schema",
                name: name.unwrap_or_default().to_string(),
                scope: catalog_name.unwrap_or_default(),
            });
        }
        let id = SchemaId(self.schemas.len());
        self.schemas.push(Schema {
            name: name.map(str::to_string),
            catalog,
            tables: Vec::new(),
            sequences: Vec::new(),
        });
        self.catalogs[catalog.0].schemas.push(id);
        Ok(id)
    }

    /// テーブルを追加
    pub fn add_table(
        &mut self,
        schema: SchemaId,
        name: impl Into<String>,
    ) -> Result<TableId, MetadataError> {
        let name = name.into();
        let duplicate = self
            .get_schema(schema)?
            .tables
            .iter()
            .filter_map(|id| self.tables.get(id.0))
            .any(|t| t.name == name);
        if duplicate {
            return Err(MetadataError::DuplicateName {
                kind: "table",
                name,
                scope: self.schema_display_name(schema),
            });
        }
        let id = TableId(self.tables.len());
        self.tables.push(Table::new(name, schema));
        self.schemas[schema.0].tables.push(id);
        Ok(id)
    }

    /// シーケンスを追加
    pub fn add_sequence(&mut self, sequence: Sequence) -> Result<SequenceId, MetadataError> {
        let schema = sequence.schema;
        self.get_schema(schema)?;
        if let Some(name) = sequence.name.as_deref() {
            let duplicate = self.schemas[schema.0]
                .sequences
                .iter()
                .filter_map(|id| self.sequences.get(id.0))
                .any(|s| s.name.as_deref() == Some(name));
            if duplicate {
                return Err(MetadataError::DuplicateName {
                    kind: "sequence",
                    name: name.to_string(),
                    scope: self.schema_display_name(schema),
                });
            }
        }
        let id = SequenceId(self.sequences.len());
        self.sequences.push(sequence);
        self.schemas[schema.0].sequences.push(id);
        Ok(id)
    }

    /// 推定された自動増分シーケンスをカラムに紐づける
    pub fn bind_auto_increment(
        &mut self,
        table: TableId,
        column: &str,
        mut sequence: Sequence,
    ) -> Result<SequenceId, MetadataError> {
        let table_name = self.get_table(table)?.name.clone();
        if self.get_table(table)?.get_column(column).is_none() {
            return Err(MetadataError::UnknownColumn {
                column: column.to_string(),
                location: ErrorLocation::with_table(table_name),
            });
        }
        sequence.auto_increment = true;
        sequence.column = Some((table, column.to_string()));
        let id = self.add_sequence(sequence)?;
        if let Some(c) = self.tables[table.0].get_column_mut(column) {
            c.sequence = Some(id);
        }
        Ok(id)
    }

    /// カタログを取得
    pub fn get_catalog(&self, id: CatalogId) -> Result<&Catalog, MetadataError> {
        self.catalogs.get(id.0).ok_or(MetadataError::UnknownId {
            kind: "catalog",
            id: id.0,
        })
    }

    /// スキーマを取得
    pub fn get_schema(&self, id: SchemaId) -> Result<&Schema, MetadataError> {
        self.schemas.get(id.0).ok_or(MetadataError::UnknownId {
            kind: "schema",
            id: id.0,
        })
    }

    /// テーブルを取得
    pub fn get_table(&self, id: TableId) -> Result<&Table, MetadataError> {
        self.tables.get(id.0).ok_or(MetadataError::UnknownId {
            kind: "table",
            id: id.0,
        })
    }

    /// テーブルを可変参照で取得
    pub fn get_table_mut(&mut self, id: TableId) -> Result<&mut Table, MetadataError> {
        self.tables.get_mut(id.0).ok_or(MetadataError::UnknownId {
            kind: "table",
            id: id.0,
        })
    }

    /// シーケンスを取得
    pub fn get_sequence(&self, id: SequenceId) -> Result<&Sequence, MetadataError> {
        self.sequences.get(id.0).ok_or(MetadataError::UnknownId {
            kind: "sequence",
            id: id.0,
        })
    }

    /// 全カタログをID付きで取得
    pub fn catalogs(&self) -> impl Iterator<Item = (CatalogId, &Catalog)> {
        self.catalogs
            .iter()
            .enumerate()
            .map(|(i, c)| (CatalogId(i), c))
    }

    /// 全テーブルをID付きで取得
    pub fn tables(&self) -> impl Iterator<Item = (TableId, &Table)> {
        self.tables.iter().enumerate().map(|(i, t)| (TableId(i), t))
    }

    /// スキーマ名とテーブル名でテーブルを検索
    pub fn find_table(&self, schema: Option<&str>, name: &str) -> Option<TableId> {
        self.tables()
            .find(|(_, t)| {
                t.name == name
                    && self
                        .schemas
                        .get(t.schema.0)
                        .is_some_and(|s| schema.is_none() || s.name.as_deref() == schema)
            })
            .map(|(id, _)| id)
    }

    /// テーブル数を取得
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    fn schema_display_name(&self, id: SchemaId) -> String {
        self.schemas
            .get(id.0)
            .and_then(|s| s.name.clone())
            .unwrap_or_default()
    }

    /// グラフの不変条件を検証
    ///
    /// 名前の一意性、カラム位置の連続性、制約が参照するカラムの存在、
    /// 外部キーの参照先カラムの個数一致を確認し、最初の違反を返します。
    pub fn validate(&self) -> Result<(), MetadataError> {
        let mut catalog_names = HashSet::new();
        for catalog in &self.catalogs {
            if !catalog_names.insert(catalog.name.as_deref()) {
                return Err(MetadataError::DuplicateName {
                    kind: "catalog",
                    name: catalog.name.clone().unwrap_or_default(),
                    scope: "database".to_string(),
                });
            }
            let mut schema_names = HashSet::new();
            for schema_id in &catalog.schemas {
                let schema = self.get_schema(*schema_id)?;
                if !schema_names.insert(schema.name.as_deref()) {
                    return Err(MetadataError::DuplicateName {
                        kind: "schema",
                        name: schema.name.clone().unwrap_or_default(),
                        scope: catalog.name.clone().unwrap_or_default(),
                    });
                }
            }
        }

        for schema in &self.schemas {
            self.get_catalog(schema.catalog)?;
            let mut table_names = HashSet::new();
            for table_id in &schema.tables {
                let table = self.get_table(*table_id)?;
                if !table_names.insert(table.name.as_str()) {
                    return Err(MetadataError::DuplicateName {
                        kind: "table",
                        name: table.name.clone(),
                        scope: schema.name.clone().unwrap_or_default(),
                    });
                }
            }
        }

        for table in &self.tables {
            self.validate_table(table)?;
        }

        for sequence in &self.sequences {
            self.get_schema(sequence.schema)?;
            if let Some((table_id, column)) = &sequence.column {
                let table = self.get_table(*table_id)?;
                if table.get_column(column).is_none() {
                    return Err(MetadataError::UnknownColumn {
                        column: column.clone(),
                        location: ErrorLocation::with_table(table.name.clone()),
                    });
                }
            }
        }

        Ok(())
    }

    fn validate_table(&self, table: &Table) -> Result<(), MetadataError> {
        self.get_schema(table.schema)?;

        let mut column_names = HashSet::new();
        for (i, column) in table.columns.iter().enumerate() {
            let location = ErrorLocation::with_column(table.name.clone(), column.name.clone());
            if !column_names.insert(column.name.as_str()) {
                return Err(MetadataError::DuplicateName {
                    kind: "column",
                    name: column.name.clone(),
                    scope: table.name.clone(),
                });
            }
            let expected = i as u32 + 1;
            if column.position != expected {
                return Err(MetadataError::ColumnPosition {
                    column: column.name.clone(),
                    expected,
                    actual: column.position,
                    location,
                });
            }
            if column.type_code == type_code::NULL && column.type_name.is_empty() {
                return Err(MetadataError::MissingTypeCode { location });
            }
            if let Some(sequence) = column.sequence {
                self.get_sequence(sequence)?;
            }
        }

        if let Some(primary_key) = &table.primary_key {
            table.ensure_columns(&primary_key.columns)?;
        }
        for unique_key in &table.unique_keys {
            table.ensure_columns(&unique_key.columns)?;
        }
        for index in &table.indexes {
            let names: Vec<String> = index.columns.iter().map(|c| c.name.clone()).collect();
            table.ensure_columns(&names)?;
        }
        for foreign_key in &table.foreign_keys {
            table.ensure_columns(&foreign_key.columns)?;
            let referenced = self.get_table(foreign_key.referenced_table)?;
            if foreign_key.columns.len() != foreign_key.referenced_columns.len() {
                return Err(MetadataError::ForeignKeyMismatch {
                    name: foreign_key.name.clone().unwrap_or_default(),
                    columns: foreign_key.columns.len(),
                    referenced: foreign_key.referenced_columns.len(),
                    location: ErrorLocation::with_table(table.name.clone()),
                });
            }
            referenced.ensure_columns(&foreign_key.referenced_columns)?;
        }

        Ok(())
    }
}
