// エラー型定義
//
// ライブラリ全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、メタデータ・翻訳・生成・データベース・出力の各エラーを定義します。

use thiserror::Error;

/// エラー発生位置
///
/// メタデータグラフ内のエラー発生位置（テーブル・カラム）を表現します。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorLocation {
    /// テーブル名
    pub table: Option<String>,
    /// カラム名
    pub column: Option<String>,
}

impl ErrorLocation {
    /// 新しいエラー位置を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// テーブル名を指定してエラー位置を作成
    pub fn with_table(table: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: None,
        }
    }

    /// テーブル名とカラム名を指定してエラー位置を作成
    pub fn with_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: Some(column.into()),
        }
    }

    /// 位置情報をフォーマット
    pub fn format(&self) -> String {
        let mut parts = Vec::new();

        if let Some(table) = &self.table {
            parts.push(format!("table: {}", table));
        }
        if let Some(column) = &self.column {
            parts.push(format!("column: {}", column));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!(" ({})", parts.join(", "))
        }
    }
}

/// メタデータ不変条件違反
///
/// インスペクターが構築したメタデータグラフが不正な場合に発生します。
/// ローカルには回復不能で、エンティティを特定できる情報とともに呼び出し元へ伝播します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// Duplicate name within a parent scope
    #[error("Duplicate {kind} name '{name}' in {scope}")]
    DuplicateName {
        /// エンティティの種類（table, column 等）
        kind: &'static str,
        /// 重複した名前
        name: String,
        /// 親スコープの名前
        scope: String,
    },

    /// Reference to a column that does not exist
    #[error("Unknown column '{column}' referenced{}", .location.format())]
    UnknownColumn {
        /// カラム名
        column: String,
        /// 参照元の位置
        location: ErrorLocation,
    },

    /// Reference to an entity id that does not exist in the graph
    #[error("Unknown {kind} id {id}")]
    UnknownId {
        /// エンティティの種類
        kind: &'static str,
        /// 不正なID
        id: usize,
    },

    /// Foreign key column list mismatch
    #[error("Foreign key '{name}' has {columns} column(s) but references {referenced} column(s){}", .location.format())]
    ForeignKeyMismatch {
        /// 外部キー名
        name: String,
        /// 参照元カラム数
        columns: usize,
        /// 参照先カラム数
        referenced: usize,
        /// 外部キーの位置
        location: ErrorLocation,
    },

    /// More than one primary key on a table
    #[error("Table '{table}' already has a primary key")]
    DuplicatePrimaryKey {
        /// テーブル名
        table: String,
    },

    /// Column ordinal positions are not contiguous
    #[error("Column '{column}' has position {actual}, expected {expected}{}", .location.format())]
    ColumnPosition {
        /// カラム名
        column: String,
        /// 期待される位置
        expected: u32,
        /// 実際の位置
        actual: u32,
        /// カラムの位置
        location: ErrorLocation,
    },

    /// Column without a resolved type code
    #[error("Column has no type code{}", .location.format())]
    MissingTypeCode {
        /// カラムの位置
        location: ErrorLocation,
    },

    /// Next sequence value does not fit in i64
    #[error("Sequence '{sequence}' overflows after {last_value} with increment {increment}")]
    SequenceOverflow {
        /// シーケンス名（自動増分の場合はカラム名）
        sequence: String,
        /// 最後に払い出された値
        last_value: i64,
        /// 増分
        increment: i64,
    },
}

impl MetadataError {
    /// 名前重複エラーかどうか
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, MetadataError::DuplicateName { .. })
    }

    /// 未知カラム参照エラーかどうか
    pub fn is_unknown_column(&self) -> bool {
        matches!(self, MetadataError::UnknownColumn { .. })
    }

    /// 外部キー不整合エラーかどうか
    pub fn is_foreign_key_mismatch(&self) -> bool {
        matches!(self, MetadataError::ForeignKeyMismatch { .. })
    }

    /// シーケンス値のオーバーフローかどうか
    pub fn is_sequence_overflow(&self) -> bool {
        matches!(self, MetadataError::SequenceOverflow { .. })
    }
}

/// 翻訳エラー
///
/// トランスレーターパイプラインがスクリプトを移行先方言に変換できない場合に発生します。
/// 翻訳は決定的なので再試行はしません。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// Zero date encountered with EXCEPTION behavior
    #[error("Value '{value}' of type {type_name} represents a non-existent date and zero date behavior is EXCEPTION")]
    ZeroDateTime {
        /// 元の値
        value: String,
        /// 型名
        type_name: String,
    },

    /// No translator recognizes an expression that is not valid for the target
    #[error("Expression '{value}' of {source_dialect} cannot be translated to {target_dialect}")]
    Untranslatable {
        /// 元の値
        value: String,
        /// 移行元方言
        source_dialect: String,
        /// 移行先方言
        target_dialect: String,
    },
}

impl TranslationError {
    /// ゼロ日付エラーかどうか
    pub fn is_zero_date_time(&self) -> bool {
        matches!(self, TranslationError::ZeroDateTime { .. })
    }

    /// 翻訳不能エラーかどうか
    pub fn is_untranslatable(&self) -> bool {
        matches!(self, TranslationError::Untranslatable { .. })
    }
}

/// スクリプト生成エラー
///
/// スクリプトジェネレーターおよびマネージャーが生成に失敗した場合に発生します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// No type template and no raw fallback permitted
    #[error("Unresolvable type {type_name} (code {type_code}) for {dialect}{}", .location.format())]
    UnresolvableType {
        /// 型コード
        type_code: i32,
        /// ソースの型名
        type_name: String,
        /// 移行先方言
        dialect: String,
        /// カラムの位置
        location: ErrorLocation,
    },

    /// Translation failed for a value owned by the object being generated
    #[error("Translation failed{}: {source}", .location.format())]
    Translation {
        /// 翻訳エラー
        #[source]
        source: TranslationError,
        /// 対象の位置
        location: ErrorLocation,
    },

    /// Capability not supported by the target dialect
    #[error("{dialect} does not support {operation}")]
    Unsupported {
        /// 移行先方言
        dialect: String,
        /// 要求された操作
        operation: String,
    },

    /// Malformed metadata graph
    #[error("Invalid metadata: {0}")]
    Metadata(#[from] MetadataError),
}

impl GeneratorError {
    /// 非サポートエラーを作成
    pub fn unsupported(dialect: impl Into<String>, operation: impl Into<String>) -> Self {
        GeneratorError::Unsupported {
            dialect: dialect.into(),
            operation: operation.into(),
        }
    }

    /// 型解決エラーかどうか
    pub fn is_unresolvable_type(&self) -> bool {
        matches!(self, GeneratorError::UnresolvableType { .. })
    }

    /// 翻訳エラーかどうか
    pub fn is_translation(&self) -> bool {
        matches!(self, GeneratorError::Translation { .. })
    }

    /// 非サポートエラーかどうか
    pub fn is_unsupported(&self) -> bool {
        matches!(self, GeneratorError::Unsupported { .. })
    }

    /// メタデータ不正エラーかどうか
    pub fn is_metadata(&self) -> bool {
        matches!(self, GeneratorError::Metadata(_))
    }

    /// エラー発生位置を取得
    pub fn location(&self) -> Option<&ErrorLocation> {
        match self {
            GeneratorError::UnresolvableType { location, .. }
            | GeneratorError::Translation { location, .. } => Some(location),
            _ => None,
        }
    }
}

/// データベースエラー
///
/// セッション操作（タイムゾーン設定、スクリプト実行）時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connection error
    #[error("Database connection error: {message} (cause: {cause})")]
    Connection {
        /// エラーメッセージ
        message: String,
        /// エラー原因
        cause: String,
    },

    /// Query execution error
    #[error("Query execution error: {message}")]
    Query {
        /// エラーメッセージ
        message: String,
        /// 失敗したSQL
        sql: Option<String>,
    },

    /// Session operation not supported by the dialect
    #[error("Session operation not supported: {0}")]
    Unsupported(String),
}

impl DatabaseError {
    /// 接続エラーかどうか
    pub fn is_connection(&self) -> bool {
        matches!(self, DatabaseError::Connection { .. })
    }

    /// クエリエラーかどうか
    pub fn is_query(&self) -> bool {
        matches!(self, DatabaseError::Query { .. })
    }

    /// 失敗したSQLを取得
    pub fn sql(&self) -> Option<&str> {
        match self {
            DatabaseError::Query { sql, .. } => sql.as_deref(),
            _ => None,
        }
    }
}

/// スクリプト出力エラー
///
/// エクスポーターが生成済みのスクリプトを出力先に書き出せない場合に発生します。
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failure writing to a file or stream
    #[error("Failed to write scripts: {0}")]
    Io(#[from] std::io::Error),

    /// Failure executing a statement on the target database
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_location_format() {
        let location = ErrorLocation::with_column("users", "email");

        let formatted = location.format();
        assert_eq!(formatted, " (table: users, column: email)");
        assert_eq!(ErrorLocation::new().format(), "");
    }

    #[test]
    fn test_metadata_error_variants() {
        let duplicate = MetadataError::DuplicateName {
            kind: "column",
            name: "id".to_string(),
            scope: "users".to_string(),
        };
        assert!(duplicate.is_duplicate_name());
        assert_eq!(
            duplicate.to_string(),
            "Duplicate column name 'id' in users"
        );

        let unknown = MetadataError::UnknownColumn {
            column: "missing".to_string(),
            location: ErrorLocation::with_table("orders"),
        };
        assert!(unknown.is_unknown_column());
        assert!(unknown.to_string().contains("table: orders"));
    }

    #[test]
    fn test_generator_error_variants() {
        let unresolvable = GeneratorError::UnresolvableType {
            type_code: 1111,
            type_name: "geometry".to_string(),
            dialect: "oracle".to_string(),
            location: ErrorLocation::with_column("shapes", "area"),
        };
        assert!(unresolvable.is_unresolvable_type());
        assert_eq!(
            unresolvable.location().and_then(|l| l.column.as_deref()),
            Some("area")
        );

        let unsupported = GeneratorError::unsupported("mysql", "CHECK constraints");
        assert!(unsupported.is_unsupported());
        assert_eq!(unsupported.to_string(), "mysql does not support CHECK constraints");
        assert!(unsupported.location().is_none());

        let metadata: GeneratorError = MetadataError::DuplicatePrimaryKey {
            table: "users".to_string(),
        }
        .into();
        assert!(metadata.is_metadata());
    }

    #[test]
    fn test_translation_error_wrapped() {
        let error = GeneratorError::Translation {
            source: TranslationError::ZeroDateTime {
                value: "0000-00-00".to_string(),
                type_name: "DATE".to_string(),
            },
            location: ErrorLocation::with_column("events", "happened_on"),
        };
        assert!(error.is_translation());
        assert!(error.to_string().contains("0000-00-00"));
        assert!(error.to_string().contains("column: happened_on"));
    }

    #[test]
    fn test_database_error_variants() {
        let conn_error = DatabaseError::Connection {
            message: "Connection failed".to_string(),
            cause: "Timeout".to_string(),
        };
        assert!(conn_error.is_connection());

        let query_error = DatabaseError::Query {
            message: "Query failed".to_string(),
            sql: Some("SET TIME ZONE '+01:00'".to_string()),
        };
        assert!(query_error.is_query());
        assert_eq!(query_error.sql(), Some("SET TIME ZONE '+01:00'"));
    }
}
