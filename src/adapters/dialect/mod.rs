// データベース方言
//
// 1つのデータベース製品のSQL文法・機能・型マッピングをまとめた能力オブジェクト。
// Dialectトレイトの既定実装はANSI SQL（Generic）の振る舞いで、
// 各方言は必要な箇所だけをオーバーライドします。

mod generic;
pub mod limit;
mod mysql;
mod oracle;
pub mod row_count;
mod sqlserver;
mod target;

pub use generic::GenericDialect;
pub use limit::{
    FetchFirstLimitHandler, LimitHandler, LimitOffsetHandler, LimitedQuery, RowLimit,
    RownumLimitHandler, TopLimitHandler,
};
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use row_count::{
    ApproxRowCountHandler, ExactRowCountHandler, RowCountHandler, RowCountKind, RowCountTarget,
};
pub use sqlserver::SqlServerDialect;
pub use target::TargetDialect;

use crate::adapters::translator::TranslatorChain;
use crate::adapters::type_mapping::TypeRegistry;
use crate::core::config::{DialectKind, TimeZoneSetting};
use crate::core::error::GeneratorError;
use crate::core::metadata::{DefaultValue, Sequence};
use crate::core::type_code::{self, TypeDesc, TypeSpecifiers};
use std::sync::Arc;

/// 識別子のクォート文字
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierQuote {
    /// 開きクォート
    pub open: &'static str,
    /// 閉じクォート
    pub close: &'static str,
}

impl IdentifierQuote {
    /// ダブルクォート（ANSI）
    pub const DOUBLE: IdentifierQuote = IdentifierQuote {
        open: "\"",
        close: "\"",
    };
    /// バッククォート（MySQL）
    pub const BACKTICK: IdentifierQuote = IdentifierQuote {
        open: "`",
        close: "`",
    };
    /// 角括弧（SQL Server）
    pub const BRACKET: IdentifierQuote = IdentifierQuote {
        open: "[",
        close: "]",
    };

    /// 識別子をクォート
    ///
    /// 識別子内の閉じクォートは二重にエスケープします。
    ///
    /// # Examples
    /// ```
    /// use dbporter::adapters::dialect::IdentifierQuote;
    /// assert_eq!(IdentifierQuote::BACKTICK.quote("usertype"), "`usertype`");
    /// assert_eq!(IdentifierQuote::DOUBLE.quote(r#"a"b"#), r#""a""b""#);
    /// assert_eq!(IdentifierQuote::BRACKET.quote("a]b"), "[a]]b]");
    /// ```
    pub fn quote(&self, identifier: &str) -> String {
        let escaped = identifier.replace(self.close, &self.close.repeat(2));
        format!("{}{}{}", self.open, escaped, self.close)
    }
}

/// 文字列リテラルをシングルクォートで囲む
///
/// # Examples
/// ```
/// use dbporter::adapters::dialect::quote_literal;
/// assert_eq!(quote_literal("it's"), "'it''s'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// テーブル・カラムコメントの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// CREATE TABLE内に `COMMENT` 句として埋め込む
    Inline,
    /// 別文の `COMMENT ON` として出力
    CommentOn,
    /// コメント非対応
    Unsupported,
}

/// データベース方言
///
/// 識別子のクォート、機能の有無、方言固有の文の断片、
/// 行数制限・行数取得ハンドラーの生成、セッション操作を提供します。
pub trait Dialect: Send + Sync + std::fmt::Debug {
    /// 方言の種類
    fn kind(&self) -> DialectKind;

    /// 型名レジストリ
    fn type_registry(&self) -> &TypeRegistry;

    /// 移行先としてのトランスレーターチェーン
    fn translators(&self) -> &TranslatorChain;

    /// 識別子のクォート文字
    fn identifier_quote(&self) -> IdentifierQuote {
        IdentifierQuote::DOUBLE
    }

    fn open_quote(&self) -> &'static str {
        self.identifier_quote().open
    }

    fn close_quote(&self) -> &'static str {
        self.identifier_quote().close
    }

    /// 識別子をクォート
    fn quote(&self, identifier: &str) -> String {
        self.identifier_quote().quote(identifier)
    }

    // ---- 機能の有無 ----

    fn supports_catalogs(&self) -> bool {
        false
    }

    fn supports_schemas(&self) -> bool {
        true
    }

    /// CHECK制約に対応しているか
    fn supports_column_check(&self) -> bool {
        true
    }

    /// `DROP TABLE IF EXISTS` に対応しているか
    fn supports_if_exists_before_drop_table(&self) -> bool {
        false
    }

    fn supports_limit(&self) -> bool {
        true
    }

    /// 行数制限に `?` マーカーを使用できるか
    fn supports_limit_parameters(&self) -> bool {
        false
    }

    fn supports_session_time_zone(&self) -> bool {
        false
    }

    fn supports_row_count(&self, kind: RowCountKind) -> bool {
        kind == RowCountKind::Exact
    }

    fn supports_sequences(&self) -> bool {
        true
    }

    /// CREATE TABLE内でインデックスを定義できるか
    fn supports_index_in_create_table(&self) -> bool {
        false
    }

    /// 同一テーブルの複数インデックスを1文で作成できるか
    fn supports_create_multiple_indexes(&self) -> bool {
        false
    }

    /// 外部キーの `ON UPDATE` に対応しているか
    fn supports_on_update_action(&self) -> bool {
        true
    }

    /// `N'...'` 形式の各国語文字リテラルを使用できるか
    fn supports_national_literals(&self) -> bool {
        false
    }

    // ---- 文の断片 ----

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::CommentOn
    }

    /// CREATE TABLE末尾のコメント句
    fn table_comment(&self, comment: &str) -> String {
        format!(" COMMENT {}", quote_literal(comment))
    }

    /// カラム定義末尾のコメント句
    fn column_comment(&self, comment: &str) -> String {
        format!(" COMMENT {}", quote_literal(comment))
    }

    /// 外部キー削除のキーワード
    fn drop_foreign_key(&self) -> &'static str {
        "DROP CONSTRAINT"
    }

    /// ユニーク制約削除のキーワード
    fn drop_unique_key(&self) -> &'static str {
        "DROP CONSTRAINT"
    }

    /// 主キー削除句（ALTER TABLE以降）
    ///
    /// 制約名が必須の方言では、名前がない場合に非サポートエラーを返します。
    fn drop_primary_key(&self, name: Option<&str>) -> Result<String, GeneratorError> {
        match name {
            Some(name) => Ok(format!("DROP CONSTRAINT {}", self.quote(name))),
            None => Err(GeneratorError::unsupported(
                self.kind().to_string(),
                "dropping an unnamed primary key",
            )),
        }
    }

    /// インデックス削除文（引数はクォート済み）
    fn drop_index(&self, index: &str, _table: &str) -> String {
        format!("DROP INDEX {}", index)
    }

    /// テーブル削除文（引数はクォート済み）
    fn drop_table(&self, table: &str) -> String {
        if self.supports_if_exists_before_drop_table() {
            format!("DROP TABLE IF EXISTS {}", table)
        } else {
            format!("DROP TABLE {}", table)
        }
    }

    /// スキーマ切り替え文
    fn use_schema(&self, schema: &str) -> String {
        format!("SET SCHEMA {}", self.quote(schema))
    }

    /// スキーマ削除文
    fn drop_schema(&self, schema: &str) -> String {
        format!("DROP SCHEMA IF EXISTS {} CASCADE", self.quote(schema))
    }

    /// CHECK制約の述語を1組の括弧で囲む
    fn check_clause(&self, clause: &str) -> String {
        format!("({})", clause.trim())
    }

    /// 自動増分カラムのIDENTITY句
    fn identity_clause(&self, sequence: &Sequence) -> Result<String, GeneratorError> {
        Ok(format!(
            "GENERATED BY DEFAULT AS IDENTITY (START WITH {})",
            sequence.next_value()?
        ))
    }

    /// 移行元としてデフォルト値を正規化
    fn process_default_value(&self, value: &DefaultValue) -> DefaultValue {
        value.process(|script| script.trim().to_string())
    }

    /// 真偽値リテラル
    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// 現在日時の関数
    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// 型ごとの表現可能な最小の日付・時刻
    fn minimum_date_time(&self, code: i32) -> Option<&'static str> {
        match code {
            type_code::DATE => Some("0001-01-01"),
            type_code::TIME | type_code::TIME_WITH_TIMEZONE => Some("00:00:00"),
            type_code::TIMESTAMP | type_code::TIMESTAMP_WITH_TIMEZONE => {
                Some("0001-01-01 00:00:00")
            }
            _ => None,
        }
    }

    // ---- セッション操作 ----

    /// セッションタイムゾーンを設定する文
    fn session_time_zone_statement(
        &self,
        _time_zone: &TimeZoneSetting,
    ) -> Result<String, GeneratorError> {
        Err(GeneratorError::unsupported(
            self.kind().to_string(),
            "session time zone",
        ))
    }

    // ---- ハンドラー ----

    /// 行数制限ハンドラーを生成
    fn create_limit_handler(&self) -> Result<Box<dyn LimitHandler>, GeneratorError> {
        if !self.supports_limit() {
            return Err(GeneratorError::unsupported(
                self.kind().to_string(),
                "row limit",
            ));
        }
        Ok(Box::new(FetchFirstLimitHandler))
    }

    /// 行数取得ハンドラーを生成
    fn create_row_count_handler(
        &self,
        kind: RowCountKind,
    ) -> Result<Box<dyn RowCountHandler>, GeneratorError> {
        if !self.supports_row_count(kind) {
            let operation = match kind {
                RowCountKind::Exact => "EXACT row count",
                RowCountKind::Approx => "APPROX row count",
            };
            return Err(GeneratorError::unsupported(
                self.kind().to_string(),
                operation,
            ));
        }
        match kind {
            RowCountKind::Exact => Ok(Box::new(ExactRowCountHandler::new(
                self.identifier_quote(),
            ))),
            RowCountKind::Approx => Ok(Box::new(ApproxRowCountHandler::new(self.kind()))),
        }
    }
}

/// 行数制限をパラメータ化して適用
///
/// 方言が `?` マーカーに対応していない場合は非サポートエラーを返します。
pub fn apply_limit_parameters(
    dialect: &dyn Dialect,
    query: &str,
    limit: &RowLimit,
) -> Result<LimitedQuery, GeneratorError> {
    if !dialect.supports_limit_parameters() {
        return Err(GeneratorError::unsupported(
            dialect.kind().to_string(),
            "parameterized row limit",
        ));
    }
    Ok(dialect.create_limit_handler()?.apply_parameterized(query, limit))
}

/// 方言を生成
pub fn create_dialect(kind: DialectKind) -> Arc<dyn Dialect> {
    match kind {
        DialectKind::MySQL => Arc::new(MySqlDialect::new()),
        DialectKind::Oracle => Arc::new(OracleDialect::new()),
        DialectKind::SQLServer => Arc::new(SqlServerDialect::new()),
        DialectKind::Generic => Arc::new(GenericDialect::new()),
        DialectKind::Target => Arc::new(TargetDialect::new()),
    }
}

/// 移行元の型を移行先の型名に解決
///
/// 型エイリアスは移行元、移行先の順に解決し、その後移行先のレジストリで型名を選択します。
pub fn resolve_type_name(
    source: &dyn Dialect,
    target: &dyn Dialect,
    desc: &TypeDesc,
    specifiers: &TypeSpecifiers,
) -> Option<String> {
    let code = source
        .type_registry()
        .resolve_alias(desc)
        .or_else(|| target.type_registry().resolve_alias(desc))
        .unwrap_or(desc.code);
    target.type_registry().resolve_code(code, specifiers)
}

/// カラム名リストをクォートしてカンマ区切りで結合
///
/// 宣言順を保持します。
pub fn quote_columns<S: AsRef<str>>(dialect: &dyn Dialect, columns: &[S]) -> String {
    columns
        .iter()
        .map(|c| dialect.quote(c.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dialect_kinds() {
        for kind in [
            DialectKind::MySQL,
            DialectKind::Oracle,
            DialectKind::SQLServer,
            DialectKind::Generic,
            DialectKind::Target,
        ] {
            assert_eq!(create_dialect(kind).kind(), kind);
        }
    }

    #[test]
    fn test_quote_columns_preserves_order() {
        let dialect = create_dialect(DialectKind::Generic);
        assert_eq!(
            quote_columns(dialect.as_ref(), &["B", "A"]),
            r#""B", "A""#
        );
    }

    #[test]
    fn test_row_count_handler_unsupported() {
        let dialect = create_dialect(DialectKind::Generic);
        assert!(dialect
            .create_row_count_handler(RowCountKind::Approx)
            .err()
            .is_some_and(|e| e.is_unsupported()));
        assert!(dialect.create_row_count_handler(RowCountKind::Exact).is_ok());
    }
}
