// 行数取得ハンドラー
//
// テーブルの行数を取得するクエリを生成します。
// EXACTは COUNT による正確な件数、APPROXはカタログ統計からの推定値です。

use super::{quote_literal, IdentifierQuote};
use crate::core::config::DialectKind;
use crate::core::error::GeneratorError;
use serde::{Deserialize, Serialize};

/// 行数取得の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowCountKind {
    /// COUNTによる正確な件数
    Exact,
    /// カタログ統計による推定件数
    Approx,
}

/// 行数取得の対象
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCountTarget {
    /// カタログ名
    pub catalog: Option<String>,
    /// スキーマ名
    pub schema: Option<String>,
    /// テーブル名
    pub table: String,
    /// 集計対象カラム（Noneは `*`）
    pub column: Option<String>,
    /// 絞り込み条件（生のSQL述語）
    pub filter: Option<String>,
}

impl RowCountTarget {
    /// テーブル名のみ指定して作成
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// スキーマを指定
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// カタログを指定
    pub fn in_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// 集計対象カラムを指定
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// 絞り込み条件を指定
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// 行数取得ハンドラー
pub trait RowCountHandler: Send + Sync {
    /// ハンドラーの種類
    fn kind(&self) -> RowCountKind;

    /// 行数取得クエリを生成
    fn count_query(&self, target: &RowCountTarget) -> Result<String, GeneratorError>;
}

/// `SELECT COUNT(*)` による正確な行数
#[derive(Debug, Clone, Copy)]
pub struct ExactRowCountHandler {
    quote: IdentifierQuote,
}

impl ExactRowCountHandler {
    pub fn new(quote: IdentifierQuote) -> Self {
        Self { quote }
    }
}

impl RowCountHandler for ExactRowCountHandler {
    fn kind(&self) -> RowCountKind {
        RowCountKind::Exact
    }

    fn count_query(&self, target: &RowCountTarget) -> Result<String, GeneratorError> {
        let table = [
            target.catalog.as_deref(),
            target.schema.as_deref(),
            Some(target.table.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(|part| self.quote.quote(part))
        .collect::<Vec<_>>()
        .join(".");
        let column = target
            .column
            .as_deref()
            .map(|c| self.quote.quote(c))
            .unwrap_or_else(|| "*".to_string());

        let mut query = format!("SELECT COUNT({}) FROM {}", column, table);
        if let Some(filter) = &target.filter {
            query.push_str(&format!(" WHERE {}", filter));
        }
        Ok(query)
    }
}

/// カタログ統計による推定行数
///
/// 推定値は絞り込みや特定カラムの集計に対応できません。
#[derive(Debug, Clone, Copy)]
pub struct ApproxRowCountHandler {
    dialect: DialectKind,
}

impl ApproxRowCountHandler {
    pub fn new(dialect: DialectKind) -> Self {
        Self { dialect }
    }
}

impl RowCountHandler for ApproxRowCountHandler {
    fn kind(&self) -> RowCountKind {
        RowCountKind::Approx
    }

    fn count_query(&self, target: &RowCountTarget) -> Result<String, GeneratorError> {
        if target.filter.is_some() || target.column.is_some() {
            return Err(GeneratorError::unsupported(
                self.dialect.to_string(),
                "approximate row count with a filter or column",
            ));
        }
        let table = quote_literal(&target.table);
        match self.dialect {
            DialectKind::MySQL => {
                let database = target
                    .catalog
                    .as_deref()
                    .or(target.schema.as_deref())
                    .map(quote_literal)
                    .unwrap_or_else(|| "DATABASE()".to_string());
                Ok(format!(
                    "SELECT TABLE_ROWS FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {}",
                    database, table
                ))
            }
            DialectKind::Oracle => Ok(match target.schema.as_deref() {
                Some(owner) => format!(
                    "SELECT NUM_ROWS FROM ALL_TABLES WHERE OWNER = {} AND TABLE_NAME = {}",
                    quote_literal(owner),
                    table
                ),
                None => format!("SELECT NUM_ROWS FROM USER_TABLES WHERE TABLE_NAME = {}", table),
            }),
            DialectKind::SQLServer => {
                let quote = IdentifierQuote::BRACKET;
                let object = [target.schema.as_deref(), Some(target.table.as_str())]
                    .into_iter()
                    .flatten()
                    .map(|part| quote.quote(part))
                    .collect::<Vec<_>>()
                    .join(".");
                Ok(format!(
                    "SELECT SUM(p.rows) FROM sys.partitions p WHERE p.object_id = OBJECT_ID({}) AND p.index_id IN (0, 1)",
                    quote_literal(&object)
                ))
            }
            other => Err(GeneratorError::unsupported(
                other.to_string(),
                "approximate row count",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_count() {
        let handler = ExactRowCountHandler::new(IdentifierQuote::DOUBLE);
        let target = RowCountTarget::table("users").in_schema("app");
        assert_eq!(
            handler.count_query(&target).unwrap(),
            r#"SELECT COUNT(*) FROM "app"."users""#
        );

        let target = RowCountTarget::table("users")
            .column("email")
            .filter("active = 1");
        assert_eq!(
            handler.count_query(&target).unwrap(),
            r#"SELECT COUNT("email") FROM "users" WHERE active = 1"#
        );
    }

    #[test]
    fn test_approx_count_queries() {
        let mysql = ApproxRowCountHandler::new(DialectKind::MySQL);
        assert_eq!(
            mysql
                .count_query(&RowCountTarget::table("users").in_catalog("shop"))
                .unwrap(),
            "SELECT TABLE_ROWS FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = 'shop' AND TABLE_NAME = 'users'"
        );

        let oracle = ApproxRowCountHandler::new(DialectKind::Oracle);
        assert_eq!(
            oracle
                .count_query(&RowCountTarget::table("EMP").in_schema("HR"))
                .unwrap(),
            "SELECT NUM_ROWS FROM ALL_TABLES WHERE OWNER = 'HR' AND TABLE_NAME = 'EMP'"
        );

        let sqlserver = ApproxRowCountHandler::new(DialectKind::SQLServer);
        let query = sqlserver
            .count_query(&RowCountTarget::table("orders").in_schema("dbo"))
            .unwrap();
        assert!(query.contains("OBJECT_ID('[dbo].[orders]')"));
    }

    #[test]
    fn test_approx_count_rejects_filter() {
        let handler = ApproxRowCountHandler::new(DialectKind::MySQL);
        let result = handler.count_query(&RowCountTarget::table("users").filter("id > 10"));
        assert!(result.unwrap_err().is_unsupported());

        let generic = ApproxRowCountHandler::new(DialectKind::Generic);
        assert!(generic
            .count_query(&RowCountTarget::table("users"))
            .unwrap_err()
            .is_unsupported());
    }
}
