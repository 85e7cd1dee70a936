// データベースセッションアダプター
//
// SQLxを使用した移行先データベースへの接続と、セッション単位の操作（タイムゾーン設定、文の実行）を扱います。
// 接続は呼び出し元が排他的に所有し、失敗はそのままSQLエラーとして伝播します。

use crate::adapters::dialect::Dialect;
use crate::core::config::TimeZoneSetting;
use crate::core::error::DatabaseError;
use async_trait::async_trait;
use sqlx::{AnyConnection, Connection};
use tracing::{debug, info};

/// SQL文の実行先
#[async_trait]
pub trait StatementExecutor: Send {
    /// 1つの文を実行
    async fn execute(&mut self, sql: &str) -> Result<(), DatabaseError>;
}

#[async_trait]
impl StatementExecutor for AnyConnection {
    async fn execute(&mut self, sql: &str) -> Result<(), DatabaseError> {
        debug!(sql = %sql, "Executing statement");
        sqlx::Executor::execute(self, sqlx::raw_sql(sql))
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Query {
                message: e.to_string(),
                sql: Some(sql.to_string()),
            })
    }
}

/// 接続URLからデータベースに接続
///
/// ドライバーは事前に `sqlx::any::install_default_drivers()` で登録しておく必要があります。
pub async fn connect(url: &str) -> Result<AnyConnection, DatabaseError> {
    AnyConnection::connect(url)
        .await
        .map_err(|e| DatabaseError::Connection {
            message: "Failed to connect to the target database".to_string(),
            cause: e.to_string(),
        })
}

/// セッションタイムゾーンを設定
///
/// 方言がセッションタイムゾーンに対応していない場合は `DatabaseError::Unsupported` を返します。
pub async fn set_session_time_zone<E>(
    dialect: &dyn Dialect,
    executor: &mut E,
    time_zone: &TimeZoneSetting,
) -> Result<(), DatabaseError>
where
    E: StatementExecutor + ?Sized,
{
    if !dialect.supports_session_time_zone() {
        return Err(DatabaseError::Unsupported(format!(
            "{} does not support session time zones",
            dialect.kind()
        )));
    }
    let statement = dialect
        .session_time_zone_statement(time_zone)
        .map_err(|e| DatabaseError::Unsupported(e.to_string()))?;

    info!(
        dialect = %dialect.kind(),
        time_zone = %time_zone.normalized(),
        "Setting session time zone"
    );
    executor.execute(&statement).await
}
