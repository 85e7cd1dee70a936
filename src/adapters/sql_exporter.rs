// SQLエクスポーター
//
// 生成されたスクリプトを出力先（標準出力、ファイル、データベース接続）に書き出します。
// 文末の `;` と改行コードの正規化はエクスポーターの責務です。

use crate::adapters::database::StatementExecutor;
use crate::core::error::ExportError;
use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// SQLエクスポーター
#[async_trait]
pub trait SqlExporter: Send {
    /// 文の列を順に出力し、出力した文の数を返す
    async fn export(&mut self, statements: &[String]) -> Result<usize, ExportError>;
}

/// 文を出力用に正規化
///
/// 前後の空白を除き、改行コードを `line_separator` に揃え、文末に `;` を付けます。
/// 空の文はNoneになります。
pub fn normalize_statement(statement: &str, line_separator: &str) -> Option<String> {
    let trimmed = statement.trim();
    if trimmed.is_empty() || trimmed == ";" {
        return None;
    }
    let mut normalized = trimmed
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join(line_separator);
    if !normalized.ends_with(';') {
        normalized.push(';');
    }
    Some(normalized)
}

/// ストリームへ書き出すエクスポーター
#[derive(Debug)]
pub struct WriterSqlExporter<W> {
    writer: W,
    line_separator: String,
}

impl<W> WriterSqlExporter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            line_separator: "\n".to_string(),
        }
    }

    /// 改行コードを指定
    pub fn with_line_separator(mut self, line_separator: impl Into<String>) -> Self {
        self.line_separator = line_separator.into();
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSqlExporter<tokio::io::Stdout> {
    /// 標準出力へ書き出す
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl WriterSqlExporter<tokio::fs::File> {
    /// ファイルへ書き出す（既存のファイルは上書き）
    pub async fn create(path: &Path) -> Result<Self, ExportError> {
        Ok(Self::new(tokio::fs::File::create(path).await?))
    }
}

#[async_trait]
impl<W> SqlExporter for WriterSqlExporter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn export(&mut self, statements: &[String]) -> Result<usize, ExportError> {
        let mut count = 0;
        for statement in statements {
            let Some(normalized) = normalize_statement(statement, &self.line_separator) else {
                continue;
            };
            self.writer.write_all(normalized.as_bytes()).await?;
            self.writer.write_all(self.line_separator.as_bytes()).await?;
            count += 1;
        }
        self.writer.flush().await?;
        debug!(statements = count, "Scripts written");
        Ok(count)
    }
}

/// データベース接続上で文を実行するエクスポーター
///
/// 最初に失敗した文で中断し、それ以降の文は実行しません。
#[derive(Debug)]
pub struct ConnectionSqlExporter<E> {
    executor: E,
}

impl<E> ConnectionSqlExporter<E>
where
    E: StatementExecutor,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn into_inner(self) -> E {
        self.executor
    }
}

#[async_trait]
impl<E> SqlExporter for ConnectionSqlExporter<E>
where
    E: StatementExecutor,
{
    async fn export(&mut self, statements: &[String]) -> Result<usize, ExportError> {
        let mut count = 0;
        for statement in statements {
            let statement = statement.trim().trim_end_matches(';').trim_end();
            if statement.is_empty() {
                continue;
            }
            self.executor.execute(statement).await?;
            count += 1;
        }
        info!(statements = count, "Scripts executed");
        Ok(count)
    }
}
