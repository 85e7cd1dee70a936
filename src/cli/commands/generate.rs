// generateコマンドハンドラー
//
// 設定ファイルとメタデータグラフからスクリプトを生成し、出力先に書き出します。
// - 設定ファイルとメタデータ（JSON）の読み込みと検証
// - スクリプトジェネレーターマネージャーによる生成
// - 標準出力・ファイル・移行先データベースへの出力

use crate::adapters::database::{connect, set_session_time_zone};
use crate::adapters::dialect::create_dialect;
use crate::adapters::script_generator::ScriptGeneratorConfig;
use crate::adapters::sql_exporter::{ConnectionSqlExporter, SqlExporter, WriterSqlExporter};
use crate::core::config::MigratorConfig;
use crate::core::metadata::Database;
use crate::services::script_generator_manager::{ObjectRef, ScriptGeneratorManager};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// generateコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    /// 設定ファイルのパス
    pub config_path: PathBuf,
    /// メタデータグラフ（JSON）のパス
    pub metadata_path: PathBuf,
    /// 出力ファイル（指定されない場合は標準出力）
    pub output: Option<PathBuf>,
    /// 移行先データベースで直接実行するか
    pub execute: bool,
    /// 対象テーブル（指定されない場合はデータベース全体）
    pub table: Option<String>,
    /// 対象テーブルのスキーマ
    pub schema: Option<String>,
}

/// generateコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct GenerateCommandHandler {}

impl GenerateCommandHandler {
    /// 新しいGenerateCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// generateコマンドを実行
    ///
    /// # Returns
    ///
    /// 成功時は結果のサマリー（標準出力へ書き出した場合は空文字列）
    pub async fn execute(&self, command: &GenerateCommand) -> Result<String> {
        let config = MigratorConfig::from_file(&command.config_path)?;
        let database = load_metadata(&command.metadata_path)?;
        let statements = self.generate(&config, &database, command)?;

        if command.execute {
            let url = config
                .target
                .url
                .as_deref()
                .ok_or_else(|| anyhow!("target.url is required to execute scripts"))?;
            let mut connection = connect(url).await?;

            if let Some(time_zone) = config.time_zone()? {
                let target = create_dialect(config.target.dialect);
                set_session_time_zone(target.as_ref(), &mut connection, &time_zone)
                    .await
                    .with_context(|| "Failed to set session time zone")?;
            }

            let mut exporter = ConnectionSqlExporter::new(connection);
            let count = exporter.export(&statements).await?;
            return Ok(format!("Executed {} statement(s)", count));
        }

        if let Some(output) = &command.output {
            let mut exporter = WriterSqlExporter::create(output).await?;
            let count = exporter.export(&statements).await?;
            return Ok(format!(
                "Wrote {} statement(s) to {}",
                count,
                output.display()
            ));
        }

        let mut exporter = WriterSqlExporter::stdout();
        exporter.export(&statements).await?;
        Ok(String::new())
    }

    /// スクリプトを生成
    pub fn generate(
        &self,
        config: &MigratorConfig,
        database: &Database,
        command: &GenerateCommand,
    ) -> Result<Vec<String>> {
        let object = match &command.table {
            Some(table) => database
                .find_table(command.schema.as_deref(), table)
                .map(ObjectRef::Table)
                .ok_or_else(|| anyhow!("Table not found in metadata: {}", table))?,
            None => ObjectRef::Database,
        };

        let manager =
            ScriptGeneratorManager::new(ScriptGeneratorConfig::from_migrator_config(config));
        let scripts = manager
            .get_scripts(database, object)
            .with_context(|| "Failed to generate scripts")?;

        info!(
            drop = scripts.drop.as_ref().map_or(0, Vec::len),
            create = scripts.create.as_ref().map_or(0, Vec::len),
            "Generated scripts"
        );
        Ok(scripts.into_statements())
    }
}

/// メタデータグラフを読み込んで検証
pub fn load_metadata(path: &Path) -> Result<Database> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;
    let database: Database = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse metadata file: {}", path.display()))?;
    database
        .validate()
        .with_context(|| format!("Invalid metadata: {}", path.display()))?;
    Ok(database)
}
