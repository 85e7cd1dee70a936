// 設定ファイル管理
//
// マイグレーション設定ファイル（YAML形式）の読み込みと検証、
// 移行元・移行先の方言、生成するスクリプト種別、ゼロ日付の扱いなどを管理します。

use anyhow::{anyhow, Context, Result};
use chrono::FixedOffset;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

/// データベース方言の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DialectKind {
    #[serde(rename = "mysql")]
    MySQL,
    #[serde(rename = "oracle")]
    Oracle,
    #[serde(rename = "sqlserver")]
    SQLServer,
    #[serde(rename = "generic")]
    Generic,
    /// 移行先の標準データベース
    #[serde(rename = "target")]
    Target,
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialectKind::MySQL => write!(f, "mysql"),
            DialectKind::Oracle => write!(f, "oracle"),
            DialectKind::SQLServer => write!(f, "sqlserver"),
            DialectKind::Generic => write!(f, "generic"),
            DialectKind::Target => write!(f, "target"),
        }
    }
}

impl FromStr for DialectKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DialectKind::MySQL),
            "oracle" => Ok(DialectKind::Oracle),
            "sqlserver" | "mssql" => Ok(DialectKind::SQLServer),
            "generic" | "ansi" => Ok(DialectKind::Generic),
            "target" => Ok(DialectKind::Target),
            other => Err(anyhow!(
                "Unsupported database dialect: {}. Please specify one of: mysql, oracle, sqlserver, generic, target.",
                other
            )),
        }
    }
}

/// 生成するスクリプトの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    /// DROP文
    Drop,
    /// CREATE文
    Create,
}

/// ゼロ日付（0000-00-00 等）の扱い
///
/// 既定値はMySQL Connector/Jと同じ `Exception` です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDateTimeBehavior {
    /// NULLに変換
    ConvertToNull,
    /// 方言で表現可能な最小の日付・時刻に丸める
    Round,
    /// 翻訳エラーとする
    #[default]
    Exception,
}

impl ZeroDateTimeBehavior {
    /// JDBC URLの `zeroDateTimeBehavior` パラメータから取得
    ///
    /// # Examples
    /// ```
    /// use dbporter::core::config::ZeroDateTimeBehavior;
    /// let url = "jdbc:mysql://localhost:3306/test?zeroDateTimeBehavior=round";
    /// assert_eq!(ZeroDateTimeBehavior::from_url(url), Some(ZeroDateTimeBehavior::Round));
    /// ```
    pub fn from_url(url: &str) -> Option<Self> {
        let (_, query) = url.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| key.eq_ignore_ascii_case("zeroDateTimeBehavior"))
            .and_then(|(_, value)| value.parse().ok())
    }
}

impl FromStr for ZeroDateTimeBehavior {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "").as_str() {
            "converttonull" => Ok(ZeroDateTimeBehavior::ConvertToNull),
            "round" => Ok(ZeroDateTimeBehavior::Round),
            "exception" => Ok(ZeroDateTimeBehavior::Exception),
            other => Err(anyhow!("Unknown zero date time behavior: {}", other)),
        }
    }
}

/// 型名が解決できない場合の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNameFallback {
    /// ソースの型名をそのまま使用
    SourceTypeName,
    /// 生成エラーとする
    #[default]
    Fail,
}

static OFFSET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:UTC|GMT)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("valid offset pattern")
});

static ZONE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_+\-/]*$").expect("valid zone pattern"));

/// 最小オフセット（-13:59）
const MIN_OFFSET_SECONDS: i32 = -(13 * 3600 + 59 * 60);
/// 最大オフセット（+14:00）
const MAX_OFFSET_SECONDS: i32 = 14 * 3600;

/// セッションタイムゾーンの設定値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeZoneSetting {
    /// サーバーのシステムタイムゾーン
    System,
    /// 固定オフセット
    Offset(FixedOffset),
    /// 名前付きタイムゾーン（Europe/Berlin 等）
    Named(String),
}

impl TimeZoneSetting {
    /// セッション変数に設定する値へ正規化
    ///
    /// 固定オフセットは `[+-]HH:MM` 形式、範囲外のオフセットは `SYSTEM` になります。
    pub fn normalized(&self) -> String {
        match self {
            TimeZoneSetting::System => "SYSTEM".to_string(),
            TimeZoneSetting::Named(name) => name.clone(),
            TimeZoneSetting::Offset(offset) => {
                let seconds = offset.local_minus_utc();
                if !(MIN_OFFSET_SECONDS..=MAX_OFFSET_SECONDS).contains(&seconds) {
                    tracing::warn!(
                        offset = seconds,
                        "Time zone offset out of range, falling back to SYSTEM"
                    );
                    return "SYSTEM".to_string();
                }
                let sign = if seconds >= 0 { '+' } else { '-' };
                let abs = seconds.abs();
                format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
            }
        }
    }
}

impl FromStr for TimeZoneSetting {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("SYSTEM") || value.eq_ignore_ascii_case("LOCAL") {
            return Ok(TimeZoneSetting::System);
        }
        if ["UTC", "GMT", "Z"].iter().any(|z| value.eq_ignore_ascii_case(z)) {
            return FixedOffset::east_opt(0)
                .map(TimeZoneSetting::Offset)
                .ok_or_else(|| anyhow!("Invalid time zone: {}", value));
        }
        if let Some(caps) = OFFSET_PATTERN.captures(value) {
            let hours: i32 = caps[2].parse()?;
            let minutes: i32 = caps.get(3).map_or(Ok(0), |m| m.as_str().parse())?;
            if minutes >= 60 {
                return Err(anyhow!("Invalid time zone offset: {}", value));
            }
            let mut seconds = hours * 3600 + minutes * 60;
            if &caps[1] == "-" {
                seconds = -seconds;
            }
            // FixedOffset は ±24時間未満のみ表現できる
            return Ok(match FixedOffset::east_opt(seconds) {
                Some(offset) => TimeZoneSetting::Offset(offset),
                None => {
                    tracing::warn!(
                        offset = value,
                        "Time zone offset out of range, falling back to SYSTEM"
                    );
                    TimeZoneSetting::System
                }
            });
        }
        if ZONE_NAME_PATTERN.is_match(value) {
            return Ok(TimeZoneSetting::Named(value.to_string()));
        }
        Err(anyhow!("Invalid time zone: {}", value))
    }
}

/// マイグレーション設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigratorConfig {
    /// 設定ファイルのバージョン
    pub version: String,

    /// 移行元の設定
    pub source: SourceConfig,

    /// 移行先の設定
    pub target: TargetConfig,

    /// スクリプト生成の設定
    #[serde(default)]
    pub scripts: ScriptsConfig,

    /// ゼロ日付の扱い（source.urlのパラメータより優先）
    #[serde(default)]
    pub zero_date_time_behavior: Option<ZeroDateTimeBehavior>,
}

/// 移行元データベースの設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 方言
    pub dialect: DialectKind,
    /// 接続URL（JDBC形式のパラメータを含み得る）
    #[serde(default)]
    pub url: Option<String>,
}

/// 移行先データベースの設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// 方言
    pub dialect: DialectKind,
    /// カタログ名の上書き
    #[serde(default)]
    pub catalog: Option<String>,
    /// スキーマ名の上書き
    #[serde(default)]
    pub schema: Option<String>,
    /// セッションタイムゾーン
    #[serde(default)]
    pub time_zone: Option<String>,
    /// 直接実行時の接続URL
    #[serde(default)]
    pub url: Option<String>,
}

/// スクリプト生成の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptsConfig {
    /// 生成するスクリプトの種類
    #[serde(default = "default_script_types")]
    pub types: Vec<ScriptType>,
    /// 制約・インデックスをCREATE TABLE内に埋め込むか
    #[serde(default = "default_true")]
    pub in_create_table: bool,
    /// 同一テーブルの複数インデックスを1文にまとめるか
    #[serde(default)]
    pub merge_indexes: bool,
    /// テーブル名をスキーマで修飾するか
    #[serde(default)]
    pub qualify_names: bool,
    /// 型名が解決できない場合の扱い
    #[serde(default)]
    pub type_name_fallback: TypeNameFallback,
}

fn default_script_types() -> Vec<ScriptType> {
    vec![ScriptType::Create]
}

fn default_true() -> bool {
    true
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            types: default_script_types(),
            in_create_table: true,
            merge_indexes: false,
            qualify_names: false,
            type_name_fallback: TypeNameFallback::default(),
        }
    }
}

impl MigratorConfig {
    /// デフォルトの設定ファイルパス
    pub const DEFAULT_CONFIG_PATH: &'static str = "dbporter.yaml";

    /// 設定ファイルを読み込む
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: MigratorConfig = content.parse()?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// 有効なゼロ日付の扱いを取得
    ///
    /// 明示的な設定 → source.url のパラメータ → 既定値（EXCEPTION）の順で決定します。
    pub fn zero_date_time_behavior(&self) -> ZeroDateTimeBehavior {
        self.zero_date_time_behavior
            .or_else(|| {
                self.source
                    .url
                    .as_deref()
                    .and_then(ZeroDateTimeBehavior::from_url)
            })
            .unwrap_or_default()
    }

    /// 移行先のセッションタイムゾーンを取得
    pub fn time_zone(&self) -> Result<Option<TimeZoneSetting>> {
        self.target
            .time_zone
            .as_deref()
            .map(|tz| tz.parse().with_context(|| format!("Invalid target time zone '{}'", tz)))
            .transpose()
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(anyhow!("Config file version is not specified"));
        }

        if matches!(self.target.schema.as_deref(), Some("")) {
            return Err(anyhow!("Target schema override must not be empty"));
        }

        if matches!(self.target.catalog.as_deref(), Some("")) {
            return Err(anyhow!("Target catalog override must not be empty"));
        }

        self.time_zone()?;

        Ok(())
    }
}

/// std::str::FromStrトレイトの実装
impl FromStr for MigratorConfig {
    type Err = anyhow::Error;

    fn from_str(yaml: &str) -> Result<Self, Self::Err> {
        serde_saphyr::from_str(yaml).with_context(|| "Failed to parse config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_kind_display_and_parse() {
        assert_eq!(DialectKind::MySQL.to_string(), "mysql");
        assert_eq!(DialectKind::SQLServer.to_string(), "sqlserver");
        assert_eq!("MSSQL".parse::<DialectKind>().unwrap(), DialectKind::SQLServer);
        assert_eq!("target".parse::<DialectKind>().unwrap(), DialectKind::Target);
        assert!("db2".parse::<DialectKind>().is_err());
    }

    #[test]
    fn test_zero_date_time_behavior_parse() {
        assert_eq!(
            "convertToNull".parse::<ZeroDateTimeBehavior>().unwrap(),
            ZeroDateTimeBehavior::ConvertToNull
        );
        assert_eq!(
            "convert_to_null".parse::<ZeroDateTimeBehavior>().unwrap(),
            ZeroDateTimeBehavior::ConvertToNull
        );
        assert_eq!(
            "EXCEPTION".parse::<ZeroDateTimeBehavior>().unwrap(),
            ZeroDateTimeBehavior::Exception
        );
        assert!("ignore".parse::<ZeroDateTimeBehavior>().is_err());
    }

    #[test]
    fn test_zero_date_time_behavior_from_url() {
        let url = "jdbc:mysql://localhost:3306/test?useSSL=false&zeroDateTimeBehavior=convertToNull";
        assert_eq!(
            ZeroDateTimeBehavior::from_url(url),
            Some(ZeroDateTimeBehavior::ConvertToNull)
        );
        assert_eq!(
            ZeroDateTimeBehavior::from_url("jdbc:mysql://localhost:3306/test"),
            None
        );
    }

    #[test]
    fn test_time_zone_setting_parse() {
        assert_eq!(
            "system".parse::<TimeZoneSetting>().unwrap(),
            TimeZoneSetting::System
        );
        assert_eq!("UTC".parse::<TimeZoneSetting>().unwrap().normalized(), "+00:00");
        assert_eq!("+5:30".parse::<TimeZoneSetting>().unwrap().normalized(), "+05:30");
        assert_eq!("-0800".parse::<TimeZoneSetting>().unwrap().normalized(), "-08:00");
        assert_eq!("GMT+2".parse::<TimeZoneSetting>().unwrap().normalized(), "+02:00");
        assert_eq!(
            "Europe/Berlin".parse::<TimeZoneSetting>().unwrap(),
            TimeZoneSetting::Named("Europe/Berlin".to_string())
        );
        assert!("+05:75".parse::<TimeZoneSetting>().is_err());
        assert!("'; DROP".parse::<TimeZoneSetting>().is_err());
    }

    #[test]
    fn test_time_zone_out_of_range_normalizes_to_system() {
        let tz = "+18:00".parse::<TimeZoneSetting>().unwrap();
        assert_eq!(tz.normalized(), "SYSTEM");
        let tz = "-14:00".parse::<TimeZoneSetting>().unwrap();
        assert_eq!(tz.normalized(), "SYSTEM");
        let tz = "+14:00".parse::<TimeZoneSetting>().unwrap();
        assert_eq!(tz.normalized(), "+14:00");

        for value in ["+24:00", "+30:00", "-25:00", "UTC+99"] {
            let tz = value.parse::<TimeZoneSetting>().unwrap();
            assert_eq!(tz, TimeZoneSetting::System);
            assert_eq!(tz.normalized(), "SYSTEM");
        }
    }

    #[test]
    fn test_config_defaults() {
        let yaml = r#"
version: "1.0"
source:
  dialect: mysql
  url: "jdbc:mysql://localhost/test?zeroDateTimeBehavior=round"
target:
  dialect: target
"#;
        let config: MigratorConfig = yaml.parse().unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.scripts.types, vec![ScriptType::Create]);
        assert!(config.scripts.in_create_table);
        assert!(!config.scripts.merge_indexes);
        assert_eq!(config.scripts.type_name_fallback, TypeNameFallback::Fail);
        assert_eq!(config.zero_date_time_behavior(), ZeroDateTimeBehavior::Round);
    }

    #[test]
    fn test_config_explicit_behavior_overrides_url() {
        let yaml = r#"
version: "1.0"
source:
  dialect: mysql
  url: "jdbc:mysql://localhost/test?zeroDateTimeBehavior=round"
target:
  dialect: oracle
  schema: HR
  time_zone: "+02:00"
scripts:
  types: [drop, create]
  in_create_table: false
  type_name_fallback: source_type_name
zero_date_time_behavior: convert_to_null
"#;
        let config: MigratorConfig = yaml.parse().unwrap();
        assert_eq!(
            config.zero_date_time_behavior(),
            ZeroDateTimeBehavior::ConvertToNull
        );
        assert_eq!(config.scripts.types, vec![ScriptType::Drop, ScriptType::Create]);
        assert!(!config.scripts.in_create_table);
        assert_eq!(
            config.scripts.type_name_fallback,
            TypeNameFallback::SourceTypeName
        );
        assert_eq!(config.target.schema.as_deref(), Some("HR"));
        assert!(matches!(
            config.time_zone().unwrap(),
            Some(TimeZoneSetting::Offset(_))
        ));
    }

    #[test]
    fn test_config_validate_rejects_bad_values() {
        let yaml = r#"
version: ""
source:
  dialect: mysql
target:
  dialect: target
"#;
        let config: MigratorConfig = yaml.parse().unwrap();
        assert!(config.validate().is_err());

        let yaml = r#"
version: "1.0"
source:
  dialect: mysql
target:
  dialect: target
  time_zone: "not a zone!"
"#;
        let config: MigratorConfig = yaml.parse().unwrap();
        assert!(config.validate().is_err());
    }
}
