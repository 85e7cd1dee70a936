// JDBC型コード
//
// ソースデータベースの型を方言に依存しない形で識別するための
// 型コード定数（java.sql.Types と同じ値）と、型記述子・型指定子を提供します。

use serde::{Deserialize, Serialize};

pub const BIT: i32 = -7;
pub const TINYINT: i32 = -6;
pub const SMALLINT: i32 = 5;
pub const INTEGER: i32 = 4;
pub const BIGINT: i32 = -5;
pub const FLOAT: i32 = 6;
pub const REAL: i32 = 7;
pub const DOUBLE: i32 = 8;
pub const NUMERIC: i32 = 2;
pub const DECIMAL: i32 = 3;
pub const CHAR: i32 = 1;
pub const VARCHAR: i32 = 12;
pub const LONGVARCHAR: i32 = -1;
pub const DATE: i32 = 91;
pub const TIME: i32 = 92;
pub const TIMESTAMP: i32 = 93;
pub const BINARY: i32 = -2;
pub const VARBINARY: i32 = -3;
pub const LONGVARBINARY: i32 = -4;
pub const NULL: i32 = 0;
pub const OTHER: i32 = 1111;
pub const JAVA_OBJECT: i32 = 2000;
pub const DISTINCT: i32 = 2001;
pub const STRUCT: i32 = 2002;
pub const ARRAY: i32 = 2003;
pub const BLOB: i32 = 2004;
pub const CLOB: i32 = 2005;
pub const REF: i32 = 2006;
pub const DATALINK: i32 = 70;
pub const BOOLEAN: i32 = 16;
pub const ROWID: i32 = -8;
pub const NCHAR: i32 = -15;
pub const NVARCHAR: i32 = -9;
pub const LONGNVARCHAR: i32 = -16;
pub const NCLOB: i32 = 2011;
pub const SQLXML: i32 = 2009;
pub const TIME_WITH_TIMEZONE: i32 = 2013;
pub const TIMESTAMP_WITH_TIMEZONE: i32 = 2014;

/// 型コードの名前を取得（ログ・エラーメッセージ用）
pub fn type_code_name(code: i32) -> Option<&'static str> {
    let name = match code {
        BIT => "BIT",
        TINYINT => "TINYINT",
        SMALLINT => "SMALLINT",
        INTEGER => "INTEGER",
        BIGINT => "BIGINT",
        FLOAT => "FLOAT",
        REAL => "REAL",
        DOUBLE => "DOUBLE",
        NUMERIC => "NUMERIC",
        DECIMAL => "DECIMAL",
        CHAR => "CHAR",
        VARCHAR => "VARCHAR",
        LONGVARCHAR => "LONGVARCHAR",
        DATE => "DATE",
        TIME => "TIME",
        TIMESTAMP => "TIMESTAMP",
        BINARY => "BINARY",
        VARBINARY => "VARBINARY",
        LONGVARBINARY => "LONGVARBINARY",
        NULL => "NULL",
        OTHER => "OTHER",
        JAVA_OBJECT => "JAVA_OBJECT",
        DISTINCT => "DISTINCT",
        STRUCT => "STRUCT",
        ARRAY => "ARRAY",
        BLOB => "BLOB",
        CLOB => "CLOB",
        REF => "REF",
        DATALINK => "DATALINK",
        BOOLEAN => "BOOLEAN",
        ROWID => "ROWID",
        NCHAR => "NCHAR",
        NVARCHAR => "NVARCHAR",
        LONGNVARCHAR => "LONGNVARCHAR",
        NCLOB => "NCLOB",
        SQLXML => "SQLXML",
        TIME_WITH_TIMEZONE => "TIME_WITH_TIMEZONE",
        TIMESTAMP_WITH_TIMEZONE => "TIMESTAMP_WITH_TIMEZONE",
        _ => return None,
    };
    Some(name)
}

/// 文字列系の型かどうか（デフォルト値をクォートする対象）
pub fn is_character(code: i32) -> bool {
    matches!(
        code,
        CHAR | VARCHAR | LONGVARCHAR | NCHAR | NVARCHAR | LONGNVARCHAR | CLOB | NCLOB
    )
}

/// 日付・時刻系の型かどうか
pub fn is_temporal(code: i32) -> bool {
    matches!(
        code,
        DATE | TIME | TIMESTAMP | TIME_WITH_TIMEZONE | TIMESTAMP_WITH_TIMEZONE
    )
}

/// 数値系の型かどうか
pub fn is_numeric(code: i32) -> bool {
    matches!(
        code,
        TINYINT | SMALLINT | INTEGER | BIGINT | FLOAT | REAL | DOUBLE | NUMERIC | DECIMAL
    )
}

/// 型記述子
///
/// 型コードと、任意のソース型名の組。型エイリアスの解決に使用します。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDesc {
    /// 型コード
    pub code: i32,
    /// ソースデータベース上の型名（例: "TINYTEXT"）
    pub name: Option<String>,
}

impl TypeDesc {
    /// 型コードのみの記述子を作成
    pub fn new(code: i32) -> Self {
        Self { code, name: None }
    }

    /// 型名付きの記述子を作成
    pub fn named(code: i32, name: impl Into<String>) -> Self {
        Self {
            code,
            name: Some(name.into()),
        }
    }
}

/// 型指定子
///
/// カラムのサイズ・精度・スケール。型名テンプレートの選択と置換に使用します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TypeSpecifiers {
    /// サイズ（{N}）
    pub size: Option<u32>,
    /// 精度（{P}）
    pub precision: Option<u32>,
    /// スケール（{S}）。Oracleでは負の値もあり得る
    pub scale: Option<i32>,
}

impl TypeSpecifiers {
    /// サイズ・精度・スケールをすべて指定して作成
    pub fn new(size: u32, precision: u32, scale: i32) -> Self {
        Self {
            size: Some(size),
            precision: Some(precision),
            scale: Some(scale),
        }
    }

    /// サイズのみ指定して作成
    pub fn with_size(size: u32) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// 精度のみ指定して作成
    pub fn with_precision(precision: u32) -> Self {
        Self {
            precision: Some(precision),
            ..Self::default()
        }
    }

    /// スケールのみ指定して作成
    pub fn with_scale(scale: i32) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_code_name() {
        assert_eq!(type_code_name(BIGINT), Some("BIGINT"));
        assert_eq!(type_code_name(OTHER), Some("OTHER"));
        assert_eq!(type_code_name(12345), None);
    }

    #[test]
    fn test_type_categories() {
        assert!(is_character(VARCHAR));
        assert!(is_character(CLOB));
        assert!(!is_character(INTEGER));
        assert!(is_temporal(TIMESTAMP));
        assert!(is_numeric(DECIMAL));
        assert!(!is_numeric(BIT));
    }
}
