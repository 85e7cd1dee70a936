// 行数制限ハンドラー
//
// SELECT文に方言固有の行数制限（LIMIT, ROWNUM, TOP, FETCH FIRST）を適用します。

use regex::Regex;
use std::sync::LazyLock;

static SELECT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*select(\s+distinct)?\s+").expect("valid select pattern")
});

static ORDER_BY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\border\s+by\b").expect("valid order by pattern"));

/// 行数制限の指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLimit {
    /// 取得する最大行数
    pub count: u64,
    /// 読み飛ばす行数
    pub offset: Option<u64>,
}

impl RowLimit {
    /// 行数のみ指定して作成
    pub fn new(count: u64) -> Self {
        Self {
            count,
            offset: None,
        }
    }

    /// オフセットを指定
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn effective_offset(&self) -> Option<u64> {
        self.offset.filter(|offset| *offset > 0)
    }
}

/// パラメータ化された行数制限付きクエリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitedQuery {
    /// `?` マーカーを含むSQL
    pub sql: String,
    /// マーカー順のバインド値
    pub parameters: Vec<u64>,
}

/// 行数制限ハンドラー
pub trait LimitHandler: Send + Sync {
    /// リテラル値で行数制限を適用
    fn apply(&self, query: &str, limit: &RowLimit) -> String;

    /// `?` マーカーで行数制限を適用
    fn apply_parameterized(&self, query: &str, limit: &RowLimit) -> LimitedQuery;
}

/// `LIMIT n OFFSET m` 形式（MySQL、標準移行先）
#[derive(Debug, Clone, Copy, Default)]
pub struct LimitOffsetHandler;

impl LimitHandler for LimitOffsetHandler {
    fn apply(&self, query: &str, limit: &RowLimit) -> String {
        match limit.effective_offset() {
            Some(offset) => format!("{} LIMIT {} OFFSET {}", query, limit.count, offset),
            None => format!("{} LIMIT {}", query, limit.count),
        }
    }

    fn apply_parameterized(&self, query: &str, limit: &RowLimit) -> LimitedQuery {
        match limit.effective_offset() {
            Some(offset) => LimitedQuery {
                sql: format!("{} LIMIT ? OFFSET ?", query),
                parameters: vec![limit.count, offset],
            },
            None => LimitedQuery {
                sql: format!("{} LIMIT ?", query),
                parameters: vec![limit.count],
            },
        }
    }
}

/// ROWNUMサブクエリ形式（Oracle）
#[derive(Debug, Clone, Copy, Default)]
pub struct RownumLimitHandler;

impl RownumLimitHandler {
    fn wrap(query: &str, upper: &str, lower: Option<&str>) -> String {
        match lower {
            Some(lower) => format!(
                "SELECT * FROM (SELECT inner_.*, ROWNUM rownum_ FROM ({}) inner_ WHERE ROWNUM <= {}) WHERE rownum_ > {}",
                query, upper, lower
            ),
            None => format!("SELECT * FROM ({}) WHERE ROWNUM <= {}", query, upper),
        }
    }
}

impl LimitHandler for RownumLimitHandler {
    fn apply(&self, query: &str, limit: &RowLimit) -> String {
        match limit.effective_offset() {
            Some(offset) => Self::wrap(
                query,
                &(offset + limit.count).to_string(),
                Some(&offset.to_string()),
            ),
            None => Self::wrap(query, &limit.count.to_string(), None),
        }
    }

    fn apply_parameterized(&self, query: &str, limit: &RowLimit) -> LimitedQuery {
        match limit.effective_offset() {
            Some(offset) => LimitedQuery {
                sql: Self::wrap(query, "?", Some("?")),
                parameters: vec![offset + limit.count, offset],
            },
            None => LimitedQuery {
                sql: Self::wrap(query, "?", None),
                parameters: vec![limit.count],
            },
        }
    }
}

/// `TOP n` / `OFFSET … FETCH NEXT` 形式（SQL Server）
///
/// OFFSET句はORDER BYを必要とするため、ない場合は `ORDER BY (SELECT NULL)` を補います。
#[derive(Debug, Clone, Copy, Default)]
pub struct TopLimitHandler;

impl TopLimitHandler {
    fn with_order_by(query: &str) -> String {
        if ORDER_BY_PATTERN.is_match(query) {
            query.to_string()
        } else {
            format!("{} ORDER BY (SELECT NULL)", query)
        }
    }

    fn insert_top(query: &str, top: &str) -> String {
        match SELECT_PATTERN.find(query) {
            Some(select) => format!(
                "{}TOP {} {}",
                select.as_str(),
                top,
                &query[select.end()..]
            ),
            None => format!("SELECT TOP {} * FROM ({}) query_", top, query),
        }
    }
}

impl LimitHandler for TopLimitHandler {
    fn apply(&self, query: &str, limit: &RowLimit) -> String {
        match limit.effective_offset() {
            Some(offset) => format!(
                "{} OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                Self::with_order_by(query),
                offset,
                limit.count
            ),
            None => Self::insert_top(query, &limit.count.to_string()),
        }
    }

    fn apply_parameterized(&self, query: &str, limit: &RowLimit) -> LimitedQuery {
        match limit.effective_offset() {
            Some(offset) => LimitedQuery {
                sql: format!(
                    "{} OFFSET ? ROWS FETCH NEXT ? ROWS ONLY",
                    Self::with_order_by(query)
                ),
                parameters: vec![offset, limit.count],
            },
            None => LimitedQuery {
                sql: Self::insert_top(query, "(?)"),
                parameters: vec![limit.count],
            },
        }
    }
}

/// `OFFSET … FETCH FIRST` 形式（SQL:2008）
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchFirstLimitHandler;

impl LimitHandler for FetchFirstLimitHandler {
    fn apply(&self, query: &str, limit: &RowLimit) -> String {
        match limit.effective_offset() {
            Some(offset) => format!(
                "{} OFFSET {} ROWS FETCH FIRST {} ROWS ONLY",
                query, offset, limit.count
            ),
            None => format!("{} FETCH FIRST {} ROWS ONLY", query, limit.count),
        }
    }

    fn apply_parameterized(&self, query: &str, limit: &RowLimit) -> LimitedQuery {
        match limit.effective_offset() {
            Some(offset) => LimitedQuery {
                sql: format!("{} OFFSET ? ROWS FETCH FIRST ? ROWS ONLY", query),
                parameters: vec![offset, limit.count],
            },
            None => LimitedQuery {
                sql: format!("{} FETCH FIRST ? ROWS ONLY", query),
                parameters: vec![limit.count],
            },
        }
    }
}
