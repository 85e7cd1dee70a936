// 型名テンプレート
//
// `{N}`（サイズ）、`{P}`（精度）、`{S}`（スケール）のプレースホルダーを含む型名と、
// テンプレートが適用される型指定子の範囲（バウンド）を表現します。

use crate::core::type_code::TypeSpecifiers;

/// 型指定子の1要素に対する制約
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// 指定値以上
    AtLeast(i64),
    /// 指定値と一致
    Exactly(i64),
}

impl Limit {
    fn matches(&self, actual: Option<i64>) -> bool {
        match (self, actual) {
            (Limit::AtLeast(min), Some(value)) => value >= *min,
            (Limit::Exactly(expected), Some(value)) => value == *expected,
            (_, None) => false,
        }
    }
}

/// 型指定子のバウンド
///
/// 制約が付いた要素はすべて存在し、かつ制約を満たす必要があります。
///
/// # Examples
/// ```
/// use dbporter::adapters::type_mapping::{Limit, SpecifierBound};
/// use dbporter::core::type_code::TypeSpecifiers;
///
/// let bound = SpecifierBound::new().precision(Limit::AtLeast(20));
/// assert!(bound.matches(&TypeSpecifiers::with_precision(20)));
/// assert!(!bound.matches(&TypeSpecifiers::with_precision(19)));
/// assert!(!bound.matches(&TypeSpecifiers::default()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecifierBound {
    size: Option<Limit>,
    precision: Option<Limit>,
    scale: Option<Limit>,
}

impl SpecifierBound {
    /// 制約なしのバウンドを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// サイズの制約を設定
    pub fn size(mut self, limit: Limit) -> Self {
        self.size = Some(limit);
        self
    }

    /// 精度の制約を設定
    pub fn precision(mut self, limit: Limit) -> Self {
        self.precision = Some(limit);
        self
    }

    /// スケールの制約を設定
    pub fn scale(mut self, limit: Limit) -> Self {
        self.scale = Some(limit);
        self
    }

    /// 型指定子がバウンドを満たすかどうか
    pub fn matches(&self, specifiers: &TypeSpecifiers) -> bool {
        let checks = [
            (self.size, specifiers.size.map(i64::from)),
            (self.precision, specifiers.precision.map(i64::from)),
            (self.scale, specifiers.scale.map(i64::from)),
        ];
        checks
            .iter()
            .all(|(limit, actual)| limit.is_none_or(|limit| limit.matches(*actual)))
    }

    /// 特定度（大きいほど狭い範囲）
    ///
    /// (Exactly制約の数, 制約された要素数, AtLeast下限値の合計) の辞書順で比較します。
    pub fn specificity(&self) -> (usize, usize, i64) {
        let limits: Vec<Limit> = [self.size, self.precision, self.scale]
            .into_iter()
            .flatten()
            .collect();
        let exact = limits
            .iter()
            .filter(|l| matches!(l, Limit::Exactly(_)))
            .count();
        let minimum: i64 = limits
            .iter()
            .map(|l| match l {
                Limit::AtLeast(min) => *min,
                Limit::Exactly(_) => 0,
            })
            .sum();
        (exact, limits.len(), minimum)
    }
}

/// 型名テンプレート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNameTemplate {
    template: String,
    bound: Option<SpecifierBound>,
}

impl TypeNameTemplate {
    /// 新しいテンプレートを作成
    pub fn new(template: impl Into<String>, bound: Option<SpecifierBound>) -> Self {
        Self {
            template: template.into(),
            bound,
        }
    }

    /// テンプレート文字列を取得
    pub fn template(&self) -> &str {
        &self.template
    }

    /// バウンドを取得（Noneは無制限）
    pub fn bound(&self) -> Option<&SpecifierBound> {
        self.bound.as_ref()
    }

    /// 型指定子に適用可能かどうか
    pub fn is_applicable(&self, specifiers: &TypeSpecifiers) -> bool {
        self.bound.is_none_or(|bound| bound.matches(specifiers))
    }

    /// プレースホルダーを置換して型名を生成
    ///
    /// 指定されていない要素は `0` に置換されます。
    pub fn expand(&self, specifiers: &TypeSpecifiers) -> String {
        self.template
            .replace("{N}", &specifiers.size.unwrap_or(0).to_string())
            .replace("{P}", &specifiers.precision.unwrap_or(0).to_string())
            .replace("{S}", &specifiers.scale.unwrap_or(0).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_limit_requires_presence() {
        let bound = SpecifierBound::new().scale(Limit::Exactly(0));
        assert!(bound.matches(&TypeSpecifiers::with_scale(0)));
        assert!(!bound.matches(&TypeSpecifiers::with_scale(4)));
        assert!(!bound.matches(&TypeSpecifiers::default()));
    }

    #[test]
    fn test_specificity_ordering() {
        let unbounded = SpecifierBound::new();
        let at_least = SpecifierBound::new().precision(Limit::AtLeast(20));
        let higher = SpecifierBound::new().precision(Limit::AtLeast(39));
        let exact = SpecifierBound::new().size(Limit::Exactly(1));
        let two = SpecifierBound::new()
            .precision(Limit::AtLeast(1))
            .scale(Limit::AtLeast(1));

        assert!(at_least.specificity() > unbounded.specificity());
        assert!(higher.specificity() > at_least.specificity());
        assert!(two.specificity() > higher.specificity());
        assert!(exact.specificity() > two.specificity());
    }

    #[test]
    fn test_expand_placeholders() {
        let template = TypeNameTemplate::new("DECIMAL({P},{S})", None);
        assert_eq!(template.expand(&TypeSpecifiers::new(8, 6, 2)), "DECIMAL(6,2)");

        let template = TypeNameTemplate::new("VARCHAR({N})", None);
        assert_eq!(template.expand(&TypeSpecifiers::with_size(255)), "VARCHAR(255)");
        assert_eq!(template.expand(&TypeSpecifiers::default()), "VARCHAR(0)");
    }

    #[test]
    fn test_negative_scale_is_substituted_verbatim() {
        let template = TypeNameTemplate::new("NUMBER({P},{S})", None);
        let specifiers = TypeSpecifiers {
            size: None,
            precision: Some(10),
            scale: Some(-2),
        };
        assert_eq!(template.expand(&specifiers), "NUMBER(10,-2)");
    }
}
