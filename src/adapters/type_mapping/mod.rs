// 型名レジストリ
//
// JDBC型コードと型指定子（サイズ・精度・スケール）から移行先の型名を解決します。
// レジストリはビルダーで一度だけ構築され、以降は変更されません。

mod template;

pub use template::{Limit, SpecifierBound, TypeNameTemplate};

use crate::core::type_code::{self, TypeDesc, TypeSpecifiers};
use std::collections::HashMap;

/// 型エイリアスのキー（型コード, 大文字化した型名）
type AliasKey = (i32, Option<String>);

/// 型名レジストリ
///
/// 型コードごとに登録されたテンプレートの中から、型指定子を満たし
/// かつ最も特定度の高いものを選択します。同じ特定度のテンプレートは
/// 後に登録されたものが優先されます。
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    templates: HashMap<i32, Vec<TypeNameTemplate>>,
    aliases: HashMap<AliasKey, i32>,
}

impl TypeRegistry {
    /// ビルダーを作成
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// 型エイリアスを解決
    ///
    /// 型名付きのエイリアスを優先し、次に型コードのみのエイリアスを参照します。
    pub fn resolve_alias(&self, desc: &TypeDesc) -> Option<i32> {
        let named = desc
            .name
            .as_ref()
            .and_then(|name| {
                self.aliases
                    .get(&(desc.code, Some(name.trim().to_ascii_uppercase())))
            });
        named
            .or_else(|| self.aliases.get(&(desc.code, None)))
            .copied()
    }

    /// 型名を解決
    ///
    /// 未登録の型コードの場合はNoneを返します。
    ///
    /// # Examples
    /// ```
    /// use dbporter::adapters::type_mapping::{Limit, SpecifierBound, TypeRegistry};
    /// use dbporter::core::type_code::{self, TypeDesc, TypeSpecifiers};
    ///
    /// let registry = TypeRegistry::builder()
    ///     .register(type_code::BIGINT, "BIGINT")
    ///     .register_bounded(
    ///         type_code::BIGINT,
    ///         SpecifierBound::new().precision(Limit::AtLeast(20)),
    ///         "NUMBER({P})",
    ///     )
    ///     .build();
    /// let desc = TypeDesc::new(type_code::BIGINT);
    /// assert_eq!(
    ///     registry.resolve_type_name(&desc, &TypeSpecifiers::with_precision(19)).as_deref(),
    ///     Some("BIGINT")
    /// );
    /// assert_eq!(
    ///     registry.resolve_type_name(&desc, &TypeSpecifiers::with_precision(20)).as_deref(),
    ///     Some("NUMBER(20)")
    /// );
    /// ```
    pub fn resolve_type_name(
        &self,
        desc: &TypeDesc,
        specifiers: &TypeSpecifiers,
    ) -> Option<String> {
        let code = self.resolve_alias(desc).unwrap_or(desc.code);
        self.resolve_code(code, specifiers)
    }

    /// エイリアスを経由せずに型コードから型名を解決
    pub fn resolve_code(&self, code: i32, specifiers: &TypeSpecifiers) -> Option<String> {
        let templates = self.templates.get(&code)?;
        templates
            .iter()
            .enumerate()
            .filter(|(_, template)| template.is_applicable(specifiers))
            .max_by_key(|(index, template)| {
                let specificity = template
                    .bound()
                    .map(|bound| (1, bound.specificity()))
                    .unwrap_or((0, (0, 0, 0)));
                (specificity, *index)
            })
            .map(|(_, template)| template.expand(specifiers))
    }

    /// 型コードにテンプレートが登録されているかどうか
    pub fn contains(&self, code: i32) -> bool {
        self.templates.contains_key(&code)
    }
}

/// 型名レジストリのビルダー
///
/// 登録順は解決結果に影響します（同じ特定度では後の登録が優先）。
#[derive(Debug, Clone, Default)]
pub struct TypeRegistryBuilder {
    templates: HashMap<i32, Vec<TypeNameTemplate>>,
    aliases: HashMap<AliasKey, i32>,
}

impl TypeRegistryBuilder {
    /// 方言共通の基本テンプレートを登録したビルダーを作成
    ///
    /// LONGVARCHAR / LONGVARBINARY は方言ごとに登録します。
    pub fn with_standard_types() -> Self {
        Self::default()
            .register(type_code::BIT, "BIT")
            .register(type_code::BOOLEAN, "BOOLEAN")
            .register(type_code::TINYINT, "SMALLINT")
            .register(type_code::SMALLINT, "SMALLINT")
            .register(type_code::INTEGER, "INTEGER")
            .register(type_code::BIGINT, "BIGINT")
            .register(type_code::FLOAT, "FLOAT")
            .register(type_code::REAL, "REAL")
            .register(type_code::DOUBLE, "DOUBLE")
            .register(type_code::NUMERIC, "NUMERIC({P},{S})")
            .register(type_code::DECIMAL, "DECIMAL({P},{S})")
            .register(type_code::CHAR, "CHAR({N})")
            .register(type_code::VARCHAR, "VARCHAR({N})")
            .register(type_code::NCHAR, "NCHAR({N})")
            .register(type_code::NVARCHAR, "NVARCHAR({N})")
            .register(type_code::DATE, "DATE")
            .register(type_code::TIME, "TIME")
            .register(type_code::TIMESTAMP, "TIMESTAMP")
            .register(type_code::BINARY, "BINARY({N})")
            .register(type_code::VARBINARY, "VARBINARY({N})")
            .register(type_code::BLOB, "BLOB")
            .register(type_code::CLOB, "CLOB")
            .register(type_code::NCLOB, "NCLOB")
    }

    /// 無制限のテンプレートを登録
    pub fn register(self, code: i32, template: &str) -> Self {
        self.push(code, TypeNameTemplate::new(template, None))
    }

    /// バウンド付きのテンプレートを登録
    pub fn register_bounded(self, code: i32, bound: SpecifierBound, template: &str) -> Self {
        self.push(code, TypeNameTemplate::new(template, Some(bound)))
    }

    /// 型コードの登録を取り消す
    pub fn unregister(mut self, code: i32) -> Self {
        self.templates.remove(&code);
        self
    }

    /// 型名付きのエイリアスを登録（例: LONGVARCHAR "TEXT" → CLOB）
    pub fn alias(mut self, code: i32, type_name: &str, target_code: i32) -> Self {
        self.aliases
            .insert((code, Some(type_name.to_ascii_uppercase())), target_code);
        self
    }

    /// 型コード全体のエイリアスを登録
    pub fn alias_code(mut self, code: i32, target_code: i32) -> Self {
        self.aliases.insert((code, None), target_code);
        self
    }

    /// レジストリを構築
    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            templates: self.templates,
            aliases: self.aliases,
        }
    }

    fn push(mut self, code: i32, template: TypeNameTemplate) -> Self {
        self.templates.entry(code).or_default().push(template);
        self
    }
}
