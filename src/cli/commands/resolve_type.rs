// resolve-typeコマンドハンドラー
//
// JDBC型コードと型指定子から、指定した方言の型名を解決して表示します。

use crate::adapters::dialect::{create_dialect, resolve_type_name};
use crate::core::config::DialectKind;
use crate::core::type_code::{TypeDesc, TypeSpecifiers};
use anyhow::{anyhow, Result};

/// resolve-typeコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct ResolveTypeCommand {
    /// 型名を出力する方言
    pub dialect: DialectKind,
    /// 型エイリアスを解決する移行元方言（指定されない場合は出力先と同じ）
    pub source: Option<DialectKind>,
    /// JDBC型コード
    pub code: i32,
    /// 移行元の型名
    pub name: Option<String>,
    /// 型指定子
    pub specifiers: TypeSpecifiers,
}

/// resolve-typeコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct ResolveTypeCommandHandler {}

impl ResolveTypeCommandHandler {
    /// 新しいResolveTypeCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// resolve-typeコマンドを実行
    pub fn execute(&self, command: &ResolveTypeCommand) -> Result<String> {
        let target = create_dialect(command.dialect);
        let source = create_dialect(command.source.unwrap_or(command.dialect));
        let desc = match &command.name {
            Some(name) => TypeDesc::named(command.code, name.clone()),
            None => TypeDesc::new(command.code),
        };

        resolve_type_name(source.as_ref(), target.as_ref(), &desc, &command.specifiers)
            .ok_or_else(|| {
                anyhow!(
                    "No type name for code {} in dialect {}",
                    command.code,
                    command.dialect
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::type_code;

    fn command(dialect: DialectKind, code: i32, specifiers: TypeSpecifiers) -> ResolveTypeCommand {
        ResolveTypeCommand {
            dialect,
            source: None,
            code,
            name: None,
            specifiers,
        }
    }

    #[test]
    fn test_resolve_bigint_precision() {
        let handler = ResolveTypeCommandHandler::new();
        let result = handler
            .execute(&command(
                DialectKind::Target,
                type_code::BIGINT,
                TypeSpecifiers::with_precision(20),
            ))
            .unwrap();
        assert_eq!(result, "NUMBER(20)");
    }

    #[test]
    fn test_resolve_with_source_alias() {
        let handler = ResolveTypeCommandHandler::new();
        let mut command = command(
            DialectKind::Oracle,
            type_code::LONGVARCHAR,
            TypeSpecifiers::default(),
        );
        command.source = Some(DialectKind::MySQL);
        command.name = Some("mediumtext".to_string());
        assert_eq!(handler.execute(&command).unwrap(), "CLOB");
    }

    #[test]
    fn test_unknown_code_is_an_error() {
        let handler = ResolveTypeCommandHandler::new();
        let result = handler.execute(&command(
            DialectKind::Target,
            type_code::LONGVARCHAR,
            TypeSpecifiers::default(),
        ));
        assert!(result.is_err());
    }
}
