// スキーマスクリプトジェネレーター
//
// CREATEではスキーマを作成せず、以降の文の対象スキーマを切り替える文のみを生成します。
// 識別子が解決できないスキーマでは何も生成しません。

use super::{GeneratorContext, ScriptGenerator};
use crate::core::error::GeneratorError;
use crate::core::metadata::SchemaId;

/// スキーマスクリプトジェネレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaScriptGenerator;

impl ScriptGenerator<SchemaId> for SchemaScriptGenerator {
    fn create_scripts(
        &self,
        schema: &SchemaId,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(context
            .schema_identifier(*schema)?
            .map(|identifier| context.target().use_schema(&identifier))
            .into_iter()
            .collect())
    }

    fn drop_scripts(
        &self,
        schema: &SchemaId,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(context
            .schema_identifier(*schema)?
            .map(|identifier| context.target().drop_schema(&identifier))
            .into_iter()
            .collect())
    }
}
