// シーケンススクリプトジェネレーター
//
// 移行済みデータと衝突しないよう、最後に払い出された値の次から開始するシーケンスを生成します。

use super::{GeneratorContext, ScriptGenerator};
use crate::core::error::GeneratorError;
use crate::core::metadata::Sequence;

/// シーケンススクリプトジェネレーター
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceScriptGenerator;

impl SequenceScriptGenerator {
    fn name(
        &self,
        sequence: &Sequence,
        context: &GeneratorContext<'_>,
    ) -> Result<String, GeneratorError> {
        let target = context.target();
        if !target.supports_sequences() {
            return Err(GeneratorError::unsupported(
                target.kind().to_string(),
                "sequences",
            ));
        }
        let name = sequence.name.as_deref().ok_or_else(|| {
            GeneratorError::unsupported(target.kind().to_string(), "unnamed sequences")
        })?;
        context.object_name(sequence.schema, name)
    }
}

impl ScriptGenerator<Sequence> for SequenceScriptGenerator {
    fn create_scripts(
        &self,
        sequence: &Sequence,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(vec![format!(
            "CREATE SEQUENCE {} START WITH {} INCREMENT BY {}",
            self.name(sequence, context)?,
            sequence.next_value()?,
            sequence.increment()
        )])
    }

    fn drop_scripts(
        &self,
        sequence: &Sequence,
        context: &GeneratorContext<'_>,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(vec![format!("DROP SEQUENCE {}", self.name(sequence, context)?)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::script_generator::ScriptGeneratorConfig;
    use crate::core::config::{DialectKind, ScriptType};
    use crate::core::metadata::Database;

    #[test]
    fn test_sequence_starts_after_last_value() {
        let mut database = Database::new(Some(DialectKind::Oracle));
        let catalog = database.add_catalog(None).unwrap();
        let schema = database.add_schema(catalog, Some("APP")).unwrap();
        let mut sequence = Sequence::new(schema, Some("order_seq"));
        sequence.start_with = Some(1);
        sequence.last_value = Some(41);
        sequence.increment_by = Some(2);

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::Oracle, DialectKind::Target)
            .with_script_types([ScriptType::Drop, ScriptType::Create]);
        let context = GeneratorContext::new(&database, &config);
        assert_eq!(
            SequenceScriptGenerator.scripts(&sequence, &context).unwrap(),
            vec![
                r#"DROP SEQUENCE "order_seq""#.to_string(),
                r#"CREATE SEQUENCE "order_seq" START WITH 43 INCREMENT BY 2"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_sequence_unsupported() {
        let mut database = Database::new(Some(DialectKind::Oracle));
        let catalog = database.add_catalog(None).unwrap();
        let schema = database.add_schema(catalog, Some("APP")).unwrap();
        let named = Sequence::new(schema, Some("order_seq"));
        let unnamed = Sequence::new(schema, None);

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::Oracle, DialectKind::MySQL);
        let context = GeneratorContext::new(&database, &config);
        assert!(SequenceScriptGenerator
            .create_scripts(&named, &context)
            .unwrap_err()
            .is_unsupported());

        let config = ScriptGeneratorConfig::for_dialects(DialectKind::Oracle, DialectKind::Target);
        let context = GeneratorContext::new(&database, &config);
        assert!(SequenceScriptGenerator
            .create_scripts(&unnamed, &context)
            .unwrap_err()
            .is_unsupported());
    }
}
