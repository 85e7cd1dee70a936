// Adapters
// 方言・型名・翻訳・スクリプト生成と、出力先やデータベースへのアクセスを扱う

pub mod database;
pub mod dialect;
pub mod script_generator;
pub mod sql_exporter;
pub mod translator;
pub mod type_mapping;
