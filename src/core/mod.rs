// Core Domain
// 方言に依存しないメタデータモデル、型コード、エラー、設定

pub mod config;
pub mod error;
pub mod metadata;
pub mod type_code;
