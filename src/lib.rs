// dbporterライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメイン（メタデータグラフ、型コード、設定、エラー）
// - adapters: 方言・型名解決・翻訳・スクリプト生成と、出力先やデータベースへのアクセス
// - services: メタデータグラフ全体のスクリプト生成のオーケストレーション

pub mod cli;
pub mod core;
pub mod adapters;
pub mod services;
